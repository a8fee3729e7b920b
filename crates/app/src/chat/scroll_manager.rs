use gpui::{point, px};
use gpui_component::VirtualListScrollHandle;

/// Distance from the tail within which the list counts as "at the bottom".
const FOLLOW_THRESHOLD: f32 = 24.0;
/// Offset changes smaller than this are scroll jitter.
const SCROLL_EPSILON: f32 = 1.0;

/// Tail-follow bookkeeping in plain numbers.
///
/// Offsets follow GPUI's convention: scrolling toward the tail makes `offset` more
/// negative, and `offset == -max` is the bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowTracker {
    follow_bottom: bool,
    pending_scroll: bool,
    last_offset: f32,
    last_max: f32,
}

impl Default for FollowTracker {
    fn default() -> Self {
        Self {
            follow_bottom: true,
            pending_scroll: true,
            last_offset: 0.0,
            last_max: 0.0,
        }
    }
}

impl FollowTracker {
    pub fn is_following(&self) -> bool {
        self.follow_bottom
    }

    pub fn request(&mut self) {
        self.pending_scroll = true;
        self.follow_bottom = true;
    }

    pub fn request_if_following(&mut self) {
        if self.follow_bottom || near_bottom(self.last_offset, self.last_max) {
            self.pending_scroll = true;
        }
    }

    /// Feeds the offset observed on this frame.
    pub fn observe(&mut self, offset: f32, max: f32) {
        let content_changed = (max - self.last_max).abs() > SCROLL_EPSILON;
        let moved = offset - self.last_offset;
        let scrolled_away = moved > SCROLL_EPSILON && !content_changed;
        let scrolled_back = moved < -SCROLL_EPSILON && !content_changed;

        if self.pending_scroll
            || (content_changed && near_bottom(self.last_offset, self.last_max))
        {
            self.follow_bottom = true;
        } else if self.follow_bottom && scrolled_away {
            self.follow_bottom = false;
        } else if !self.follow_bottom && scrolled_back && near_bottom(offset, max) {
            self.follow_bottom = true;
        }

        self.last_offset = offset;
        self.last_max = max;
    }

    /// Offset to jump to this frame, if the list should snap to its tail.
    pub fn take_target(&mut self, max: f32) -> Option<f32> {
        let snap = self.follow_bottom || self.pending_scroll;
        self.pending_scroll = false;
        snap.then(|| if max > 0.0 { -max } else { 0.0 })
    }
}

fn near_bottom(offset: f32, max: f32) -> bool {
    max <= 0.0 || (offset + max).abs() <= FOLLOW_THRESHOLD
}

/// Keeps the message list pinned to its newest row unless the user scrolls away.
pub struct ScrollManager {
    scroll_handle: VirtualListScrollHandle,
    tracker: FollowTracker,
}

impl ScrollManager {
    pub fn new() -> Self {
        Self {
            scroll_handle: VirtualListScrollHandle::new(),
            tracker: FollowTracker::default(),
        }
    }

    pub fn handle(&self) -> &VirtualListScrollHandle {
        &self.scroll_handle
    }

    pub fn request_scroll_to_bottom(&mut self) {
        self.tracker.request();
    }

    pub fn request_scroll_to_bottom_if_following(&mut self) {
        self.tracker.request_if_following();
    }

    /// Samples the handle and snaps to the tail when following. Call once per render.
    pub fn sync(&mut self) {
        let offset = self.scroll_handle.offset();
        let max = self.scroll_handle.max_offset().height;
        self.tracker.observe(f32::from(offset.y), f32::from(max));

        if let Some(target) = self.tracker.take_target(f32::from(max)) {
            self.scroll_handle.set_offset(point(offset.x, px(target)));
        }
    }
}

impl Default for ScrollManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrolling_up_pauses_follow() {
        let mut tracker = FollowTracker::default();
        tracker.observe(-400.0, 400.0);
        assert_eq!(tracker.take_target(400.0), Some(-400.0));

        tracker.observe(-200.0, 400.0);
        assert!(!tracker.is_following());
        assert_eq!(tracker.take_target(400.0), None);
    }

    #[test]
    fn returning_to_tail_resumes_follow() {
        let mut tracker = FollowTracker::default();
        tracker.observe(-400.0, 400.0);
        tracker.take_target(400.0);
        tracker.observe(-100.0, 400.0);
        assert!(!tracker.is_following());

        tracker.observe(-390.0, 400.0);
        assert!(tracker.is_following());
    }

    #[test]
    fn explicit_request_overrides_paused_follow() {
        let mut tracker = FollowTracker::default();
        tracker.observe(-400.0, 400.0);
        tracker.take_target(400.0);
        tracker.observe(0.0, 400.0);
        tracker.request_if_following();
        assert_eq!(tracker.take_target(400.0), None);

        tracker.request();
        tracker.observe(0.0, 460.0);
        assert_eq!(tracker.take_target(460.0), Some(-460.0));
    }

    #[test]
    fn short_content_snaps_to_zero() {
        let mut tracker = FollowTracker::default();
        tracker.observe(0.0, 0.0);
        assert_eq!(tracker.take_target(0.0), Some(0.0));
    }
}
