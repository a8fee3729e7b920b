/// Share of the screen the inferred keyboard must exceed before it counts as open.
pub const OPEN_THRESHOLD_SHARE: f32 = 1.0 / 4.0;

/// Visible display rectangle reported by the host on a layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleFrame {
    pub top: f32,
    pub bottom: f32,
}

impl VisibleFrame {
    pub const fn new(top: f32, bottom: f32) -> Self {
        Self { top, bottom }
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Keyboard visibility edges. Level changes are never reported twice in a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyboardEdge {
    Opened { height: f32 },
    Closed,
}

/// Shape of the invisible overlay the probe asks the host to attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlaySpec {
    pub width: u32,
    pub match_parent_height: bool,
    pub touchable: bool,
    pub transparent: bool,
    pub resize_with_input_method: bool,
}

impl OverlaySpec {
    /// Zero-width, full-height, untouchable, transparent; resized by the input method.
    pub const PROBE: OverlaySpec = OverlaySpec {
        width: 0,
        match_parent_height: true,
        touchable: false,
        transparent: true,
        resize_with_input_method: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(pub u64);

/// Host window that can carry overlays and report their layout passes.
pub trait OverlayHost {
    fn attach_overlay(&mut self, spec: OverlaySpec) -> OverlayId;
    fn detach_overlay(&mut self, overlay: OverlayId);
}

/// Infers keyboard visibility and height from the shrinking visible frame.
#[derive(Debug, Clone)]
pub struct KeyboardProbe {
    screen_height: f32,
    max_bottom: f32,
    opened: bool,
    overlay: Option<OverlayId>,
}

impl KeyboardProbe {
    pub fn new(screen_height: f32) -> Self {
        Self {
            screen_height,
            max_bottom: 0.0,
            opened: false,
            overlay: None,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn is_keyboard_open(&self) -> bool {
        self.opened
    }

    pub fn screen_height(&self) -> f32 {
        self.screen_height
    }

    pub fn set_screen_height(&mut self, screen_height: f32) {
        self.screen_height = screen_height;
    }

    /// Attaches the overlay. Re-attaching starts a fresh high-water mark.
    pub fn attach(&mut self, host: &mut dyn OverlayHost) {
        if let Some(overlay) = self.overlay.take() {
            host.detach_overlay(overlay);
        }

        self.max_bottom = 0.0;
        self.opened = false;
        self.overlay = Some(host.attach_overlay(OverlaySpec::PROBE));
        tracing::debug!(overlay = ?self.overlay, "keyboard probe attached");
    }

    /// Releases the overlay so the host view tree can be dropped.
    pub fn detach(&mut self, host: &mut dyn OverlayHost) {
        let Some(overlay) = self.overlay.take() else {
            return;
        };

        host.detach_overlay(overlay);
        self.max_bottom = 0.0;
        self.opened = false;
        tracing::debug!(?overlay, "keyboard probe detached");
    }

    /// Keyboard height implied by the current frame against the tallest frame seen.
    pub fn inferred_height(&self, frame: VisibleFrame) -> f32 {
        (self.max_bottom.max(frame.bottom) - frame.bottom).max(0.0)
    }

    /// Feeds one layout pass and returns an edge when visibility flips.
    pub fn on_layout(&mut self, frame: VisibleFrame) -> Option<KeyboardEdge> {
        if self.overlay.is_none() {
            return None;
        }

        if frame.bottom > self.max_bottom {
            self.max_bottom = frame.bottom;
        }

        let keyboard_height = self.max_bottom - frame.bottom;
        let visible = keyboard_height > self.screen_height * OPEN_THRESHOLD_SHARE;

        match (self.opened, visible) {
            (false, true) => {
                self.opened = true;
                tracing::info!(keyboard_height, "soft keyboard opened");
                Some(KeyboardEdge::Opened {
                    height: keyboard_height,
                })
            }
            (true, false) => {
                self.opened = false;
                tracing::info!("soft keyboard closed");
                Some(KeyboardEdge::Closed)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingHost {
        next_id: u64,
        attached: Vec<OverlayId>,
        specs: Vec<OverlaySpec>,
    }

    impl OverlayHost for RecordingHost {
        fn attach_overlay(&mut self, spec: OverlaySpec) -> OverlayId {
            self.next_id += 1;
            let id = OverlayId(self.next_id);
            self.attached.push(id);
            self.specs.push(spec);
            id
        }

        fn detach_overlay(&mut self, overlay: OverlayId) {
            self.attached.retain(|id| *id != overlay);
        }
    }

    fn frame(bottom: f32) -> VisibleFrame {
        VisibleFrame::new(0.0, bottom)
    }

    #[test]
    fn emits_one_edge_per_show_hide_cycle() {
        let mut host = RecordingHost::default();
        let mut probe = KeyboardProbe::new(2000.0);
        probe.attach(&mut host);

        let passes = [2000.0, 2000.0, 1900.0, 1300.0, 1300.0, 1290.0, 1800.0, 2000.0, 1350.0];
        let edges = passes
            .into_iter()
            .filter_map(|bottom| probe.on_layout(frame(bottom)))
            .collect::<Vec<_>>();

        assert_eq!(
            edges,
            vec![
                KeyboardEdge::Opened { height: 700.0 },
                KeyboardEdge::Closed,
                KeyboardEdge::Opened { height: 650.0 },
            ]
        );
    }

    #[test]
    fn small_insets_stay_below_threshold() {
        let mut host = RecordingHost::default();
        let mut probe = KeyboardProbe::new(2000.0);
        probe.attach(&mut host);

        assert_eq!(probe.on_layout(frame(2000.0)), None);
        // Exactly a quarter of the screen is not enough.
        assert_eq!(probe.on_layout(frame(1500.0)), None);
        assert!(!probe.is_keyboard_open());
        assert!(matches!(
            probe.on_layout(frame(1499.0)),
            Some(KeyboardEdge::Opened { .. })
        ));
    }

    #[test]
    fn detached_probe_ignores_layout_and_releases_overlay() {
        let mut host = RecordingHost::default();
        let mut probe = KeyboardProbe::new(2000.0);
        assert_eq!(probe.on_layout(frame(1000.0)), None);

        probe.attach(&mut host);
        assert_eq!(host.attached.len(), 1);
        assert_eq!(host.specs[0], OverlaySpec::PROBE);

        probe.detach(&mut host);
        assert!(host.attached.is_empty());
        assert!(!probe.is_attached());
        assert_eq!(probe.on_layout(frame(1000.0)), None);
    }

    #[test]
    fn reattach_resets_high_water_mark() {
        let mut host = RecordingHost::default();
        let mut probe = KeyboardProbe::new(2000.0);
        probe.attach(&mut host);
        probe.on_layout(frame(2000.0));

        probe.attach(&mut host);
        assert_eq!(host.attached.len(), 1);
        // A rotated, shorter frame becomes the new baseline instead of reading as a keyboard.
        assert_eq!(probe.on_layout(frame(1100.0)), None);
        assert_eq!(probe.inferred_height(frame(1100.0)), 0.0);
    }
}
