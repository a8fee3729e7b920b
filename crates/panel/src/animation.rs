use std::time::{Duration, Instant};

use crate::machine::{Transition, TransitionVector};

pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    /// Quadratic ease-out: fast start, settles gently.
    #[default]
    Decelerate,
}

impl Easing {
    pub fn apply(self, progress: f32) -> f32 {
        let progress = progress.clamp(0.0, 1.0);
        match self {
            Self::Linear => progress,
            Self::Decelerate => 1.0 - (1.0 - progress) * (1.0 - progress),
        }
    }
}

/// Views that can take part in a grouped slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideTarget {
    InputPanel,
    MessageList,
    ExpressionPanel,
    MorePanel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideLeg {
    pub target: SlideTarget,
    pub vector: TransitionVector,
}

/// One transition's worth of synchronized slides, sharing duration and easing.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideGroup {
    transition: Transition,
    legs: Vec<SlideLeg>,
    started_at: Instant,
    duration: Duration,
    easing: Easing,
}

impl SlideGroup {
    pub fn new(
        transition: Transition,
        targets: impl IntoIterator<Item = SlideTarget>,
        started_at: Instant,
        duration: Duration,
        easing: Easing,
    ) -> Self {
        let legs = targets
            .into_iter()
            .map(|target| SlideLeg {
                target,
                vector: transition.vector,
            })
            .collect();

        Self {
            transition,
            legs,
            started_at,
            duration,
            easing,
        }
    }

    pub fn transition(&self) -> Transition {
        self.transition
    }

    pub fn legs(&self) -> &[SlideLeg] {
        &self.legs
    }

    pub fn contains(&self, target: SlideTarget) -> bool {
        self.legs.iter().any(|leg| leg.target == target)
    }

    pub fn deadline(&self) -> Instant {
        self.started_at + self.duration
    }

    /// Eased progress in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }

        let elapsed = now.saturating_duration_since(self.started_at);
        let linear = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.easing.apply(linear)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now >= self.deadline()
    }

    /// Translation of every leg at `now`.
    pub fn frame(&self, now: Instant) -> impl Iterator<Item = (SlideTarget, f32)> + '_ {
        let progress = self.progress(now);
        self.legs
            .iter()
            .map(move |leg| (leg.target, leg.vector.at(progress)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel_type::PanelType;

    fn transition() -> Transition {
        Transition {
            previous: PanelType::None,
            target: PanelType::Expression,
            vector: TransitionVector::new(0.0, -400.0),
        }
    }

    #[test]
    fn decelerate_front_loads_motion() {
        assert_eq!(Easing::Decelerate.apply(0.0), 0.0);
        assert_eq!(Easing::Decelerate.apply(0.5), 0.75);
        assert_eq!(Easing::Decelerate.apply(1.0), 1.0);
        assert_eq!(Easing::Decelerate.apply(3.0), 1.0);
    }

    #[test]
    fn every_leg_shares_the_same_value() {
        let start = Instant::now();
        let group = SlideGroup::new(
            transition(),
            [SlideTarget::InputPanel, SlideTarget::MessageList, SlideTarget::ExpressionPanel],
            start,
            DEFAULT_ANIMATION_DURATION,
            Easing::Decelerate,
        );

        let halfway = group
            .frame(start + Duration::from_millis(125))
            .collect::<Vec<_>>();
        assert_eq!(halfway.len(), 3);
        assert!(halfway.iter().all(|(_, value)| *value == -300.0));

        let end = start + DEFAULT_ANIMATION_DURATION;
        assert!(group.is_finished(end));
        assert!(group.frame(end).all(|(_, value)| value == -400.0));
        assert!(!group.contains(SlideTarget::MorePanel));
    }

    #[test]
    fn zero_duration_jumps_to_end() {
        let start = Instant::now();
        let group = SlideGroup::new(
            transition(),
            [SlideTarget::InputPanel],
            start,
            Duration::ZERO,
            Easing::Linear,
        );
        assert_eq!(group.progress(start), 1.0);
    }
}
