use serde::{Deserialize, Serialize};

use crate::heights::PanelHeights;
use crate::panel_type::PanelType;

/// Vertical translation driving one slide, in pixels. Negative values are "raised".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TransitionVector {
    pub from: f32,
    pub to: f32,
}

impl TransitionVector {
    pub const ZERO: TransitionVector = TransitionVector { from: 0.0, to: 0.0 };

    pub const fn new(from: f32, to: f32) -> Self {
        Self { from, to }
    }

    /// Computes the slide between two panel states from the cached heights.
    ///
    /// Every `(previous, target)` pair is defined: each state resolves to its own
    /// resting offset, so pairs that involve only `None`/`Voice` collapse to `(0, 0)`.
    pub fn between(previous: PanelType, target: PanelType, heights: &PanelHeights) -> Self {
        Self::new(heights.offset_of(previous), heights.offset_of(target))
    }

    pub fn is_motionless(&self) -> bool {
        self.from == self.to
    }

    /// Linear interpolation at `progress` in `[0, 1]`.
    pub fn at(&self, progress: f32) -> f32 {
        let progress = progress.clamp(0.0, 1.0);
        self.from + (self.to - self.from) * progress
    }
}

/// Result of an accepted transition request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub previous: PanelType,
    pub target: PanelType,
    pub vector: TransitionVector,
}

/// Tracks which panel is current and which one it replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelStateMachine {
    current: PanelType,
    previous: PanelType,
}

impl PanelStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> PanelType {
        self.current
    }

    pub fn previous(&self) -> PanelType {
        self.previous
    }

    /// Returns true when a request for `target` would produce a transition.
    ///
    /// Repeating the current state is ignored, except for `InputMethod`: re-tapping the
    /// text field while the keyboard mode is current must still be able to re-show it.
    pub fn accepts(&self, target: PanelType) -> bool {
        target != self.current || target == PanelType::InputMethod
    }

    /// Applies a request and reports the slide to run, or `None` for a no-op.
    pub fn request(&mut self, target: PanelType, heights: &PanelHeights) -> Option<Transition> {
        if !self.accepts(target) {
            tracing::trace!(%target, "panel request ignored, already current");
            return None;
        }

        let previous = self.current;
        let vector = TransitionVector::between(previous, target, heights);
        self.previous = previous;
        self.current = target;

        tracing::debug!(
            %previous,
            %target,
            from = vector.from,
            to = vector.to,
            "panel transition"
        );

        Some(Transition {
            previous,
            target,
            vector,
        })
    }
}
