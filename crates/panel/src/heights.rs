use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::panel_type::PanelType;

/// Share of the screen height assumed for the keyboard until a real measurement exists.
pub const FALLBACK_KEYBOARD_SHARE: f32 = 2.0 / 5.0;

/// Returns the keyboard height used before the probe has observed one.
pub fn fallback_keyboard_height(screen_height: f32) -> f32 {
    (screen_height.max(0.0) * FALLBACK_KEYBOARD_SHARE).floor()
}

/// Cross-screen memory for the last observed keyboard height.
///
/// The coordinator reads it once when a screen is built and writes it on every
/// keyboard `opened` edge, so the next screen can lay out panels without waiting
/// for a fresh measurement.
pub trait HeightStore {
    fn keyboard_height(&self) -> Option<f32>;
    fn remember_keyboard_height(&self, height: f32);
}

/// Process-lifetime store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryHeightStore {
    keyboard_height: Rc<Cell<Option<f32>>>,
}

impl MemoryHeightStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HeightStore for MemoryHeightStore {
    fn keyboard_height(&self) -> Option<f32> {
        self.keyboard_height.get()
    }

    fn remember_keyboard_height(&self, height: f32) {
        self.keyboard_height.set(Some(height));
    }
}

/// Measured magnitudes of every panel, in pixels. All values are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PanelHeights {
    pub keyboard: f32,
    pub input_panel: f32,
    pub expression_panel: f32,
    pub more_panel: f32,
}

impl PanelHeights {
    /// Seeds the cache from a remembered keyboard height, or the screen fallback.
    pub fn resolve(remembered_keyboard: Option<f32>, screen_height: f32) -> Self {
        let keyboard = remembered_keyboard
            .filter(|height| *height > 0.0)
            .unwrap_or_else(|| fallback_keyboard_height(screen_height));

        Self {
            keyboard,
            input_panel: keyboard,
            expression_panel: 0.0,
            more_panel: 0.0,
        }
    }

    /// Records an observed keyboard height. Non-positive values mean "not yet known"
    /// and leave the cache untouched.
    pub fn record_keyboard(&mut self, height: f32) -> bool {
        if height <= 0.0 || !height.is_finite() {
            return false;
        }

        self.keyboard = height;
        true
    }

    pub fn set(&mut self, panel: PanelType, height: f32) {
        let height = sanitize(height);
        match panel {
            PanelType::InputMethod => self.input_panel = height,
            PanelType::Expression => self.expression_panel = height,
            PanelType::More => self.more_panel = height,
            PanelType::None | PanelType::Voice => {}
        }
    }

    pub fn height_of(&self, panel: PanelType) -> f32 {
        match panel {
            PanelType::None | PanelType::Voice => 0.0,
            PanelType::InputMethod => self.input_panel,
            PanelType::Expression => self.expression_panel,
            PanelType::More => self.more_panel,
        }
    }

    /// Signed resting offset of the input bar while `panel` is current.
    /// Negative values move the bar up by that many pixels.
    pub fn offset_of(&self, panel: PanelType) -> f32 {
        // `0.0 - h` keeps resting offsets at +0.0 rather than -0.0.
        0.0 - self.height_of(panel)
    }
}

fn sanitize(height: f32) -> f32 {
    if height.is_finite() { height.max(0.0) } else { 0.0 }
}
