use std::cell::RefCell;
use std::rc::Rc;

/// A view the coordinator can slide vertically.
pub trait Surface {
    fn set_translation_y(&mut self, offset: f32);
    fn translation_y(&self) -> f32;
    /// Asks the view to lay itself out again once motion has settled.
    fn request_layout(&mut self);
}

/// A panel slot below the input bar.
pub trait Panel: Surface {
    fn show(&mut self);
    fn hide(&mut self);
    fn is_visible(&self) -> bool;
    /// Preferred height given the keyboard height currently cached.
    fn height(&self, keyboard_height: f32) -> f32;
}

/// Glyph on the emoji/keyboard toggle button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpressionToggle {
    #[default]
    Emoji,
    Keyboard,
}

/// What the input bar shows in place of the text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryMode {
    #[default]
    Text,
    Voice,
}

/// The input bar: text field, mode buttons and the soft keyboard it owns.
pub trait InputPanel: Panel {
    fn show_soft_input(&mut self);
    fn hide_soft_input(&mut self);
    fn set_expression_toggle(&mut self, toggle: ExpressionToggle);
    fn set_entry_mode(&mut self, mode: EntryMode);
    /// Disabled text input intercepts taps instead of raising the keyboard.
    fn set_text_input_enabled(&mut self, enabled: bool);
}

/// How a shared panel answers `height()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelSizing {
    Fixed(f32),
    /// Keyboard height plus a fixed chrome strip (tab bar, padding).
    KeyboardPlus(f32),
}

impl PanelSizing {
    pub fn resolve(&self, keyboard_height: f32) -> f32 {
        match *self {
            Self::Fixed(height) => height,
            Self::KeyboardPlus(extra) => keyboard_height + extra,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceState {
    pub visible: bool,
    pub translation_y: f32,
    pub layout_requests: u32,
    pub sizing: PanelSizing,
}

/// Reference-counted panel state shared between the coordinator and the view that
/// renders it. The coordinator writes, the view reads on its next frame.
#[derive(Debug, Clone)]
pub struct SharedPanel {
    state: Rc<RefCell<SurfaceState>>,
}

impl SharedPanel {
    pub fn new(sizing: PanelSizing) -> Self {
        Self {
            state: Rc::new(RefCell::new(SurfaceState {
                visible: true,
                translation_y: 0.0,
                layout_requests: 0,
                sizing,
            })),
        }
    }

    pub fn snapshot(&self) -> SurfaceState {
        self.state.borrow().clone()
    }

    pub fn set_sizing(&self, sizing: PanelSizing) {
        self.state.borrow_mut().sizing = sizing;
    }

    pub fn boxed(&self) -> Box<Self> {
        Box::new(self.clone())
    }
}

impl Surface for SharedPanel {
    fn set_translation_y(&mut self, offset: f32) {
        self.state.borrow_mut().translation_y = offset;
    }

    fn translation_y(&self) -> f32 {
        self.state.borrow().translation_y
    }

    fn request_layout(&mut self) {
        let mut state = self.state.borrow_mut();
        state.layout_requests = state.layout_requests.saturating_add(1);
    }
}

impl Panel for SharedPanel {
    fn show(&mut self) {
        self.state.borrow_mut().visible = true;
    }

    fn hide(&mut self) {
        self.state.borrow_mut().visible = false;
    }

    fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    fn height(&self, keyboard_height: f32) -> f32 {
        self.state.borrow().sizing.resolve(keyboard_height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftInputRequest {
    Show,
    Hide,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputBarState {
    pub surface: SurfaceState,
    pub soft_input: Option<SoftInputRequest>,
    pub expression_toggle: ExpressionToggle,
    pub entry_mode: EntryMode,
    pub text_input_enabled: bool,
}

/// Shared input bar state. Soft-input requests queue until the host takes them.
#[derive(Debug, Clone)]
pub struct SharedInputPanel {
    state: Rc<RefCell<InputBarState>>,
}

impl SharedInputPanel {
    pub fn new(sizing: PanelSizing) -> Self {
        Self {
            state: Rc::new(RefCell::new(InputBarState {
                surface: SurfaceState {
                    visible: true,
                    translation_y: 0.0,
                    layout_requests: 0,
                    sizing,
                },
                soft_input: None,
                expression_toggle: ExpressionToggle::Emoji,
                entry_mode: EntryMode::Text,
                text_input_enabled: false,
            })),
        }
    }

    pub fn snapshot(&self) -> InputBarState {
        self.state.borrow().clone()
    }

    pub fn take_soft_input_request(&self) -> Option<SoftInputRequest> {
        self.state.borrow_mut().soft_input.take()
    }

    pub fn boxed(&self) -> Box<Self> {
        Box::new(self.clone())
    }
}

impl Surface for SharedInputPanel {
    fn set_translation_y(&mut self, offset: f32) {
        self.state.borrow_mut().surface.translation_y = offset;
    }

    fn translation_y(&self) -> f32 {
        self.state.borrow().surface.translation_y
    }

    fn request_layout(&mut self) {
        let mut state = self.state.borrow_mut();
        state.surface.layout_requests = state.surface.layout_requests.saturating_add(1);
    }
}

impl Panel for SharedInputPanel {
    fn show(&mut self) {
        self.state.borrow_mut().surface.visible = true;
    }

    fn hide(&mut self) {
        self.state.borrow_mut().surface.visible = false;
    }

    fn is_visible(&self) -> bool {
        self.state.borrow().surface.visible
    }

    fn height(&self, keyboard_height: f32) -> f32 {
        self.state.borrow().surface.sizing.resolve(keyboard_height)
    }
}

impl InputPanel for SharedInputPanel {
    fn show_soft_input(&mut self) {
        self.state.borrow_mut().soft_input = Some(SoftInputRequest::Show);
    }

    fn hide_soft_input(&mut self) {
        self.state.borrow_mut().soft_input = Some(SoftInputRequest::Hide);
    }

    fn set_expression_toggle(&mut self, toggle: ExpressionToggle) {
        self.state.borrow_mut().expression_toggle = toggle;
    }

    fn set_entry_mode(&mut self, mode: EntryMode) {
        self.state.borrow_mut().entry_mode = mode;
    }

    fn set_text_input_enabled(&mut self, enabled: bool) {
        self.state.borrow_mut().text_input_enabled = enabled;
    }
}
