/// Buttons on the input bar that move between panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelButton {
    Voice,
    Expression,
    More,
}

/// Emitted by the input bar when one of its panel buttons is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanelButtonTapped {
    pub button: PanelButton,
}

/// Emitted when the text field is tapped while it is not accepting input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextFieldTapped;

/// Emitted when the user asks to send the current draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequested {
    pub text: String,
}

impl SendRequested {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Emitted by the emoji panel with the placeholder tag of the picked expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionPicked {
    pub tag: String,
}

/// Emitted by the floating delete key of the emoji panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpressionDeleteTapped;

/// Emitted when the message list area is tapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageListTapped;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoreAction {
    Photos,
    Camera,
    Location,
    File,
}

impl MoreAction {
    pub const ALL: [MoreAction; 4] = [Self::Photos, Self::Camera, Self::Location, Self::File];

    pub fn label(self) -> &'static str {
        match self {
            Self::Photos => "Photos",
            Self::Camera => "Camera",
            Self::Location => "Location",
            Self::File => "File",
        }
    }
}

/// Emitted by the more panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoreActionPicked {
    pub action: MoreAction,
}
