/// Event contracts between the screen and its child views.
pub mod events;
pub mod expression_panel;
pub mod input_bar;
pub mod message_list;
pub mod more_panel;
pub mod scroll_manager;
pub mod view;

pub use events::{
    ExpressionDeleteTapped, ExpressionPicked, MessageListTapped, MoreAction, MoreActionPicked,
    PanelButton, PanelButtonTapped, SendRequested, TextFieldTapped,
};
pub use expression_panel::{ExpressionPanel, GridViewport};
pub use input_bar::InputBar;
pub use message_list::MessageList;
pub use more_panel::MorePanel;
pub use scroll_manager::{FollowTracker, ScrollManager};
pub use view::ChatScreen;
