use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex, v_flex,
};

use crate::chat::events::{MoreAction, MoreActionPicked};

/// Chrome above the action grid; the panel is keyboard height plus this.
pub const MORE_PANEL_CHROME_HEIGHT: f32 = 36.0;

pub struct MorePanel {
    height: f32,
}

impl EventEmitter<MoreActionPicked> for MorePanel {}

impl MorePanel {
    pub fn new() -> Self {
        Self { height: 0.0 }
    }

    pub fn set_height(&mut self, height: f32, cx: &mut Context<Self>) {
        if (self.height - height).abs() > f32::EPSILON {
            self.height = height;
            cx.notify();
        }
    }
}

impl Default for MorePanel {
    fn default() -> Self {
        Self::new()
    }
}

fn action_icon(action: MoreAction) -> IconName {
    match action {
        MoreAction::Photos => IconName::Folder,
        MoreAction::Camera => IconName::Circle,
        MoreAction::Location => IconName::Search,
        MoreAction::File => IconName::File,
    }
}

impl Render for MorePanel {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let actions = MoreAction::ALL.into_iter().map(|action| {
            Button::new(action.label())
                .ghost()
                .small()
                .icon(action_icon(action))
                .child(action.label())
                .on_click(cx.listener(move |_, _, _window, cx| {
                    cx.emit(MoreActionPicked { action });
                }))
        });

        v_flex()
            .id("more-panel")
            .w_full()
            .h(px(self.height))
            .pt(px(MORE_PANEL_CHROME_HEIGHT))
            .px_4()
            .bg(theme.secondary)
            .border_t_1()
            .border_color(theme.border)
            .child(h_flex().w_full().gap_2().flex_wrap().children(actions))
    }
}
