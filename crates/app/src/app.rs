use gpui::*;
use gpui_component::{
    ActiveTheme, Icon, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    label::Label,
    v_flex,
};
use murmur_chat::{ExpressionCatalog, Sender};

use crate::chat::ChatScreen;
use crate::settings::{ChatSettings, SettingsStore};

/// Phone-shaped default window.
pub const WINDOW_WIDTH: f32 = 420.0;
pub const WINDOW_HEIGHT: f32 = 860.0;
/// Conversation header above the chat screen.
pub const HEADER_HEIGHT: f32 = 44.0;

const _: () = {
    assert!(HEADER_HEIGHT < WINDOW_HEIGHT);
    assert!(WINDOW_WIDTH < WINDOW_HEIGHT);
};

gpui::actions!(murmur, [Quit, ResetPanels, ToggleListAnimation]);

/// Label for the list-animation toggle in the header.
pub fn list_animation_label(settings: &ChatSettings) -> &'static str {
    if settings.animate_message_list {
        "Slide list: on"
    } else {
        "Slide list: off"
    }
}

/// Window root: conversation header plus one chat screen.
pub struct MurmurShell {
    settings: SettingsStore,
    chat_screen: Entity<ChatScreen>,
}

impl MurmurShell {
    pub fn new(
        settings: SettingsStore,
        catalog: ExpressionCatalog,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let screen_settings = settings.clone();
        let chat_screen =
            cx.new(|cx| ChatScreen::new(screen_settings, catalog, HEADER_HEIGHT, window, cx));

        Self {
            settings,
            chat_screen,
        }
    }

    fn toggle_list_animation(&mut self, cx: &mut Context<Self>) {
        let current = self.settings.settings();
        let next = ChatSettings {
            animate_message_list: !current.animate_message_list,
            ..(*current).clone()
        };
        let animate = next.animate_message_list;

        if let Err(error) = self.settings.update(next) {
            tracing::warn!("failed to persist list animation setting: {error}");
        }
        self.chat_screen.update(cx, |screen, cx| {
            screen.set_animate_message_list(animate, cx);
        });
        cx.notify();
    }

    fn reset_panels(&mut self, cx: &mut Context<Self>) {
        let reset = self
            .chat_screen
            .update(cx, |screen, cx| screen.reset_panels(cx));
        tracing::debug!(reset, "reset panels requested");
    }

    fn render_header(&self, cx: &Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let settings = self.settings.settings();
        let panel = self.chat_screen.read(cx).current_panel();

        h_flex()
            .id("murmur-header")
            .h(px(HEADER_HEIGHT))
            .w_full()
            .flex_shrink_0()
            .px_3()
            .gap_2()
            .items_center()
            .bg(theme.background)
            .border_b_1()
            .border_color(theme.border)
            .child(
                Icon::new(IconName::CircleUser)
                    .size(px(20.))
                    .text_color(theme.foreground),
            )
            .child(
                v_flex()
                    .flex_1()
                    .min_w_0()
                    .child(Label::new(Sender::Peer.display_name()).text_sm())
                    .child(
                        Label::new(format!("panel: {panel}"))
                            .text_xs()
                            .text_color(theme.muted_foreground),
                    ),
            )
            .child(
                Button::new("toggle-list-animation")
                    .ghost()
                    .small()
                    .child(list_animation_label(&settings))
                    .on_click(cx.listener(|this, _, _window, cx| {
                        this.toggle_list_animation(cx);
                    })),
            )
    }
}

impl Render for MurmurShell {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .id("murmur-shell")
            .size_full()
            .bg(theme.background)
            .on_action(cx.listener(|this, _: &ResetPanels, _window, cx| {
                this.reset_panels(cx);
            }))
            .on_action(cx.listener(|this, _: &ToggleListAnimation, _window, cx| {
                this.toggle_list_animation(cx);
            }))
            .child(self.render_header(cx))
            .child(
                div()
                    .id("murmur-body")
                    .flex_1()
                    .min_h_0()
                    .overflow_hidden()
                    .child(self.chat_screen.clone()),
            )
    }
}
