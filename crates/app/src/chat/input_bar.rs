use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
    label::Label,
    v_flex,
};
use murmur_chat::{Draft, ExpressionCatalog};
use murmur_panel::{EntryMode, ExpressionToggle, SharedInputPanel, SoftInputRequest};

use crate::chat::events::{PanelButton, PanelButtonTapped, SendRequested, TextFieldTapped};

/// Height of the bar itself; the slide offsets for panels are measured separately.
pub const INPUT_BAR_HEIGHT: f32 = 56.0;

pub struct InputBar {
    input_state: Entity<InputState>,
    panel: SharedInputPanel,
    catalog: ExpressionCatalog,
    pending_soft_input: Option<SoftInputRequest>,
}

impl EventEmitter<PanelButtonTapped> for InputBar {}
impl EventEmitter<TextFieldTapped> for InputBar {}
impl EventEmitter<SendRequested> for InputBar {}

impl InputBar {
    pub fn new(
        panel: SharedInputPanel,
        catalog: ExpressionCatalog,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let input_state = cx.new(|cx| {
            InputState::new(window, cx).placeholder("Message")
        });

        cx.subscribe_in(
            &input_state,
            window,
            |this, _, event: &InputEvent, _window, cx| {
                if let InputEvent::PressEnter { secondary: false } = event {
                    this.submit(cx);
                }
            },
        )
        .detach();

        // The expression preview follows every edit.
        cx.observe(&input_state, |_, _, cx| cx.notify()).detach();

        Self {
            input_state,
            panel,
            catalog,
            pending_soft_input: None,
        }
    }

    pub fn text(&self, cx: &App) -> String {
        self.input_state.read(cx).value().to_string()
    }

    /// Queues a focus change for the next frame, where a window is at hand.
    pub fn apply_soft_input(&mut self, request: SoftInputRequest, cx: &mut Context<Self>) {
        self.pending_soft_input = Some(request);
        cx.notify();
    }

    /// Inserts a tag at the caret, replacing any selection.
    pub fn insert_expression(&mut self, tag: &str, window: &mut Window, cx: &mut Context<Self>) {
        self.input_state.update(cx, |state, cx| {
            state.insert(tag, window, cx);
        });
        cx.notify();
    }

    /// Removes the char or whole expression tag before the caret.
    pub fn delete_backward(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let catalog = &self.catalog;
        let deleted = self.input_state.update(cx, |state, cx| {
            let mut draft = Draft::from_text(state.value().to_string());
            if let Some(selection) = state.selected_text_range(true, window, cx) {
                draft.set_cursor_utf16(selection.range.end);
            }

            let end = draft.cursor_utf16();
            if !draft.delete_backward(catalog) {
                return false;
            }
            state.replace_text_in_range(Some(draft.cursor_utf16()..end), "", window, cx);
            true
        });
        if deleted {
            cx.notify();
        }
    }

    pub fn clear(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.replace_text(String::new(), window, cx);
    }

    fn replace_text(&mut self, text: String, window: &mut Window, cx: &mut Context<Self>) {
        self.input_state.update(cx, |state, cx| {
            state.set_value(text, window, cx);
        });
        cx.notify();
    }

    fn submit(&mut self, cx: &mut Context<Self>) {
        let text = self.text(cx);
        cx.emit(SendRequested::new(text));
    }

    fn tap(&mut self, button: PanelButton, cx: &mut Context<Self>) {
        cx.emit(PanelButtonTapped { button });
    }

    fn flush_soft_input(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        match self.pending_soft_input.take() {
            Some(SoftInputRequest::Show) => {
                self.input_state.update(cx, |state, cx| {
                    state.focus(window, cx);
                });
            }
            Some(SoftInputRequest::Hide) => window.blur(),
            None => {}
        }
    }

    fn render_entry(&self, text_input_enabled: bool, cx: &mut Context<Self>) -> AnyElement {
        let theme = cx.theme();

        div()
            .id("input-bar-field")
            .relative()
            .flex_1()
            .min_w_0()
            .px_2()
            .rounded_lg()
            .border_1()
            .border_color(theme.border)
            .bg(theme.background)
            .child(Input::new(&self.input_state).w_full())
            .when(!text_input_enabled, |field| {
                // While the keyboard is down a tap routes through the coordinator first.
                field.child(
                    div()
                        .id("input-bar-field-shield")
                        .absolute()
                        .top_0()
                        .left_0()
                        .size_full()
                        .on_mouse_down(
                            MouseButton::Left,
                            cx.listener(|_, _, _window, cx| {
                                cx.emit(TextFieldTapped);
                            }),
                        ),
                )
            })
            .into_any_element()
    }

    fn render_hold_to_talk(&self, cx: &Context<Self>) -> AnyElement {
        let theme = cx.theme();
        h_flex()
            .flex_1()
            .h_8()
            .justify_center()
            .rounded_lg()
            .border_1()
            .border_color(theme.border)
            .bg(theme.secondary)
            .child(Label::new("Hold to talk").text_sm())
            .into_any_element()
    }
}

impl Render for InputBar {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        self.flush_soft_input(window, cx);

        let state = self.panel.snapshot();
        let text = self.text(cx);
        let preview = self.catalog.render(&text);
        let show_preview = preview != text;

        let voice_glyph = match state.entry_mode {
            EntryMode::Text => "🎤",
            EntryMode::Voice => "⌨",
        };
        let expression_glyph = match state.expression_toggle {
            ExpressionToggle::Emoji => "😊",
            ExpressionToggle::Keyboard => "⌨",
        };
        let entry = match state.entry_mode {
            EntryMode::Text => self.render_entry(state.text_input_enabled, cx),
            EntryMode::Voice => self.render_hold_to_talk(cx),
        };
        let theme = cx.theme();

        v_flex()
            .id("input-bar")
            .w_full()
            .min_h(px(INPUT_BAR_HEIGHT))
            .justify_center()
            .px_2()
            .py_2()
            .gap_1()
            .bg(theme.background)
            .border_t_1()
            .border_color(theme.border)
            .when(show_preview, |bar| {
                bar.child(
                    Label::new(preview)
                        .text_xs()
                        .text_color(theme.muted_foreground),
                )
            })
            .child(
                h_flex()
                    .w_full()
                    .gap_1()
                    .items_center()
                    .child(
                        Button::new("input-bar-voice")
                            .ghost()
                            .small()
                            .child(voice_glyph)
                            .on_click(cx.listener(|this, _, _window, cx| {
                                this.tap(PanelButton::Voice, cx);
                            })),
                    )
                    .child(entry)
                    .child(
                        Button::new("input-bar-expression")
                            .ghost()
                            .small()
                            .child(expression_glyph)
                            .on_click(cx.listener(|this, _, _window, cx| {
                                this.tap(PanelButton::Expression, cx);
                            })),
                    )
                    .child(
                        Button::new("input-bar-more")
                            .ghost()
                            .small()
                            .icon(IconName::Plus)
                            .on_click(cx.listener(|this, _, _window, cx| {
                                this.tap(PanelButton::More, cx);
                            })),
                    )
                    .when(state.entry_mode == EntryMode::Text, |row| {
                        row.child(
                            Button::new("input-bar-send")
                                .small()
                                .primary()
                                .icon(IconName::ArrowUp)
                                .on_click(cx.listener(|this, _, _window, cx| {
                                    this.submit(cx);
                                })),
                        )
                    }),
            )
    }
}
