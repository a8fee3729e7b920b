use std::rc::Rc;

use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{ActiveTheme, Icon, IconName, h_flex, label::Label, v_flex, v_virtual_list};
use murmur_chat::{ExpressionCatalog, Message, MessageBody};

use crate::chat::events::MessageListTapped;
use crate::chat::scroll_manager::ScrollManager;

const GROUP_SPACING: f32 = 16.0;
const ROW_SPACING: f32 = 4.0;
const TIME_LABEL_HEIGHT: f32 = 20.0;
const SENDER_LABEL_HEIGHT: f32 = 18.0;
const BUBBLE_MAX_WIDTH: f32 = 260.0;
const BUBBLE_PADDING_X: f32 = 12.0;
const BUBBLE_PADDING_Y: f32 = 8.0;
const IMAGE_SIZE: f32 = 96.0;
const AVATAR_SIZE: f32 = 32.0;
const LINE_HEIGHT: f32 = 18.0;
const CHAR_WIDTH: f32 = 7.5;

pub struct MessageList {
    messages: Vec<Message>,
    rendered_text: Vec<Option<SharedString>>,
    item_sizes: Rc<Vec<Size<Pixels>>>,
    scroll_manager: ScrollManager,
    catalog: ExpressionCatalog,
}

impl EventEmitter<MessageListTapped> for MessageList {}

impl MessageList {
    pub fn new(catalog: ExpressionCatalog) -> Self {
        Self {
            messages: Vec::new(),
            rendered_text: Vec::new(),
            item_sizes: Rc::new(Vec::new()),
            scroll_manager: ScrollManager::new(),
            catalog,
        }
    }

    pub fn set_messages(&mut self, messages: Vec<Message>, cx: &mut Context<Self>) {
        let grew = messages.len() > self.messages.len();
        self.messages = messages;
        // Expression tags resolve once per snapshot, not per frame.
        self.rendered_text = self
            .messages
            .iter()
            .map(|message| {
                message
                    .body()
                    .text()
                    .map(|text| SharedString::from(self.catalog.render(text)))
            })
            .collect();
        self.item_sizes = Rc::new(
            self.messages
                .iter()
                .zip(&self.rendered_text)
                .map(|(message, text)| size(px(0.), px(row_height(message, text.as_deref()))))
                .collect(),
        );

        if grew {
            self.scroll_manager.request_scroll_to_bottom();
        }
        cx.notify();
    }

    /// Called after a panel slide settles so the newest row stays visible.
    pub fn relayout(&mut self, cx: &mut Context<Self>) {
        self.scroll_manager.request_scroll_to_bottom_if_following();
        cx.notify();
    }

    fn render_row(&self, index: usize, cx: &mut Context<Self>) -> Option<AnyElement> {
        let message = self.messages.get(index)?;
        let text = self.rendered_text.get(index).cloned().flatten();
        let theme = cx.theme();
        let from_me = message.sender().is_me();
        let height = self.item_sizes.get(index).map(|size| size.height)?;

        let bubble = match message.body() {
            MessageBody::Text(_) => div()
                .max_w(px(BUBBLE_MAX_WIDTH))
                .px(px(BUBBLE_PADDING_X))
                .py(px(BUBBLE_PADDING_Y))
                .rounded_lg()
                .when(from_me, |bubble| {
                    bubble.bg(theme.primary).text_color(theme.primary_foreground)
                })
                .when(!from_me, |bubble| {
                    bubble.bg(theme.muted).text_color(theme.foreground)
                })
                .child(Label::new(text.unwrap_or_default()).text_sm()),
            MessageBody::Image(resource) => div()
                .size(px(IMAGE_SIZE))
                .rounded_lg()
                .border_1()
                .border_color(theme.border)
                .bg(theme.secondary)
                .flex()
                .items_center()
                .justify_center()
                .child(
                    Label::new(resource.name())
                        .text_xs()
                        .text_color(theme.muted_foreground),
                ),
        };

        let avatar = div()
            .size(px(AVATAR_SIZE))
            .flex_shrink_0()
            .when(message.show_sender_info(), |slot| {
                slot.rounded_full()
                    .bg(theme.muted)
                    .flex()
                    .items_center()
                    .justify_center()
                    .child(
                        Icon::new(IconName::CircleUser)
                            .size(px(18.))
                            .text_color(theme.foreground),
                    )
            });

        let row = v_flex()
            .w_full()
            .h(height)
            .overflow_hidden()
            .pt(px(top_spacing(message)))
            .when_some(
                message.show_timestamp().then(|| message.time_label()).flatten(),
                |row, label| {
                    row.child(
                        h_flex().h(px(TIME_LABEL_HEIGHT)).w_full().justify_center().child(
                            Label::new(label)
                                .text_xs()
                                .text_color(theme.muted_foreground),
                        ),
                    )
                },
            )
            .child(
                h_flex()
                    .w_full()
                    .gap_2()
                    .items_start()
                    .when(from_me, |line| line.flex_row_reverse())
                    .child(avatar)
                    .child(
                        v_flex()
                            .gap_1()
                            .when(from_me, |column| column.items_end())
                            .when(message.show_sender_info(), |column| {
                                column.child(
                                    Label::new(message.sender().display_name())
                                        .text_xs()
                                        .text_color(theme.muted_foreground),
                                )
                            })
                            .child(bubble),
                    ),
            );

        Some(row.into_any_element())
    }
}

impl Render for MessageList {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        self.scroll_manager.sync();

        v_flex()
            .id("message-list-area")
            .size_full()
            .min_h_0()
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|_, _, _window, cx| {
                    cx.emit(MessageListTapped);
                }),
            )
            .child(
                v_virtual_list(
                    cx.entity().clone(),
                    "message-list",
                    self.item_sizes.clone(),
                    |this, visible_range, _window, cx| {
                        visible_range
                            .filter_map(|index| this.render_row(index, cx))
                            .collect::<Vec<_>>()
                    },
                )
                .size_full()
                .px_3()
                .track_scroll(self.scroll_manager.handle()),
            )
    }
}

fn top_spacing(message: &Message) -> f32 {
    if message.starts_group() {
        GROUP_SPACING
    } else {
        ROW_SPACING
    }
}

/// Fixed row height. Rows are clipped to it, so the estimate errs on the tall side.
fn row_height(message: &Message, text: Option<&str>) -> f32 {
    let mut height = top_spacing(message);
    if message.show_timestamp() {
        height += TIME_LABEL_HEIGHT;
    }

    let mut content = match message.body() {
        MessageBody::Text(_) => {
            estimate_text_height(text.unwrap_or_default()) + BUBBLE_PADDING_Y * 2.0
        }
        MessageBody::Image(_) => IMAGE_SIZE,
    };
    if message.show_sender_info() {
        content += SENDER_LABEL_HEIGHT;
    }

    height + content.max(AVATAR_SIZE)
}

fn estimate_text_height(text: &str) -> f32 {
    let chars_per_line = ((BUBBLE_MAX_WIDTH - BUBBLE_PADDING_X * 2.0) / CHAR_WIDTH)
        .floor()
        .max(1.0) as usize;
    let lines = text
        .lines()
        .map(|line| line.chars().count().max(1).div_ceil(chars_per_line))
        .sum::<usize>()
        .max(1);
    LINE_HEIGHT * lines as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_chat::{MessageStore, NewMessage, Sender};

    const T0: i64 = 1_700_000_000_000;

    #[test]
    fn grouped_rows_are_tighter() {
        let mut store = MessageStore::new();
        store.append(NewMessage::text(Sender::Peer, "first", T0));
        store.append(NewMessage::text(Sender::Peer, "second", T0 + 1_000));

        let opener = &store.messages()[0];
        let follower = &store.messages()[1];
        assert!(
            row_height(opener, Some("first")) > row_height(follower, Some("second"))
        );
        assert_eq!(top_spacing(follower), ROW_SPACING);
    }

    #[test]
    fn long_text_wraps_to_more_lines() {
        let short = estimate_text_height("hi");
        let long = estimate_text_height(&"word ".repeat(40));
        assert_eq!(short, LINE_HEIGHT);
        assert!(long >= LINE_HEIGHT * 4.0);
        assert_eq!(estimate_text_height(""), LINE_HEIGHT);
    }
}
