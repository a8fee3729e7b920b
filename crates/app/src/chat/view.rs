use std::rc::Rc;
use std::time::Duration;

use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{
    ActiveTheme, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    label::Label,
    v_flex,
};
use murmur_chat::{ExpressionCatalog, ImageResource, MessageStore, NewMessage, Sender, now_millis};
use murmur_panel::{
    CoordinatorConfig, OverlayHost, OverlayId, OverlaySpec, PanelCoordinator,
    PanelEvent, PanelEventStream, PanelSizing, PanelType, PanelViews, SharedInputPanel,
    SharedPanel, SoftInputRequest, SystemClock, VisibleFrame, fallback_keyboard_height,
};

use crate::chat::events::{
    ExpressionDeleteTapped, ExpressionPicked, MessageListTapped, MoreAction, MoreActionPicked,
    PanelButton, PanelButtonTapped, SendRequested, TextFieldTapped,
};
use crate::chat::expression_panel::{EXPRESSION_TAB_HEIGHT, ExpressionPanel};
use crate::chat::input_bar::InputBar;
use crate::chat::message_list::MessageList;
use crate::chat::more_panel::{MORE_PANEL_CHROME_HEIGHT, MorePanel};
use crate::settings::SettingsStore;

/// Frame pacing for slides and deferred panel tasks.
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);
const NOTICE_DURATION: Duration = Duration::from_secs(2);
/// Window resizes smaller than this keep the current probe mark.
const SCREEN_HEIGHT_EPSILON: f32 = 0.5;

/// The desktop window has no overlay layer; the probe only needs stable ids.
#[derive(Debug, Default)]
struct ProbeOverlays {
    next_id: u64,
    attached: Vec<OverlayId>,
}

impl OverlayHost for ProbeOverlays {
    fn attach_overlay(&mut self, spec: OverlaySpec) -> OverlayId {
        self.next_id += 1;
        let overlay = OverlayId(self.next_id);
        self.attached.push(overlay);
        tracing::trace!(?spec, ?overlay, "probe overlay attached");
        overlay
    }

    fn detach_overlay(&mut self, overlay: OverlayId) {
        self.attached.retain(|attached| *attached != overlay);
    }
}

/// On-screen stand-in for a soft keyboard. It shrinks the visible frame the same way
/// an input method would, so the coordinator sees real open/close edges.
#[derive(Debug, Clone, Copy, Default)]
struct SimulatedKeyboard {
    open: bool,
}

impl SimulatedKeyboard {
    fn height(&self, screen_height: f32) -> f32 {
        if self.open {
            fallback_keyboard_height(screen_height)
        } else {
            0.0
        }
    }
}

/// One conversation screen: message list, input bar, emoji and more panels.
pub struct ChatScreen {
    store: MessageStore,
    coordinator: PanelCoordinator,
    input_panel: SharedInputPanel,
    expression_state: SharedPanel,
    more_state: SharedPanel,
    list_state: SharedPanel,
    message_list: Entity<MessageList>,
    input_bar: Entity<InputBar>,
    expression_panel: Entity<ExpressionPanel>,
    more_panel: Entity<MorePanel>,
    overlays: ProbeOverlays,
    keyboard: SimulatedKeyboard,
    top_inset: f32,
    notice: Option<SharedString>,
    tick_task: Option<Task<()>>,
    event_task: Option<Task<()>>,
    notice_task: Option<Task<()>>,
}

impl ChatScreen {
    /// `top_inset` is the window chrome above the screen, excluded from its height.
    pub fn new(
        settings: SettingsStore,
        catalog: ExpressionCatalog,
        top_inset: f32,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let screen_height = (f32::from(window.viewport_size().height) - top_inset).max(0.0);
        let config = CoordinatorConfig::new(screen_height)
            .with_animate_message_list(settings.settings().animate_message_list);
        let mut coordinator =
            PanelCoordinator::new(config, Rc::new(settings), Rc::new(SystemClock));

        let input_panel = SharedInputPanel::new(PanelSizing::KeyboardPlus(0.0));
        let expression_state = SharedPanel::new(PanelSizing::KeyboardPlus(EXPRESSION_TAB_HEIGHT));
        let more_state = SharedPanel::new(PanelSizing::KeyboardPlus(MORE_PANEL_CHROME_HEIGHT));
        let list_state = SharedPanel::new(PanelSizing::Fixed(0.0));
        coordinator.bind(
            PanelViews::new()
                .with_input_panel(input_panel.clone())
                .with_expression_panel(expression_state.clone())
                .with_more_panel(more_state.clone())
                .with_message_list(list_state.clone()),
        );

        let mut overlays = ProbeOverlays::default();
        coordinator.attach_probe(&mut overlays);
        let events = coordinator.subscribe();

        let store = MessageStore::seeded(now_millis());
        let message_list = cx.new(|_| MessageList::new(catalog.clone()));
        message_list.update(cx, |list, cx| list.set_messages(store.snapshot(), cx));
        let input_bar =
            cx.new(|cx| InputBar::new(input_panel.clone(), catalog.clone(), window, cx));
        let expression_panel = cx.new(|_| ExpressionPanel::new(catalog));
        let more_panel = cx.new(|_| MorePanel::new());

        cx.subscribe(&input_bar, |this, _, event: &PanelButtonTapped, cx| {
            this.handle_panel_button(event.button, cx);
        })
        .detach();

        cx.subscribe(&input_bar, |this, _, _event: &TextFieldTapped, cx| {
            if this.coordinator.on_text_field_tapped() {
                this.after_coordinator(cx);
            }
        })
        .detach();

        cx.subscribe_in(
            &input_bar,
            window,
            |this, _, event: &SendRequested, window, cx| {
                this.handle_send(&event.text, window, cx);
            },
        )
        .detach();

        cx.subscribe_in(
            &expression_panel,
            window,
            |this, _, event: &ExpressionPicked, window, cx| {
                this.input_bar.update(cx, |input_bar, cx| {
                    input_bar.insert_expression(&event.tag, window, cx);
                });
            },
        )
        .detach();

        cx.subscribe_in(
            &expression_panel,
            window,
            |this, _, _event: &ExpressionDeleteTapped, window, cx| {
                this.input_bar.update(cx, |input_bar, cx| {
                    input_bar.delete_backward(window, cx);
                });
            },
        )
        .detach();

        cx.subscribe(&more_panel, |this, _, event: &MoreActionPicked, cx| {
            this.handle_more_action(event.action, cx);
        })
        .detach();

        cx.subscribe(&message_list, |this, _, _event: &MessageListTapped, cx| {
            this.reset_panels(cx);
        })
        .detach();

        // Dropping the screen releases views, timers and the probe overlay.
        cx.on_release(|this, _cx| {
            this.coordinator.release(&mut this.overlays);
        })
        .detach();

        let mut this = Self {
            store,
            coordinator,
            input_panel,
            expression_state,
            more_state,
            list_state,
            message_list,
            input_bar,
            expression_panel,
            more_panel,
            overlays,
            keyboard: SimulatedKeyboard::default(),
            top_inset,
            notice: None,
            tick_task: None,
            event_task: None,
            notice_task: None,
        };
        this.spawn_event_reader(events, cx);
        this
    }

    pub fn current_panel(&self) -> PanelType {
        self.coordinator.current_panel()
    }

    pub fn set_animate_message_list(&mut self, animate: bool, cx: &mut Context<Self>) {
        self.coordinator.set_animate_message_list(animate);
        cx.notify();
    }

    /// Collapses whatever panel is open. Returns false when nothing was open.
    pub fn reset_panels(&mut self, cx: &mut Context<Self>) -> bool {
        let reset = self.coordinator.reset();
        if reset {
            self.after_coordinator(cx);
        }
        reset
    }

    fn handle_panel_button(&mut self, button: PanelButton, cx: &mut Context<Self>) {
        let transition = match button {
            PanelButton::Voice => self.coordinator.on_voice_tapped(),
            PanelButton::Expression => self.coordinator.on_expression_tapped(),
            PanelButton::More => self.coordinator.on_more_tapped(),
        };
        tracing::debug!(?button, ?transition, "panel button tapped");
        self.after_coordinator(cx);
    }

    fn handle_send(&mut self, text: &str, window: &mut Window, cx: &mut Context<Self>) {
        match self.store.send_text(text, now_millis()) {
            Ok(_) => {
                self.input_bar
                    .update(cx, |input_bar, cx| input_bar.clear(window, cx));
                self.sync_messages(cx);
            }
            Err(error) => {
                tracing::debug!(%error, "send rejected");
                self.show_notice(error.to_string(), cx);
            }
        }
    }

    fn handle_more_action(&mut self, action: MoreAction, cx: &mut Context<Self>) {
        match action {
            MoreAction::Photos => {
                self.store.append(NewMessage::image(
                    Sender::Me,
                    ImageResource::Gallery,
                    now_millis(),
                ));
                self.sync_messages(cx);
            }
            MoreAction::Camera | MoreAction::Location | MoreAction::File => {
                self.show_notice(format!("{} is not available yet", action.label()), cx);
            }
        }
    }

    fn sync_messages(&mut self, cx: &mut Context<Self>) {
        let messages = self.store.snapshot();
        self.message_list
            .update(cx, |list, cx| list.set_messages(messages, cx));
    }

    /// Applies whatever the coordinator asked of the input bar and keeps ticks running.
    fn after_coordinator(&mut self, cx: &mut Context<Self>) {
        self.forward_soft_input(cx);
        self.ensure_ticking(cx);
        cx.notify();
    }

    fn forward_soft_input(&mut self, cx: &mut Context<Self>) {
        if let Some(request) = self.input_panel.take_soft_input_request() {
            self.keyboard.open = request == SoftInputRequest::Show;
            self.input_bar
                .update(cx, |input_bar, cx| input_bar.apply_soft_input(request, cx));
        }
    }

    fn ensure_ticking(&mut self, cx: &mut Context<Self>) {
        if self.tick_task.is_some() || !self.coordinator.is_busy() {
            return;
        }

        self.tick_task = Some(cx.spawn(async move |this, cx| {
            loop {
                cx.background_executor().timer(TICK_INTERVAL).await;

                let busy = this.update(cx, |this, cx| {
                    this.coordinator.tick();
                    this.after_coordinator(cx);
                    let busy = this.coordinator.is_busy();
                    if !busy {
                        this.tick_task = None;
                    }
                    busy
                });
                if !matches!(busy, Ok(true)) {
                    break;
                }
            }
        }));
    }

    fn spawn_event_reader(&mut self, mut events: PanelEventStream, cx: &mut Context<Self>) {
        self.event_task = Some(cx.spawn(async move |this, cx| {
            while let Some(event) = events.recv().await {
                let _ = this.update(cx, |this, cx| {
                    this.handle_panel_event(event, cx);
                });
            }
        }));
    }

    fn handle_panel_event(&mut self, event: PanelEvent, cx: &mut Context<Self>) {
        match event {
            PanelEvent::TransitionFinished { target } => {
                tracing::debug!(%target, "panel settled");
                self.message_list.update(cx, |list, cx| list.relayout(cx));
            }
            PanelEvent::KeyboardOpened { height } => {
                tracing::debug!(height, "keyboard opened");
            }
            PanelEvent::KeyboardClosed
            | PanelEvent::TransitionStarted(_)
            | PanelEvent::Reset
            | PanelEvent::Released => {}
        }
    }

    fn show_notice(&mut self, notice: impl Into<SharedString>, cx: &mut Context<Self>) {
        self.notice = Some(notice.into());
        self.notice_task = Some(cx.spawn(async move |this, cx| {
            cx.background_executor().timer(NOTICE_DURATION).await;
            let _ = this.update(cx, |this, cx| {
                this.notice = None;
                this.notice_task = None;
                cx.notify();
            });
        }));
        cx.notify();
    }

    /// Closes the simulated keyboard directly, the way a system back gesture would.
    fn dismiss_keyboard(&mut self, cx: &mut Context<Self>) {
        self.keyboard.open = false;
        self.input_bar.update(cx, |input_bar, cx| {
            input_bar.apply_soft_input(SoftInputRequest::Hide, cx);
        });
        cx.notify();
    }

    /// Feeds this frame's geometry to the coordinator before anything is laid out.
    fn sync_layout(&mut self, screen_height: f32, cx: &mut Context<Self>) {
        let known = self.coordinator.config().screen_height;
        if (known - screen_height).abs() > SCREEN_HEIGHT_EPSILON {
            if self.coordinator.is_keyboard_open() {
                self.keyboard.open = false;
                self.coordinator.on_keyboard_closed();
            }
            self.coordinator.set_screen_height(screen_height);
            self.coordinator.attach_probe(&mut self.overlays);
            tracing::debug!(screen_height, "screen resized");
        }

        let bottom = screen_height - self.keyboard.height(screen_height);
        self.coordinator.on_layout(VisibleFrame::new(0.0, bottom));
        // No notify here: an edge handled mid-render is picked up by the tick loop.
        self.forward_soft_input(cx);
        self.ensure_ticking(cx);

        let heights = self.coordinator.heights();
        self.expression_panel.update(cx, |panel, cx| {
            panel.set_height(heights.expression_panel, cx);
        });
        self.more_panel
            .update(cx, |panel, cx| panel.set_height(heights.more_panel, cx));
    }

    fn render_keyboard(&self, height: f32, cx: &Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .id("simulated-keyboard")
            .absolute()
            .left_0()
            .right_0()
            .bottom_0()
            .h(px(height))
            .items_center()
            .justify_center()
            .gap_2()
            .bg(theme.muted)
            .border_t_1()
            .border_color(theme.border)
            .child(
                Label::new("Keyboard")
                    .text_sm()
                    .text_color(theme.muted_foreground),
            )
            .child(
                Button::new("simulated-keyboard-dismiss")
                    .ghost()
                    .small()
                    .child("Hide keyboard")
                    .on_click(cx.listener(|this, _, _window, cx| {
                        this.dismiss_keyboard(cx);
                    })),
            )
    }

    fn render_panel(
        id: &'static str,
        panel: AnyView,
        top: f32,
        height: f32,
    ) -> impl IntoElement {
        div()
            .id(id)
            .absolute()
            .left_0()
            .right_0()
            .top(px(top))
            .h(px(height))
            .child(panel)
    }
}

impl Render for ChatScreen {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let screen_height = (f32::from(window.viewport_size().height) - self.top_inset).max(0.0);
        self.sync_layout(screen_height, cx);

        let input_state = self.input_panel.snapshot();
        let expression_state = self.expression_state.snapshot();
        let more_state = self.more_state.snapshot();
        let list_state = self.list_state.snapshot();
        let heights = self.coordinator.heights();
        let keyboard_height = self.keyboard.height(screen_height);
        let theme = cx.theme();

        div()
            .id("chat-screen")
            .relative()
            .size_full()
            .overflow_hidden()
            .bg(theme.background)
            .child(
                v_flex()
                    .size_full()
                    .child(
                        div()
                            .id("chat-screen-message-list")
                            .relative()
                            .top(px(list_state.translation_y))
                            .flex_1()
                            .min_h_0()
                            .child(self.message_list.clone()),
                    )
                    .child(
                        div()
                            .id("chat-screen-input-bar")
                            .relative()
                            .top(px(input_state.surface.translation_y))
                            .flex_shrink_0()
                            .w_full()
                            .child(self.input_bar.clone()),
                    ),
            )
            .when(expression_state.visible, |screen| {
                screen.child(Self::render_panel(
                    "chat-screen-expression-panel",
                    self.expression_panel.clone().into(),
                    screen_height + expression_state.translation_y,
                    heights.expression_panel,
                ))
            })
            .when(more_state.visible, |screen| {
                screen.child(Self::render_panel(
                    "chat-screen-more-panel",
                    self.more_panel.clone().into(),
                    screen_height + more_state.translation_y,
                    heights.more_panel,
                ))
            })
            .when(keyboard_height > 0.0, |screen| {
                screen.child(self.render_keyboard(keyboard_height, cx))
            })
            .when_some(self.notice.clone(), |screen, notice| {
                screen.child(
                    h_flex().absolute().top_3().left_0().right_0().justify_center().child(
                        div()
                            .px_3()
                            .py_1()
                            .rounded_lg()
                            .bg(theme.secondary)
                            .border_1()
                            .border_color(theme.border)
                            .child(Label::new(notice).text_sm()),
                    ),
                )
            })
    }
}
