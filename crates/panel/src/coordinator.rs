use std::rc::Rc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::animation::{DEFAULT_ANIMATION_DURATION, Easing, SlideGroup, SlideTarget};
use crate::events::{EventHub, PanelEvent, PanelEventStream};
use crate::heights::{HeightStore, PanelHeights};
use crate::machine::{PanelStateMachine, Transition};
use crate::panel_type::PanelType;
use crate::probe::{KeyboardEdge, KeyboardProbe, OverlayHost, VisibleFrame};
use crate::surface::{EntryMode, ExpressionToggle, InputPanel, Panel, Surface};
use crate::timer::{Clock, TimerQueue};

pub const DEFAULT_RESET_SETTLE_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_SOFT_INPUT_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    pub screen_height: f32,
    /// Slide the message list together with the input bar.
    pub animate_message_list: bool,
    pub animation_duration: Duration,
    /// Wait before `reset()` collapses panels, so an in-flight IME dismissal settles first.
    pub reset_settle_delay: Duration,
    /// Wait before focusing the text field after a tap while the keyboard is down.
    pub soft_input_delay: Duration,
}

impl CoordinatorConfig {
    pub fn new(screen_height: f32) -> Self {
        Self {
            screen_height,
            animate_message_list: true,
            animation_duration: DEFAULT_ANIMATION_DURATION,
            reset_settle_delay: DEFAULT_RESET_SETTLE_DELAY,
            soft_input_delay: DEFAULT_SOFT_INPUT_DELAY,
        }
    }

    pub fn with_animate_message_list(mut self, animate: bool) -> Self {
        self.animate_message_list = animate;
        self
    }
}

/// Views handed to [`PanelCoordinator::bind`]. Any slot may stay empty.
#[derive(Default)]
pub struct PanelViews {
    pub input_panel: Option<Box<dyn InputPanel>>,
    pub expression_panel: Option<Box<dyn Panel>>,
    pub more_panel: Option<Box<dyn Panel>>,
    pub message_list: Option<Box<dyn Surface>>,
}

impl PanelViews {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input_panel(mut self, panel: impl InputPanel + 'static) -> Self {
        self.input_panel = Some(Box::new(panel));
        self
    }

    pub fn with_expression_panel(mut self, panel: impl Panel + 'static) -> Self {
        self.expression_panel = Some(Box::new(panel));
        self
    }

    pub fn with_more_panel(mut self, panel: impl Panel + 'static) -> Self {
        self.more_panel = Some(Box::new(panel));
        self
    }

    pub fn with_message_list(mut self, list: impl Surface + 'static) -> Self {
        self.message_list = Some(Box::new(list));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    SettleReset,
    ShowSoftInput,
}

/// Keeps the soft keyboard, the input bar and the emoji/more panels from fighting
/// over the bottom of the screen.
///
/// All calls happen on the UI thread. The host forwards layout passes, taps and a
/// periodic [`tick`](Self::tick) while [`is_busy`](Self::is_busy) reports pending work;
/// the coordinator answers by mutating the bound views and publishing [`PanelEvent`]s.
pub struct PanelCoordinator {
    config: CoordinatorConfig,
    machine: PanelStateMachine,
    heights: PanelHeights,
    height_store: Rc<dyn HeightStore>,
    clock: Rc<dyn Clock>,
    views: PanelViews,
    probe: KeyboardProbe,
    keyboard_open: bool,
    slide: Option<SlideGroup>,
    timers: TimerQueue<Deferred>,
    events: EventHub,
    active: bool,
}

impl PanelCoordinator {
    pub fn new(
        config: CoordinatorConfig,
        height_store: Rc<dyn HeightStore>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let heights = PanelHeights::resolve(height_store.keyboard_height(), config.screen_height);
        tracing::debug!(keyboard = heights.keyboard, "panel heights resolved");

        Self {
            probe: KeyboardProbe::new(config.screen_height),
            config,
            machine: PanelStateMachine::new(),
            heights,
            height_store,
            clock,
            views: PanelViews::default(),
            keyboard_open: false,
            slide: None,
            timers: TimerQueue::new(),
            events: EventHub::default(),
            active: false,
        }
    }

    pub fn subscribe(&mut self) -> PanelEventStream {
        self.events.subscribe()
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn set_animate_message_list(&mut self, animate: bool) {
        self.config.animate_message_list = animate;
    }

    pub fn current_panel(&self) -> PanelType {
        self.machine.current()
    }

    pub fn previous_panel(&self) -> PanelType {
        self.machine.previous()
    }

    pub fn heights(&self) -> PanelHeights {
        self.heights
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_keyboard_open(&self) -> bool {
        self.keyboard_open
    }

    pub fn is_animating(&self) -> bool {
        self.slide.is_some()
    }

    /// True while a slide is running or a deferred task is pending.
    pub fn is_busy(&self) -> bool {
        self.slide.is_some() || !self.timers.is_empty()
    }

    /// Earliest instant at which [`tick`](Self::tick) has something to do.
    pub fn next_wakeup(&self) -> Option<Instant> {
        if self.slide.is_some() {
            return Some(self.clock.now());
        }
        self.timers.next_deadline()
    }

    /// Registers the views. Emoji and more panels start hidden and every bound
    /// panel's height is recorded into the cache.
    pub fn bind(&mut self, views: PanelViews) {
        self.views = views;

        if let Some(panel) = self.views.expression_panel.as_deref_mut() {
            panel.hide();
        }
        if let Some(panel) = self.views.more_panel.as_deref_mut() {
            panel.hide();
        }
        if let Some(input) = self.views.input_panel.as_deref_mut() {
            input.set_text_input_enabled(self.keyboard_open);
        }

        self.measure_panels();
        tracing::debug!(heights = ?self.heights, "panels bound");
    }

    pub fn attach_probe(&mut self, host: &mut dyn OverlayHost) {
        self.probe.attach(host);
    }

    pub fn set_screen_height(&mut self, screen_height: f32) {
        self.config.screen_height = screen_height;
        self.probe.set_screen_height(screen_height);
    }

    /// Feeds one global layout pass to the keyboard probe.
    pub fn on_layout(&mut self, frame: VisibleFrame) {
        match self.probe.on_layout(frame) {
            Some(KeyboardEdge::Opened { height }) => self.on_keyboard_opened(height),
            Some(KeyboardEdge::Closed) => self.on_keyboard_closed(),
            None => {}
        }
    }

    pub fn on_keyboard_opened(&mut self, height: f32) {
        self.keyboard_open = true;
        if self.heights.record_keyboard(height) {
            self.height_store.remember_keyboard_height(height);
        }

        if let Some(input) = self.views.input_panel.as_deref_mut() {
            input.set_text_input_enabled(true);
        }

        self.measure_panels();
        self.events.publish(PanelEvent::KeyboardOpened { height });
    }

    pub fn on_keyboard_closed(&mut self) {
        self.keyboard_open = false;
        if let Some(input) = self.views.input_panel.as_deref_mut() {
            input.set_text_input_enabled(false);
        }
        self.events.publish(PanelEvent::KeyboardClosed);

        if self.machine.current() == PanelType::InputMethod {
            if let Some(input) = self.views.input_panel.as_deref_mut() {
                input.hide_soft_input();
            }
            self.request_transition(PanelType::None);
        }
    }

    /// Moves to `target` and starts one grouped slide for it.
    ///
    /// Returns `None` when the request is a no-op. A request while a slide is running
    /// replaces it, starting from the newly computed vector.
    pub fn request_transition(&mut self, target: PanelType) -> Option<Transition> {
        // An explicit request supersedes a collapse still waiting on `reset()`.
        self.timers
            .cancel_where(|task| *task == Deferred::SettleReset);
        if target != PanelType::InputMethod {
            self.timers
                .cancel_where(|task| *task == Deferred::ShowSoftInput);
        }
        self.apply_transition(target)
    }

    /// Collapses everything back to `None` if a panel was opened since the last reset.
    pub fn reset(&mut self) -> bool {
        if !self.active {
            return false;
        }

        tracing::debug!(current = %self.machine.current(), "panel reset");
        if let Some(input) = self.views.input_panel.as_deref_mut() {
            input.hide_soft_input();
            input.set_expression_toggle(ExpressionToggle::Emoji);
        }

        let now = self.clock.now();
        self.timers.cancel_where(|task| {
            matches!(task, Deferred::SettleReset | Deferred::ShowSoftInput)
        });
        self.timers
            .schedule(now, self.config.reset_settle_delay, Deferred::SettleReset);
        // Cleared before the settle fires so a second reset in the window is a no-op.
        self.active = false;
        self.events.publish(PanelEvent::Reset);
        true
    }

    pub fn on_voice_tapped(&mut self) -> Option<Transition> {
        let returning = self.machine.current() == PanelType::Voice;
        if let Some(input) = self.views.input_panel.as_deref_mut() {
            input.set_expression_toggle(ExpressionToggle::Emoji);
            if returning {
                input.set_entry_mode(EntryMode::Text);
                input.show_soft_input();
                input.set_text_input_enabled(true);
            } else {
                input.set_entry_mode(EntryMode::Voice);
                input.hide_soft_input();
            }
        }

        if returning {
            self.request_transition(PanelType::InputMethod)
        } else {
            self.request_transition(PanelType::Voice)
        }
    }

    pub fn on_expression_tapped(&mut self) -> Option<Transition> {
        let returning = self.machine.current() == PanelType::Expression;
        if let Some(input) = self.views.input_panel.as_deref_mut() {
            input.set_entry_mode(EntryMode::Text);
            if returning {
                input.set_expression_toggle(ExpressionToggle::Emoji);
                input.show_soft_input();
                input.set_text_input_enabled(true);
            } else {
                input.set_expression_toggle(ExpressionToggle::Keyboard);
                input.hide_soft_input();
            }
        }

        if returning {
            self.request_transition(PanelType::InputMethod)
        } else {
            self.request_transition(PanelType::Expression)
        }
    }

    pub fn on_more_tapped(&mut self) -> Option<Transition> {
        let returning = self.machine.current() == PanelType::More;
        if let Some(input) = self.views.input_panel.as_deref_mut() {
            input.set_expression_toggle(ExpressionToggle::Emoji);
            input.set_entry_mode(EntryMode::Text);
            if returning {
                input.show_soft_input();
                input.set_text_input_enabled(true);
            } else {
                input.hide_soft_input();
            }
        }

        if returning {
            self.request_transition(PanelType::InputMethod)
        } else {
            self.request_transition(PanelType::More)
        }
    }

    /// Handles a tap on the text field. Returns true when the tap was consumed to
    /// bring the keyboard up; while the keyboard is already open the field keeps it.
    pub fn on_text_field_tapped(&mut self) -> bool {
        if self.keyboard_open {
            return false;
        }

        let now = self.clock.now();
        self.timers.cancel_where(|task| *task == Deferred::ShowSoftInput);
        self.timers
            .schedule(now, self.config.soft_input_delay, Deferred::ShowSoftInput);

        if let Some(input) = self.views.input_panel.as_deref_mut() {
            input.set_text_input_enabled(true);
            input.set_expression_toggle(ExpressionToggle::Emoji);
        }
        self.request_transition(PanelType::InputMethod);
        true
    }

    /// Runs due deferred tasks and advances the running slide.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        for task in self.timers.take_due(now) {
            match task {
                Deferred::SettleReset => {
                    self.apply_transition(PanelType::None);
                }
                Deferred::ShowSoftInput => {
                    if self.machine.current() != PanelType::InputMethod {
                        continue;
                    }
                    if let Some(input) = self.views.input_panel.as_deref_mut() {
                        input.show_soft_input();
                    }
                }
            }
        }

        // Deferred tasks may have restarted the slide; sample it at the same instant.
        self.advance_slide(now);
    }

    /// Drops every view and pending task and detaches the probe overlay.
    pub fn release(&mut self, host: &mut dyn OverlayHost) {
        if let Some(input) = self.views.input_panel.as_deref_mut() {
            input.hide_soft_input();
        }

        let canceled = self.timers.cancel_all();
        self.slide = None;
        self.active = false;
        self.views = PanelViews::default();
        self.probe.detach(host);
        tracing::debug!(canceled, "panel coordinator released");
        self.events.publish(PanelEvent::Released);
    }

    fn apply_transition(&mut self, target: PanelType) -> Option<Transition> {
        let transition = self.machine.request(target, &self.heights)?;
        self.active = target != PanelType::None;

        // Vacated panels vanish at once so two panels never overlap mid-slide.
        match target {
            PanelType::Expression => {
                if let Some(panel) = self.views.more_panel.as_deref_mut() {
                    panel.hide();
                }
                if let Some(panel) = self.views.expression_panel.as_deref_mut() {
                    panel.show();
                }
            }
            PanelType::More => {
                if let Some(panel) = self.views.expression_panel.as_deref_mut() {
                    panel.hide();
                }
                if let Some(panel) = self.views.more_panel.as_deref_mut() {
                    panel.show();
                }
            }
            PanelType::None | PanelType::InputMethod | PanelType::Voice => {
                if let Some(panel) = self.views.expression_panel.as_deref_mut() {
                    panel.hide();
                }
                if let Some(panel) = self.views.more_panel.as_deref_mut() {
                    panel.hide();
                }
            }
        }

        let now = self.clock.now();
        let slide = SlideGroup::new(
            transition,
            self.slide_targets(target),
            now,
            self.config.animation_duration,
            Easing::Decelerate,
        );
        self.slide = Some(slide);
        self.advance_slide(now);
        self.events.publish(PanelEvent::TransitionStarted(transition));
        Some(transition)
    }

    fn slide_targets(&self, target: PanelType) -> Vec<SlideTarget> {
        let mut targets = Vec::with_capacity(3);
        if self.views.input_panel.is_some() {
            targets.push(SlideTarget::InputPanel);
        }
        if self.config.animate_message_list && self.views.message_list.is_some() {
            targets.push(SlideTarget::MessageList);
        }
        match target {
            PanelType::Expression if self.views.expression_panel.is_some() => {
                targets.push(SlideTarget::ExpressionPanel);
            }
            PanelType::More if self.views.more_panel.is_some() => {
                targets.push(SlideTarget::MorePanel);
            }
            _ => {}
        }
        targets
    }

    fn advance_slide(&mut self, now: Instant) {
        let Some(slide) = self.slide.as_ref() else {
            return;
        };

        let frame = slide.frame(now).collect::<Vec<_>>();
        let finished = slide.is_finished(now);
        let target = slide.transition().target;

        for (leg, value) in frame {
            match leg {
                SlideTarget::InputPanel => {
                    if let Some(panel) = self.views.input_panel.as_deref_mut() {
                        panel.set_translation_y(value);
                    }
                }
                SlideTarget::MessageList => {
                    if let Some(list) = self.views.message_list.as_deref_mut() {
                        list.set_translation_y(value);
                    }
                }
                SlideTarget::ExpressionPanel => {
                    if let Some(panel) = self.views.expression_panel.as_deref_mut() {
                        panel.set_translation_y(value);
                    }
                }
                SlideTarget::MorePanel => {
                    if let Some(panel) = self.views.more_panel.as_deref_mut() {
                        panel.set_translation_y(value);
                    }
                }
            }
        }

        if finished {
            self.slide = None;
            // Re-layout after the slide settles; translated views can be left clipped.
            if let Some(list) = self.views.message_list.as_deref_mut() {
                list.request_layout();
            }
            if let Some(panel) = self.views.expression_panel.as_deref_mut() {
                panel.request_layout();
            }
            if let Some(panel) = self.views.more_panel.as_deref_mut() {
                panel.request_layout();
            }
            self.events.publish(PanelEvent::TransitionFinished { target });
        }
    }

    fn measure_panels(&mut self) {
        let keyboard = self.heights.keyboard;

        let input_height = self
            .views
            .input_panel
            .as_deref()
            .map(|panel| panel.height(keyboard))
            .filter(|height| *height > 0.0)
            .unwrap_or(keyboard);
        self.heights.set(PanelType::InputMethod, input_height);

        if let Some(panel) = self.views.expression_panel.as_deref() {
            self.heights
                .set(PanelType::Expression, panel.height(keyboard));
        }
        if let Some(panel) = self.views.more_panel.as_deref() {
            self.heights.set(PanelType::More, panel.height(keyboard));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heights::MemoryHeightStore;
    use crate::machine::TransitionVector;
    use crate::probe::{OverlayId, OverlaySpec};
    use crate::surface::{PanelSizing, SharedInputPanel, SharedPanel, SoftInputRequest};
    use crate::timer::ManualClock;

    struct Fixture {
        coordinator: PanelCoordinator,
        clock: ManualClock,
        input: SharedInputPanel,
        expression: SharedPanel,
        more: SharedPanel,
        list: SharedPanel,
        events: PanelEventStream,
    }

    fn fixture() -> Fixture {
        let clock = ManualClock::new();
        let mut coordinator = PanelCoordinator::new(
            CoordinatorConfig::new(2000.0),
            Rc::new(MemoryHeightStore::new()),
            Rc::new(clock.clone()),
        );
        let events = coordinator.subscribe();

        let input = SharedInputPanel::new(PanelSizing::Fixed(300.0));
        let expression = SharedPanel::new(PanelSizing::Fixed(400.0));
        let more = SharedPanel::new(PanelSizing::Fixed(350.0));
        let list = SharedPanel::new(PanelSizing::Fixed(0.0));
        coordinator.bind(
            PanelViews::new()
                .with_input_panel(input.clone())
                .with_expression_panel(expression.clone())
                .with_more_panel(more.clone())
                .with_message_list(list.clone()),
        );

        Fixture {
            coordinator,
            clock,
            input,
            expression,
            more,
            list,
            events,
        }
    }

    fn finish_slide(fixture: &mut Fixture) {
        fixture.clock.advance(DEFAULT_ANIMATION_DURATION);
        fixture.coordinator.tick();
    }

    #[derive(Default)]
    struct CountingHost {
        attached: usize,
    }

    impl OverlayHost for CountingHost {
        fn attach_overlay(&mut self, _spec: OverlaySpec) -> OverlayId {
            self.attached += 1;
            OverlayId(self.attached as u64)
        }

        fn detach_overlay(&mut self, _overlay: OverlayId) {
            self.attached -= 1;
        }
    }

    #[test]
    fn bind_hides_side_panels_and_records_heights() {
        let fixture = fixture();
        assert!(!fixture.expression.is_visible());
        assert!(!fixture.more.is_visible());

        let heights = fixture.coordinator.heights();
        assert_eq!(heights.input_panel, 300.0);
        assert_eq!(heights.expression_panel, 400.0);
        assert_eq!(heights.more_panel, 350.0);
        assert_eq!(heights.keyboard, 800.0);
    }

    #[test]
    fn slide_moves_every_participant_by_the_same_vector() {
        let mut fixture = fixture();
        let transition = fixture.coordinator.request_transition(PanelType::Expression);
        assert_eq!(
            transition.map(|transition| transition.vector),
            Some(TransitionVector::new(0.0, -400.0))
        );
        assert!(fixture.expression.is_visible());
        assert!(fixture.coordinator.is_animating());

        fixture.clock.advance(Duration::from_millis(125));
        fixture.coordinator.tick();
        assert_eq!(fixture.input.translation_y(), -300.0);
        assert_eq!(fixture.list.translation_y(), -300.0);
        assert_eq!(fixture.expression.translation_y(), -300.0);

        fixture.clock.advance(Duration::from_millis(125));
        fixture.coordinator.tick();
        assert!(!fixture.coordinator.is_animating());
        assert_eq!(fixture.input.translation_y(), -400.0);
        assert_eq!(fixture.list.snapshot().layout_requests, 1);
        assert_eq!(fixture.expression.snapshot().layout_requests, 1);
        assert_eq!(fixture.more.snapshot().layout_requests, 1);
    }

    #[test]
    fn message_list_can_sit_out_the_slide() {
        let mut fixture = fixture();
        fixture.coordinator.set_animate_message_list(false);
        fixture.coordinator.request_transition(PanelType::More);
        finish_slide(&mut fixture);

        assert_eq!(fixture.input.translation_y(), -350.0);
        assert_eq!(fixture.more.translation_y(), -350.0);
        assert_eq!(fixture.list.translation_y(), 0.0);
    }

    #[test]
    fn switching_panels_hides_the_vacated_one_immediately() {
        let mut fixture = fixture();
        fixture.coordinator.request_transition(PanelType::Expression);
        finish_slide(&mut fixture);

        fixture.coordinator.request_transition(PanelType::More);
        assert!(!fixture.expression.is_visible());
        assert!(fixture.more.is_visible());
        // The vacated panel keeps its last offset; it simply stops rendering.
        assert_eq!(fixture.expression.translation_y(), -400.0);
        assert_eq!(fixture.more.translation_y(), -400.0);
    }

    #[test]
    fn reset_is_a_no_op_when_inactive() {
        let mut fixture = fixture();
        fixture.events.drain();
        assert!(!fixture.coordinator.reset());
        assert!(!fixture.coordinator.is_busy());
        assert!(fixture.events.drain().is_empty());
        assert_eq!(fixture.coordinator.current_panel(), PanelType::None);
    }

    #[test]
    fn reset_collapses_after_settle_delay() {
        let mut fixture = fixture();
        fixture.coordinator.on_expression_tapped();
        finish_slide(&mut fixture);
        assert_eq!(
            fixture.input.snapshot().expression_toggle,
            ExpressionToggle::Keyboard
        );

        assert!(fixture.coordinator.reset());
        assert!(!fixture.coordinator.is_active());
        assert!(!fixture.coordinator.reset());
        assert_eq!(
            fixture.input.snapshot().expression_toggle,
            ExpressionToggle::Emoji
        );
        assert_eq!(
            fixture.input.take_soft_input_request(),
            Some(SoftInputRequest::Hide)
        );

        fixture.clock.advance(Duration::from_millis(50));
        fixture.coordinator.tick();
        assert_eq!(fixture.coordinator.current_panel(), PanelType::Expression);

        fixture.clock.advance(Duration::from_millis(50));
        fixture.coordinator.tick();
        assert_eq!(fixture.coordinator.current_panel(), PanelType::None);
        assert!(!fixture.expression.is_visible());
    }

    #[test]
    fn explicit_request_cancels_pending_reset() {
        let mut fixture = fixture();
        fixture.coordinator.request_transition(PanelType::More);
        finish_slide(&mut fixture);
        fixture.coordinator.reset();

        fixture.coordinator.request_transition(PanelType::Expression);
        fixture.clock.advance(Duration::from_secs(1));
        fixture.coordinator.tick();
        assert_eq!(fixture.coordinator.current_panel(), PanelType::Expression);
    }

    #[test]
    fn tapping_the_active_panel_button_returns_to_keyboard() {
        let mut fixture = fixture();
        fixture.coordinator.on_more_tapped();
        assert_eq!(
            fixture.input.take_soft_input_request(),
            Some(SoftInputRequest::Hide)
        );

        let transition = fixture.coordinator.on_more_tapped();
        assert_eq!(
            transition.map(|transition| (transition.previous, transition.target)),
            Some((PanelType::More, PanelType::InputMethod))
        );
        assert_eq!(
            fixture.input.take_soft_input_request(),
            Some(SoftInputRequest::Show)
        );
        assert!(!fixture.more.is_visible());
    }

    #[test]
    fn voice_mode_swaps_entry_and_back() {
        let mut fixture = fixture();
        fixture.coordinator.on_voice_tapped();
        assert_eq!(fixture.input.snapshot().entry_mode, EntryMode::Voice);
        assert_eq!(fixture.coordinator.current_panel(), PanelType::Voice);

        fixture.coordinator.on_voice_tapped();
        assert_eq!(fixture.input.snapshot().entry_mode, EntryMode::Text);
        assert_eq!(fixture.coordinator.current_panel(), PanelType::InputMethod);
    }

    #[test]
    fn text_field_tap_defers_soft_input() {
        let mut fixture = fixture();
        assert!(fixture.coordinator.on_text_field_tapped());
        assert_eq!(fixture.coordinator.current_panel(), PanelType::InputMethod);
        assert!(fixture.input.snapshot().text_input_enabled);
        assert_eq!(fixture.input.take_soft_input_request(), None);

        fixture.clock.advance(DEFAULT_SOFT_INPUT_DELAY);
        fixture.coordinator.tick();
        assert_eq!(
            fixture.input.take_soft_input_request(),
            Some(SoftInputRequest::Show)
        );

        fixture.coordinator.on_keyboard_opened(640.0);
        assert!(!fixture.coordinator.on_text_field_tapped());
    }

    #[test]
    fn panel_tap_drops_pending_soft_input() {
        let mut fixture = fixture();
        assert!(fixture.coordinator.on_text_field_tapped());
        fixture.coordinator.on_expression_tapped();
        assert_eq!(
            fixture.input.take_soft_input_request(),
            Some(SoftInputRequest::Hide)
        );

        fixture.clock.advance(DEFAULT_SOFT_INPUT_DELAY);
        fixture.coordinator.tick();
        assert_eq!(fixture.coordinator.current_panel(), PanelType::Expression);
        assert_eq!(fixture.input.take_soft_input_request(), None);
    }

    #[test]
    fn reset_drops_pending_soft_input() {
        let mut fixture = fixture();
        assert!(fixture.coordinator.on_text_field_tapped());
        assert!(fixture.coordinator.reset());
        assert_eq!(
            fixture.input.take_soft_input_request(),
            Some(SoftInputRequest::Hide)
        );

        fixture.clock.advance(DEFAULT_SOFT_INPUT_DELAY);
        fixture.coordinator.tick();
        assert_eq!(fixture.coordinator.current_panel(), PanelType::None);
        assert_eq!(fixture.input.take_soft_input_request(), None);
        assert!(!fixture.coordinator.reset());
    }

    #[test]
    fn keyboard_open_updates_cache_and_store() {
        let clock = ManualClock::new();
        let store = MemoryHeightStore::new();
        let mut coordinator = PanelCoordinator::new(
            CoordinatorConfig::new(2000.0),
            Rc::new(store.clone()),
            Rc::new(clock),
        );
        let expression = SharedPanel::new(PanelSizing::KeyboardPlus(36.0));
        coordinator.bind(PanelViews::new().with_expression_panel(expression));
        assert_eq!(coordinator.heights().expression_panel, 836.0);

        coordinator.on_keyboard_opened(0.0);
        assert_eq!(store.keyboard_height(), None);

        coordinator.on_keyboard_opened(650.0);
        assert_eq!(store.keyboard_height(), Some(650.0));
        assert_eq!(coordinator.heights().keyboard, 650.0);
        assert_eq!(coordinator.heights().input_panel, 650.0);
        assert_eq!(coordinator.heights().expression_panel, 686.0);
    }

    #[test]
    fn unbound_views_only_drop_their_leg() {
        let clock = ManualClock::new();
        let mut coordinator = PanelCoordinator::new(
            CoordinatorConfig::new(1000.0),
            Rc::new(MemoryHeightStore::new()),
            Rc::new(clock.clone()),
        );

        let transition = coordinator.request_transition(PanelType::Expression);
        assert!(transition.is_some());
        clock.advance(DEFAULT_ANIMATION_DURATION);
        coordinator.tick();
        assert!(!coordinator.is_animating());
        assert!(coordinator.on_text_field_tapped());
    }

    #[test]
    fn release_cancels_work_and_detaches_probe() {
        let mut fixture = fixture();
        let mut host = CountingHost::default();
        fixture.coordinator.attach_probe(&mut host);
        assert_eq!(host.attached, 1);

        fixture.coordinator.on_text_field_tapped();
        fixture.coordinator.release(&mut host);
        assert_eq!(host.attached, 0);
        assert!(!fixture.coordinator.is_busy());

        fixture.clock.advance(Duration::from_secs(1));
        fixture.coordinator.tick();
        // The deferred focus never reaches the dropped input bar.
        assert_eq!(
            fixture.input.take_soft_input_request(),
            Some(SoftInputRequest::Hide)
        );
        let events = fixture.events.drain();
        assert_eq!(events.last(), Some(&PanelEvent::Released));
    }

    #[test]
    fn probe_edges_drive_keyboard_events() {
        let mut fixture = fixture();
        let mut host = CountingHost::default();
        fixture.coordinator.attach_probe(&mut host);
        fixture.events.drain();

        fixture.coordinator.on_layout(VisibleFrame::new(0.0, 2000.0));
        fixture.coordinator.on_layout(VisibleFrame::new(0.0, 1300.0));
        fixture.coordinator.on_layout(VisibleFrame::new(0.0, 1300.0));
        fixture.coordinator.on_layout(VisibleFrame::new(0.0, 2000.0));

        assert_eq!(
            fixture.events.drain(),
            vec![
                PanelEvent::KeyboardOpened { height: 700.0 },
                PanelEvent::KeyboardClosed,
            ]
        );
    }
}
