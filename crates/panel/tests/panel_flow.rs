use std::rc::Rc;
use std::time::Duration;

use murmur_panel::{
    CoordinatorConfig, MemoryHeightStore, ManualClock, Panel, PanelCoordinator, PanelEvent,
    PanelSizing, PanelType, PanelViews, SharedInputPanel, SharedPanel, SoftInputRequest, Surface,
    TransitionVector,
};

struct Screen {
    coordinator: PanelCoordinator,
    clock: ManualClock,
    input: SharedInputPanel,
    expression: SharedPanel,
    more: SharedPanel,
}

fn screen() -> Screen {
    let clock = ManualClock::new();
    let mut coordinator = PanelCoordinator::new(
        CoordinatorConfig::new(1600.0),
        Rc::new(MemoryHeightStore::new()),
        Rc::new(clock.clone()),
    );
    let input = SharedInputPanel::new(PanelSizing::Fixed(300.0));
    let expression = SharedPanel::new(PanelSizing::Fixed(400.0));
    let more = SharedPanel::new(PanelSizing::Fixed(350.0));
    coordinator.bind(
        PanelViews::new()
            .with_input_panel(input.clone())
            .with_expression_panel(expression.clone())
            .with_more_panel(more.clone())
            .with_message_list(SharedPanel::new(PanelSizing::Fixed(0.0))),
    );

    Screen {
        coordinator,
        clock,
        input,
        expression,
        more,
    }
}

fn settle(screen: &mut Screen) {
    screen.clock.advance(Duration::from_millis(300));
    screen.coordinator.tick();
}

#[test]
fn emoji_keyboard_and_back_down() {
    let mut screen = screen();
    let mut events = screen.coordinator.subscribe();

    let transition = screen
        .coordinator
        .request_transition(PanelType::Expression)
        .map(|transition| transition.vector);
    assert_eq!(transition, Some(TransitionVector::new(0.0, -400.0)));
    assert!(!screen.more.is_visible());
    assert!(screen.expression.is_visible());
    settle(&mut screen);
    assert_eq!(screen.expression.translation_y(), -400.0);

    let transition = screen
        .coordinator
        .request_transition(PanelType::InputMethod)
        .map(|transition| transition.vector);
    assert_eq!(transition, Some(TransitionVector::new(-400.0, -300.0)));
    assert!(!screen.expression.is_visible());
    settle(&mut screen);

    screen.coordinator.on_keyboard_closed();
    assert_eq!(screen.coordinator.current_panel(), PanelType::None);
    assert_eq!(
        screen.input.take_soft_input_request(),
        Some(SoftInputRequest::Hide)
    );
    settle(&mut screen);
    assert_eq!(screen.input.translation_y(), 0.0);

    let targets = events
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            PanelEvent::TransitionStarted(transition) => {
                Some((transition.target, transition.vector))
            }
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(
        targets,
        vec![
            (PanelType::Expression, TransitionVector::new(0.0, -400.0)),
            (PanelType::InputMethod, TransitionVector::new(-400.0, -300.0)),
            (PanelType::None, TransitionVector::new(-300.0, 0.0)),
        ]
    );
}

#[test]
fn list_tap_reset_settles_to_none() {
    let mut screen = screen();
    screen.coordinator.on_more_tapped();
    settle(&mut screen);
    assert!(screen.coordinator.is_active());

    assert!(screen.coordinator.reset());
    settle(&mut screen);
    settle(&mut screen);
    assert_eq!(screen.coordinator.current_panel(), PanelType::None);
    assert!(!screen.more.is_visible());
    assert_eq!(screen.more.translation_y(), -350.0);
    assert_eq!(screen.input.translation_y(), 0.0);
}

#[tokio::test]
async fn events_arrive_on_the_stream() {
    let mut screen = screen();
    let mut events = screen.coordinator.subscribe();
    screen.coordinator.on_keyboard_opened(720.0);

    assert_eq!(
        events.recv().await,
        Some(PanelEvent::KeyboardOpened { height: 720.0 })
    );
    assert_eq!(screen.coordinator.heights().keyboard, 720.0);
}
