pub mod animation;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod grid;
pub mod heights;
pub mod machine;
pub mod panel_type;
pub mod probe;
pub mod surface;
pub mod timer;

pub use animation::{DEFAULT_ANIMATION_DURATION, Easing, SlideGroup, SlideLeg, SlideTarget};
pub use coordinator::{CoordinatorConfig, PanelCoordinator, PanelViews};
pub use error::{PanelError, PanelResult};
pub use events::{PanelEvent, PanelEventStream};
pub use grid::{CellChange, CellVisibility, GridLayout, GridScrollAdjuster};
pub use heights::{HeightStore, MemoryHeightStore, PanelHeights, fallback_keyboard_height};
pub use machine::{PanelStateMachine, Transition, TransitionVector};
pub use panel_type::PanelType;
pub use probe::{KeyboardEdge, KeyboardProbe, OverlayHost, OverlayId, OverlaySpec, VisibleFrame};
pub use surface::{
    EntryMode, ExpressionToggle, InputPanel, Panel, PanelSizing, SharedInputPanel, SharedPanel,
    SoftInputRequest, Surface,
};
pub use timer::{Clock, ManualClock, SystemClock, TimerId, TimerQueue};
