#![forbid(unsafe_code)]

//! Sortable: drag sessions, collision resolution, and reordering.
//!
//! # Role in dndsort
//! `dndsort-sortable` consumes canonical session events from
//! `dndsort-core` sensors and turns them into reorder decisions, live reflow
//! previews, overlay frames, announcements, and listener notifications.
//!
//! # Primary responsibilities
//! - **Session**: the Idle/Dragging state machine with explicit transitions.
//! - **Collision**: closest-center target resolution over a bounds snapshot.
//! - **Reorder**: the pure `array_move` primitive and id-based commits.
//! - **Strategy**: per-item shifts for the live preview.
//! - **Overlay**: the floating proxy and its drop animation.
//! - **List**: [`SortableList`], the container wiring all of the above.
//!
//! # Example
//! ```rust
//! use dndsort_core::{InputEvent, KeyCode};
//! use dndsort_sortable::{SortableConfig, SortableList, bounds::stacked};
//! use web_time::Instant;
//!
//! let mut list = SortableList::new(vec!["a", "b", "c"], |s| *s, SortableConfig::list())?;
//! let bounds = stacked(list.ids(), 200.0, 24.0, 4.0);
//! let now = Instant::now();
//! list.dispatch(&InputEvent::key(KeyCode::Enter, Some("a")), &bounds, now);
//! list.dispatch(&InputEvent::key(KeyCode::Down, Some("a")), &bounds, now);
//! list.dispatch(&InputEvent::key(KeyCode::Enter, Some("a")), &bounds, now);
//! assert_eq!(list.items(), &["b", "a", "c"]);
//! # Ok::<(), dndsort_sortable::SortableError>(())
//! ```

pub mod announce;
pub mod bounds;
pub mod collision;
pub mod config;
pub mod error;
pub mod events;
pub mod list;
pub mod overlay;
pub mod reorder;
pub mod session;
pub mod strategy;
pub mod subscription;

pub use announce::{Announcement, Politeness, SCREEN_READER_INSTRUCTIONS};
pub use bounds::{BoundsSnapshot, ItemId};
pub use collision::{Collision, CollisionMetric, CollisionResolver};
pub use config::{Axis, ConfigError, SortableConfig};
pub use error::SortableError;
pub use events::{
    CaptureCommand, Dispatch, DragCancel, DragEnd, DragOver, DragStart, Feedback, OrderChanged,
};
pub use list::{ItemVisual, MAX_PENDING_ANNOUNCEMENTS, SensorId, SortableList};
pub use overlay::{DropAnimation, OverlayFrame, OverlayPhase, OverlayPresenter};
pub use reorder::{
    ReorderError, ReorderOutcome, UnchangedReason, array_move, move_by_id, try_array_move,
};
pub use session::{
    DragSession, SessionContext, SessionEffect, SessionMachine, SessionNoopReason, SessionPhase,
    SessionState, SessionTransition,
};
pub use subscription::{Emitter, Subscription};
