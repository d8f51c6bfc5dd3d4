#![forbid(unsafe_code)]

//! dndsort public facade crate.
//!
//! Re-exports the input layer (`dndsort-core`) and the sortable container
//! (`dndsort-sortable`) behind one dependency, plus a prelude and a unified
//! [`Error`].
//!
//! ```rust
//! use dndsort::prelude::*;
//!
//! let mut list = SortableList::new(vec![10u32, 20, 30], |n| *n, SortableConfig::list())?;
//! let bounds = stacked(list.ids(), 120.0, 20.0, 0.0);
//! let now = Instant::now();
//!
//! list.dispatch(&InputEvent::pointer_down(1, PointerDevice::Mouse, Some(30), Point::new(5.0, 45.0)), &bounds, now);
//! list.dispatch(&InputEvent::pointer_move(1, PointerDevice::Mouse, Point::new(5.0, 5.0)), &bounds, now);
//! let out = list.dispatch(&InputEvent::pointer_up(1, PointerDevice::Mouse, Point::new(5.0, 5.0)), &bounds, now);
//!
//! assert!(out.order_changed());
//! assert_eq!(list.items(), &[30, 10, 20]);
//! # Ok::<(), dndsort::Error>(())
//! ```

pub mod error;
#[cfg(feature = "tracing-json")]
pub mod logging;

pub use error::{Error, Result};

// --- Core re-exports -------------------------------------------------------

pub use dndsort_core::animation::{CubicBezier, Easing};
pub use dndsort_core::event::{
    InputEvent, KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerButton, PointerDevice,
    PointerEvent, PointerEventKind,
};
pub use dndsort_core::geometry::{Orientation, Point, Rect, Vector};
pub use dndsort_core::sensor::{
    ActivationConstraint, Arrangement, CancelReason, KeyboardSensor, MoveInput, PointerSensor,
    Sensor, SensorKind, SessionEvent,
};

// --- Sortable re-exports ---------------------------------------------------

pub use dndsort_sortable::bounds::{stacked, tiled};
pub use dndsort_sortable::{
    Announcement, Axis, BoundsSnapshot, CaptureCommand, Collision, CollisionMetric,
    CollisionResolver, ConfigError, Dispatch, DragCancel, DragEnd, DragOver, DragSession,
    DragStart, DropAnimation, Feedback, ItemId, ItemVisual, MAX_PENDING_ANNOUNCEMENTS,
    OrderChanged, OverlayFrame, OverlayPhase, Politeness, ReorderError,
    SCREEN_READER_INSTRUCTIONS, SensorId, SessionEffect, SessionPhase, SessionTransition,
    SortableConfig, SortableError, SortableList, Subscription, UnchangedReason, array_move,
    move_by_id, try_array_move,
};

pub use web_time::Instant;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BoundsSnapshot, CaptureCommand, Error, InputEvent, Instant, KeyCode, Orientation, Point,
        PointerDevice, Rect, Result, SortableConfig, SortableList, array_move, stacked, tiled,
    };

    pub use crate::{core, sortable};
}

pub use dndsort_core as core;
pub use dndsort_sortable as sortable;

/// Move the item identified by `active` to the slot of `over` in `items`.
///
/// Convenience over [`move_by_id`] for hosts that manage their own state and
/// only need the pure commit rule.
pub fn reorder_by_id<T: Clone, K: ItemId>(
    items: &[T],
    key: impl Fn(&T) -> K,
    active: &K,
    over: Option<&K>,
) -> Vec<T> {
    move_by_id(items, key, active, over).into_order()
}
