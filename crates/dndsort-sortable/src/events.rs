#![forbid(unsafe_code)]

//! Notification payloads and host commands emitted by the container.

use dndsort_core::sensor::{CancelReason, SensorKind};
use serde::{Deserialize, Serialize};

use crate::reorder::UnchangedReason;
use crate::session::{SessionEffect, SessionTransition};

/// A drag began.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragStart<K> {
    pub active_id: K,
    pub index: usize,
    pub origin: SensorKind,
}

/// The over target changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragOver<K> {
    pub active_id: K,
    pub over_id: Option<K>,
}

/// A drag ended. `from == to` means the order is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEnd<K> {
    pub active_id: K,
    pub over_id: Option<K>,
    /// Identifier order after the drop.
    pub order: Vec<K>,
    pub from: usize,
    pub to: usize,
    /// Set when the order is unchanged.
    pub unchanged: Option<UnchangedReason>,
}

impl<K> DragEnd<K> {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// A drag was cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragCancel<K> {
    pub active_id: K,
    pub reason: CancelReason,
}

/// The committed order changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderChanged<K> {
    pub order: Vec<K>,
    pub from: usize,
    pub to: usize,
}

/// Live `(active, over)` feedback. Both `None` once the session is over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback<K> {
    pub active_id: Option<K>,
    pub over_id: Option<K>,
}

/// Host input-capture command.
///
/// Hosts wire `Acquire` to pointer capture or a global key listener and
/// `Release` to its teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CaptureCommand {
    Acquire { sensor: SensorKind },
    Release { sensor: SensorKind },
}

/// Everything one dispatch produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch<K> {
    pub transitions: Vec<SessionTransition<K>>,
    pub capture: Vec<CaptureCommand>,
}

impl<K> Default for Dispatch<K> {
    fn default() -> Self {
        Self {
            transitions: Vec::new(),
            capture: Vec::new(),
        }
    }
}

impl<K> Dispatch<K> {
    /// No transitions and no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty() && self.capture.is_empty()
    }

    /// Whether any transition committed a new order.
    #[must_use]
    pub fn order_changed(&self) -> bool {
        self.transitions
            .iter()
            .any(|t| matches!(t.effect, SessionEffect::Committed { .. }))
    }

    /// Effects of every transition, in order.
    pub fn effects(&self) -> impl Iterator<Item = &SessionEffect<K>> {
        self.transitions.iter().map(|t| &t.effect)
    }

    pub fn extend(&mut self, other: Self) {
        self.transitions.extend(other.transitions);
        self.capture.extend(other.capture);
    }
}
