#![forbid(unsafe_code)]

//! Stable single-element move.
//!
//! Removing the element at `from` and reinserting it at `to` keeps every
//! other element in its relative order. All functions are pure: the input
//! slice is never mutated and a fresh `Vec` is returned.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bounds::ItemId;

/// Reorder input errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderError {
    IndexOutOfBounds { index: usize, len: usize },
}

impl fmt::Display for ReorderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for collection of length {len}")
            }
        }
    }
}

impl std::error::Error for ReorderError {}

/// Move `items[from]` to position `to`, or return an error if either index is
/// out of range.
pub fn try_array_move<T: Clone>(items: &[T], from: usize, to: usize) -> Result<Vec<T>, ReorderError> {
    let len = items.len();
    for index in [from, to] {
        if index >= len {
            return Err(ReorderError::IndexOutOfBounds { index, len });
        }
    }
    let mut out = items.to_vec();
    let moved = out.remove(from);
    out.insert(to, moved);
    Ok(out)
}

/// Move `items[from]` to position `to`. Out-of-range indices return an
/// unchanged copy.
#[must_use]
pub fn array_move<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    try_array_move(items, from, to).unwrap_or_else(|_| items.to_vec())
}

/// Why a commit left the order unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnchangedReason {
    /// Dropped on its own slot.
    SameIndex,
    /// No over target at drop time.
    NoTarget,
    /// The active item is no longer in the collection.
    ActiveVanished,
    /// The over item is no longer in the collection.
    TargetVanished,
}

/// Result of a commit by identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum ReorderOutcome<T> {
    Moved {
        order: Vec<T>,
        from: usize,
        to: usize,
    },
    Unchanged {
        order: Vec<T>,
        reason: UnchangedReason,
    },
}

impl<T> ReorderOutcome<T> {
    /// The resulting order, moved or not.
    #[must_use]
    pub fn order(&self) -> &[T] {
        match self {
            Self::Moved { order, .. } | Self::Unchanged { order, .. } => order,
        }
    }

    #[must_use]
    pub fn into_order(self) -> Vec<T> {
        match self {
            Self::Moved { order, .. } | Self::Unchanged { order, .. } => order,
        }
    }

    #[must_use]
    pub const fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Position of `id` in `items` under `key`.
pub fn index_of<T, K: ItemId>(items: &[T], key: impl Fn(&T) -> K, id: &K) -> Option<usize> {
    items.iter().position(|item| key(item) == *id)
}

/// Move the item identified by `active` to the slot of `over`.
///
/// Both indices are resolved in `items`; a missing id or a same-slot drop
/// yields [`ReorderOutcome::Unchanged`].
pub fn move_by_id<T: Clone, K: ItemId>(
    items: &[T],
    key: impl Fn(&T) -> K,
    active: &K,
    over: Option<&K>,
) -> ReorderOutcome<T> {
    let unchanged = |reason| ReorderOutcome::Unchanged {
        order: items.to_vec(),
        reason,
    };
    let Some(from) = index_of(items, &key, active) else {
        return unchanged(UnchangedReason::ActiveVanished);
    };
    let Some(over) = over else {
        return unchanged(UnchangedReason::NoTarget);
    };
    let Some(to) = index_of(items, &key, over) else {
        return unchanged(UnchangedReason::TargetVanished);
    };
    if from == to {
        return unchanged(UnchangedReason::SameIndex);
    }
    ReorderOutcome::Moved {
        order: array_move(items, from, to),
        from,
        to,
    }
}
