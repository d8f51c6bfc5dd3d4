#![forbid(unsafe_code)]

//! Live reflow preview: where each item would sit if the drag ended now.
//!
//! While the active item is over index `over`, every item between the two
//! slots shifts by one slot toward the active item's origin, and the active
//! item's in-list placeholder moves to `over`. The same rule serves lists and
//! grids because it is expressed over slot rects, not axes.

use dndsort_core::geometry::{Rect, Vector};

use crate::bounds::{BoundsSnapshot, ItemId};
use crate::reorder::array_move;

/// Slot whose rect item `index` moves into while `active` is over `over`.
#[must_use]
pub fn destination_slot(index: usize, active: usize, over: usize) -> usize {
    if index == active {
        over
    } else if active < over && index > active && index <= over {
        index - 1
    } else if over < active && index >= over && index < active {
        index + 1
    } else {
        index
    }
}

/// Translation for the item at `index`.
///
/// Zero when there is no over target, when over equals active, or when either
/// rect involved is missing from the snapshot.
#[must_use]
pub fn shift_for<K: ItemId>(
    order: &[K],
    bounds: &BoundsSnapshot<K>,
    index: usize,
    active: usize,
    over: Option<usize>,
) -> Vector {
    let Some(over) = over else {
        return Vector::ZERO;
    };
    let len = order.len();
    if over == active || index >= len || active >= len || over >= len {
        return Vector::ZERO;
    }
    let slot = destination_slot(index, active, over);
    match (bounds.usable(&order[index]), bounds.usable(&order[slot])) {
        (Some(current), Some(target)) => target.origin().delta_from(current.origin()),
        _ => Vector::ZERO,
    }
}

/// Translations for every item, computed by moving the slot rects.
#[must_use]
pub fn shifts<K: ItemId>(
    order: &[K],
    bounds: &BoundsSnapshot<K>,
    active: usize,
    over: Option<usize>,
) -> Vec<Vector> {
    let rects: Vec<Option<Rect>> = order.iter().map(|id| bounds.usable(id)).collect();
    let Some(over) = over.filter(|&over| over != active) else {
        return vec![Vector::ZERO; rects.len()];
    };
    let landed = array_move(&rects, over, active);
    rects
        .iter()
        .zip(&landed)
        .map(|(current, target)| match (current, target) {
            (Some(current), Some(target)) => target.origin().delta_from(current.origin()),
            _ => Vector::ZERO,
        })
        .collect()
}
