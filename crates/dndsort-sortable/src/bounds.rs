#![forbid(unsafe_code)]

//! Item identity and per-move bounds snapshots.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use dndsort_core::geometry::Rect;
use rustc_hash::FxHashMap;

/// Stable item identifier.
///
/// Blanket-implemented for every type with the required bounds, so integer
/// and string ids work directly.
pub trait ItemId: Clone + Eq + Hash + Debug + Display {}

impl<T: Clone + Eq + Hash + Debug + Display> ItemId for T {}

/// Rect per rendered item, captured by the host for one decision.
///
/// Items with no entry are treated as not rendered: they are skipped as
/// collision candidates and get no visual shift.
#[derive(Debug, Clone)]
pub struct BoundsSnapshot<K> {
    rects: FxHashMap<K, Rect>,
}

impl<K: ItemId> Default for BoundsSnapshot<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ItemId> BoundsSnapshot<K> {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rects: FxHashMap::default(),
        }
    }

    /// Create an empty snapshot with room for `capacity` items.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rects: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Record the rect for `id`, replacing any previous entry.
    pub fn insert(&mut self, id: K, rect: Rect) -> Option<Rect> {
        self.rects.insert(id, rect)
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, id: K, rect: Rect) -> Self {
        self.rects.insert(id, rect);
        self
    }

    /// Rect for `id`, if rendered.
    #[must_use]
    pub fn get(&self, id: &K) -> Option<Rect> {
        self.rects.get(id).copied()
    }

    /// Rect for `id` if rendered and finite.
    #[must_use]
    pub fn usable(&self, id: &K) -> Option<Rect> {
        self.get(id).filter(Rect::is_finite)
    }

    pub fn remove(&mut self, id: &K) -> Option<Rect> {
        self.rects.remove(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Rect)> {
        self.rects.iter()
    }
}

impl<K: ItemId> FromIterator<(K, Rect)> for BoundsSnapshot<K> {
    fn from_iter<I: IntoIterator<Item = (K, Rect)>>(iter: I) -> Self {
        Self {
            rects: iter.into_iter().collect(),
        }
    }
}

impl<K: ItemId> Extend<(K, Rect)> for BoundsSnapshot<K> {
    fn extend<I: IntoIterator<Item = (K, Rect)>>(&mut self, iter: I) {
        self.rects.extend(iter);
    }
}

/// Lay `ids` out as a vertical stack of `height`-tall rows, `gap` apart.
///
/// Convenience for hosts and tests with uniform rows.
#[must_use]
pub fn stacked<K: ItemId>(ids: &[K], width: f32, height: f32, gap: f32) -> BoundsSnapshot<K> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| {
            let y = i as f32 * (height + gap);
            (id.clone(), Rect::new(0.0, y, width, height))
        })
        .collect()
}

/// Lay `ids` out row-major in a grid of `columns` uniform cells.
#[must_use]
pub fn tiled<K: ItemId>(ids: &[K], columns: u16, cell: f32, gap: f32) -> BoundsSnapshot<K> {
    let columns = usize::from(columns.max(1));
    ids.iter()
        .enumerate()
        .map(|(i, id)| {
            let col = (i % columns) as f32;
            let row = (i / columns) as f32;
            let pitch = cell + gap;
            (id.clone(), Rect::new(col * pitch, row * pitch, cell, cell))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacked_rows_are_spaced() {
        let bounds = stacked(&[1u32, 2, 3], 100.0, 20.0, 4.0);
        assert_eq!(bounds.len(), 3);
        assert_eq!(bounds.get(&3), Some(Rect::new(0.0, 48.0, 100.0, 20.0)));
    }

    #[test]
    fn tiled_wraps_rows() {
        let bounds = tiled(&["a", "b", "c", "d", "e"], 2, 10.0, 0.0);
        assert_eq!(bounds.get(&"c"), Some(Rect::new(0.0, 10.0, 10.0, 10.0)));
        assert_eq!(bounds.get(&"e"), Some(Rect::new(0.0, 20.0, 10.0, 10.0)));
    }

    #[test]
    fn non_finite_rects_are_not_usable() {
        let bounds = BoundsSnapshot::new().with(1u8, Rect::new(f32::NAN, 0.0, 1.0, 1.0));
        assert!(bounds.get(&1).is_some());
        assert!(bounds.usable(&1).is_none());
    }
}
