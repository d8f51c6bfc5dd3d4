#![forbid(unsafe_code)]

//! Closest-center collision resolution.
//!
//! Picks the single item the dragged item is "over" by comparing the
//! projected center of the active item with each candidate's center.
//!
//! # Invariants
//!
//! 1. The active item is never its own geometric candidate. Its vacated home
//!    slot can still win through [`CollisionResolver::resolve_from_home`],
//!    which reports the active item itself ("no move").
//! 2. Candidates are scanned in collection order with a strict `<`
//!    comparison, so equal distances resolve to the lowest index.
//! 3. Candidates with no rect or a non-finite rect are skipped.
//! 4. With a proximity threshold, a candidate only qualifies when the edge
//!    gap between it and the projected rect is within the threshold.
//!
//! # Complexity
//!
//! One linear pass over the collection: O(n) per move.

use dndsort_core::geometry::{Orientation, Rect};
use serde::{Deserialize, Serialize};

use crate::bounds::{BoundsSnapshot, ItemId};

/// Distance measure between centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "metric", content = "orientation", rename_all = "snake_case")]
pub enum CollisionMetric {
    /// Euclidean distance between centers (grids).
    ClosestCenter,
    /// Distance along one axis only (lists).
    ClosestCenterOnAxis(Orientation),
}

impl CollisionMetric {
    /// Distance between the centers of `a` and `b`.
    #[must_use]
    pub fn distance(self, a: &Rect, b: &Rect) -> f32 {
        let (ca, cb) = (a.center(), b.center());
        match self {
            Self::ClosestCenter => ca.distance(cb),
            Self::ClosestCenterOnAxis(axis) => (axis.main(ca) - axis.main(cb)).abs(),
        }
    }
}

/// The winning candidate of one resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Collision<K> {
    pub id: K,
    /// Index in the collection that was scanned.
    pub index: usize,
    pub distance: f32,
}

/// Resolver configuration: metric plus optional proximity threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResolver {
    metric: CollisionMetric,
    proximity_px: Option<f32>,
}

impl CollisionResolver {
    #[must_use]
    pub const fn new(metric: CollisionMetric) -> Self {
        Self {
            metric,
            proximity_px: None,
        }
    }

    /// Only accept candidates whose edge gap to the projected rect is at
    /// most `threshold_px`.
    #[must_use]
    pub const fn with_proximity(mut self, threshold_px: Option<f32>) -> Self {
        self.proximity_px = threshold_px;
        self
    }

    #[must_use]
    pub const fn metric(&self) -> CollisionMetric {
        self.metric
    }

    #[must_use]
    pub const fn proximity(&self) -> Option<f32> {
        self.proximity_px
    }

    /// Resolve the item `active` is over when its rect is at `projected`.
    ///
    /// Returns `None` when no candidate qualifies (empty collection, only the
    /// active item, nothing within proximity, or a non-finite projection).
    #[must_use]
    pub fn resolve<K: ItemId>(
        &self,
        active: &K,
        projected: Rect,
        order: &[K],
        bounds: &BoundsSnapshot<K>,
    ) -> Option<Collision<K>> {
        if !projected.is_finite() {
            return None;
        }
        let mut best: Option<(usize, f32)> = None;
        for (index, id) in order.iter().enumerate() {
            if id == active {
                continue;
            }
            let Some(rect) = bounds.usable(id) else {
                continue;
            };
            if let Some(threshold) = self.proximity_px
                && projected.gap(&rect) > threshold
            {
                continue;
            }
            let distance = self.metric.distance(&projected, &rect);
            if !distance.is_finite() {
                continue;
            }
            match best {
                Some((_, current)) if distance >= current => {}
                _ => best = Some((index, distance)),
            }
        }
        best.map(|(index, distance)| Collision {
            id: order[index].clone(),
            index,
            distance,
        })
    }

    /// Like [`resolve`](Self::resolve), but also scores the active item's
    /// `home` rect at `home_index`.
    ///
    /// When the projection is strictly nearer to home than to every
    /// candidate, or ties with a candidate at a higher index, the active item
    /// itself is returned. Home is subject to the same proximity filter.
    #[must_use]
    pub fn resolve_from_home<K: ItemId>(
        &self,
        active: &K,
        home: Rect,
        home_index: usize,
        projected: Rect,
        order: &[K],
        bounds: &BoundsSnapshot<K>,
    ) -> Option<Collision<K>> {
        let candidate = self.resolve(active, projected, order, bounds);
        if !projected.is_finite() || !home.is_finite() {
            return candidate;
        }
        if let Some(threshold) = self.proximity_px
            && projected.gap(&home) > threshold
        {
            return candidate;
        }
        let distance = self.metric.distance(&projected, &home);
        if !distance.is_finite() {
            return candidate;
        }
        let home_wins = match &candidate {
            None => true,
            Some(best) => {
                distance < best.distance || (distance == best.distance && home_index < best.index)
            }
        };
        if home_wins {
            Some(Collision {
                id: active.clone(),
                index: home_index,
                distance,
            })
        } else {
            candidate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::stacked;
    use dndsort_core::geometry::Vector;

    #[test]
    fn picks_closest_center_and_skips_active() {
        let order = [1u32, 2, 3, 4];
        let bounds = stacked(&order, 100.0, 10.0, 0.0);
        let resolver = CollisionResolver::new(CollisionMetric::ClosestCenterOnAxis(
            Orientation::Vertical,
        ));
        // Item 1 dragged down onto item 3's slot.
        let projected = Rect::new(0.0, 21.0, 100.0, 10.0);
        let hit = resolver.resolve(&1, projected, &order, &bounds).expect("hit");
        assert_eq!(hit.id, 3);
        assert_eq!(hit.index, 2);

        // Resting in its own slot: the active item is excluded.
        let home = bounds.get(&1).expect("rect");
        let hit = resolver.resolve(&1, home, &order, &bounds).expect("hit");
        assert_eq!(hit.id, 2);
    }

    #[test]
    fn home_slot_wins_until_a_neighbour_is_nearer() {
        let order = [1u32, 2, 3];
        let bounds = stacked(&order, 100.0, 10.0, 0.0);
        let resolver = CollisionResolver::new(CollisionMetric::ClosestCenterOnAxis(
            Orientation::Vertical,
        ));
        let home = bounds.get(&2).expect("rect");
        let at = |dy: f32| {
            resolver
                .resolve_from_home(&2, home, 1, home.translate(Vector::new(0.0, dy)), &order, &bounds)
                .map(|c| (c.id, c.index))
        };
        assert_eq!(at(0.5), Some((2, 1)));
        assert_eq!(at(-4.9), Some((2, 1)));
        assert_eq!(at(6.0), Some((3, 2)));
        // Halfway up: tie with item 1 at index 0, which is lower than home.
        assert_eq!(at(-5.0), Some((1, 0)));
        // Halfway down: tie with item 3 at index 2, home keeps it.
        assert_eq!(at(5.0), Some((2, 1)));
    }

    #[test]
    fn home_slot_respects_proximity() {
        let order = [1u32, 2];
        let bounds = stacked(&order, 10.0, 10.0, 0.0);
        let resolver =
            CollisionResolver::new(CollisionMetric::ClosestCenter).with_proximity(Some(5.0));
        let home = bounds.get(&1).expect("rect");
        let far = Rect::new(500.0, 0.0, 10.0, 10.0);
        assert!(resolver.resolve_from_home(&1, home, 0, far, &order, &bounds).is_none());
        let only = [1u32];
        assert_eq!(
            resolver
                .resolve_from_home(&1, home, 0, home, &only, &bounds)
                .map(|c| c.id),
            Some(1)
        );
    }

    #[test]
    fn ties_resolve_to_lowest_index() {
        let order = ["a", "b", "c"];
        let bounds = BoundsSnapshot::new()
            .with("a", Rect::new(0.0, 0.0, 10.0, 10.0))
            .with("b", Rect::new(0.0, -20.0, 10.0, 10.0))
            .with("c", Rect::new(0.0, 20.0, 10.0, 10.0));
        let resolver = CollisionResolver::new(CollisionMetric::ClosestCenter);
        let hit = resolver
            .resolve(&"a", Rect::new(0.0, 0.0, 10.0, 10.0), &order, &bounds)
            .expect("hit");
        assert_eq!(hit.id, "b");
    }

    #[test]
    fn proximity_threshold_can_yield_no_target() {
        let order = [1u32, 2];
        let bounds = stacked(&order, 10.0, 10.0, 50.0);
        let resolver =
            CollisionResolver::new(CollisionMetric::ClosestCenter).with_proximity(Some(5.0));
        let far = Rect::new(500.0, 500.0, 10.0, 10.0);
        assert!(resolver.resolve(&1, far, &order, &bounds).is_none());

        let near = Rect::new(0.0, 55.0, 10.0, 10.0);
        assert_eq!(
            resolver.resolve(&1, near, &order, &bounds).map(|c| c.id),
            Some(2)
        );
    }

    #[test]
    fn missing_and_non_finite_rects_are_skipped() {
        let order = [1u32, 2, 3];
        let bounds = BoundsSnapshot::new()
            .with(1, Rect::new(0.0, 0.0, 10.0, 10.0))
            .with(2, Rect::new(f32::INFINITY, 0.0, 10.0, 10.0));
        let resolver = CollisionResolver::new(CollisionMetric::ClosestCenter);
        assert!(
            resolver
                .resolve(&1, Rect::new(0.0, 0.0, 10.0, 10.0), &order, &bounds)
                .is_none()
        );
    }

    #[test]
    fn non_finite_projection_has_no_target() {
        let order = [1u32, 2];
        let bounds = stacked(&order, 10.0, 10.0, 0.0);
        let resolver = CollisionResolver::new(CollisionMetric::ClosestCenter);
        assert!(
            resolver
                .resolve(&1, Rect::new(f32::NAN, 0.0, 10.0, 10.0), &order, &bounds)
                .is_none()
        );
    }

    #[test]
    fn axis_metric_ignores_cross_axis() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(300.0, 4.0, 10.0, 10.0);
        let d = CollisionMetric::ClosestCenterOnAxis(Orientation::Vertical).distance(&a, &b);
        assert_eq!(d, 4.0);
    }
}
