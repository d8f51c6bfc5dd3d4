//! Property-based invariants for reordering and drag sessions.
//!
//! ## Invariants
//!
//! 1. `array_move` is a permutation that lands `items[from]` at `to`.
//! 2. Out-of-range moves leave the slice unchanged.
//! 3. `destination_slot` is a bijection for any fixed `(active, over)`.
//! 4. `shifts` agrees with `shift_for` item by item.
//! 5. Collision resolution never returns the active item, and a pointer
//!    moved less than half a slot from home stays over itself.
//! 6. Random input streams keep ids unique, preserve membership, run at most
//!    one session, and balance every capture acquire with a release.
//! 7. Transition ids strictly increase.

use std::collections::HashSet;

use dndsort_core::{InputEvent, KeyCode, Point, PointerDevice, Rect};
use dndsort_sortable::bounds::{stacked, tiled};
use dndsort_sortable::strategy::{destination_slot, shift_for, shifts};
use dndsort_sortable::{
    CaptureCommand, CollisionMetric, CollisionResolver, SortableConfig, SortableList,
    UnchangedReason, array_move, try_array_move,
};
use proptest::prelude::*;
use web_time::Instant;

#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn choose_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_u64() % len as u64) as usize
    }

    fn next_f32_range(&mut self, min: f32, max: f32) -> f32 {
        let unit = (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32;
        min + unit * (max - min)
    }
}

fn random_event(rng: &mut Lcg, ids: &[u32], extent: f32) -> InputEvent<u32> {
    let focused = if ids.is_empty() {
        None
    } else {
        Some(ids[rng.choose_index(ids.len())])
    };
    let position = Point::new(
        rng.next_f32_range(-20.0, 120.0),
        rng.next_f32_range(-20.0, extent + 20.0),
    );
    let pointer_id = (rng.next_u64() % 2) as u32;
    match rng.choose_index(12) {
        0 => InputEvent::pointer_down(pointer_id, PointerDevice::Mouse, focused, position),
        1 | 2 | 3 => InputEvent::pointer_move(pointer_id, PointerDevice::Mouse, position),
        4 => InputEvent::pointer_up(pointer_id, PointerDevice::Mouse, position),
        5 => InputEvent::pointer_cancel(pointer_id, PointerDevice::Mouse, position),
        6 => InputEvent::key(KeyCode::Enter, focused),
        7 => InputEvent::key(KeyCode::Down, focused),
        8 => InputEvent::key(KeyCode::Up, focused),
        9 => InputEvent::key(KeyCode::Escape, focused),
        10 => InputEvent::key(KeyCode::End, focused),
        _ => InputEvent::Blur,
    }
}

// ── 1–2. array_move ───────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn array_move_is_a_permutation(len in 1usize..40, a in 0usize..40, b in 0usize..40) {
        let items: Vec<usize> = (0..len).collect();
        let (from, to) = (a % len, b % len);
        let moved = array_move(&items, from, to);

        prop_assert_eq!(moved.len(), len);
        prop_assert_eq!(moved[to], items[from]);
        let mut sorted = moved.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, items);
    }

    #[test]
    fn out_of_range_moves_are_noops(len in 0usize..20, extra in 0usize..5, to in 0usize..25) {
        let items: Vec<usize> = (0..len).collect();
        prop_assert_eq!(array_move(&items, len + extra, to), items.clone());
        prop_assert!(try_array_move(&items, len + extra, to).is_err());
    }

    #[test]
    fn moving_back_restores_order(len in 1usize..30, a in 0usize..30, b in 0usize..30) {
        let items: Vec<usize> = (0..len).collect();
        let (from, to) = (a % len, b % len);
        let there = array_move(&items, from, to);
        prop_assert_eq!(array_move(&there, to, from), items);
    }
}

// ── 3–4. Reflow preview ───────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn destination_slots_are_a_bijection(len in 1usize..30, a in 0usize..30, b in 0usize..30) {
        let (active, over) = (a % len, b % len);
        let slots: HashSet<usize> = (0..len)
            .map(|index| destination_slot(index, active, over))
            .collect();
        prop_assert_eq!(slots.len(), len);
        prop_assert!(slots.iter().all(|&slot| slot < len));
    }

    #[test]
    fn shifts_match_per_item_shift(
        len in 1u32..20,
        a in 0usize..20,
        b in 0usize..20,
        grid in any::<bool>(),
    ) {
        let ids: Vec<u32> = (0..len).collect();
        let bounds = if grid {
            tiled(&ids, 4, 16.0, 2.0)
        } else {
            stacked(&ids, 100.0, 12.0, 3.0)
        };
        let (active, over) = (a % ids.len(), b % ids.len());
        let all = shifts(&ids, &bounds, active, Some(over));
        for (index, shift) in all.iter().enumerate() {
            prop_assert_eq!(*shift, shift_for(&ids, &bounds, index, active, Some(over)));
        }
    }
}

// ── 5. Collision ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn collision_never_returns_active(
        len in 1u32..16,
        pick in 0usize..16,
        dx in -200.0f32..200.0,
        dy in -200.0f32..200.0,
        axis_only in any::<bool>(),
    ) {
        let ids: Vec<u32> = (0..len).collect();
        let bounds = stacked(&ids, 100.0, 10.0, 0.0);
        let active = ids[pick % ids.len()];
        let metric = if axis_only {
            CollisionMetric::ClosestCenterOnAxis(dndsort_core::Orientation::Vertical)
        } else {
            CollisionMetric::ClosestCenter
        };
        let resolver = CollisionResolver::new(metric);
        let start = bounds.get(&active).unwrap_or(Rect::new(0.0, 0.0, 1.0, 1.0));
        let projected = Rect::new(start.x + dx, start.y + dy, start.width, start.height);

        let hit = resolver.resolve(&active, projected, &ids, &bounds);
        if let Some(hit) = &hit {
            prop_assert_ne!(hit.id, active);
            prop_assert_eq!(ids[hit.index], hit.id);
        } else {
            prop_assert_eq!(len, 1);
        }
        prop_assert_eq!(hit, resolver.resolve(&active, projected, &ids, &bounds));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn sub_half_slot_release_keeps_order(
        len in 1u32..12,
        pick in 0usize..12,
        dx in -4.9f32..4.9,
        dy in -4.9f32..4.9,
        grid in any::<bool>(),
    ) {
        let initial: Vec<u32> = (0..len).collect();
        let config = if grid { SortableConfig::grid(3) } else { SortableConfig::list() };
        let mut list = SortableList::new(initial.clone(), |n| *n, config).expect("unique ids");
        let bounds = if grid {
            tiled(list.ids(), 3, 10.0, 0.0)
        } else {
            stacked(list.ids(), 100.0, 10.0, 0.0)
        };
        let active = initial[pick % initial.len()];
        let start = bounds.get(&active).map(|rect| rect.center()).expect("rendered");
        let end = Point::new(start.x + dx, start.y + dy);
        let now = Instant::now();

        list.dispatch(&InputEvent::pointer_down(1, PointerDevice::Mouse, Some(active), start), &bounds, now);
        list.dispatch(&InputEvent::pointer_move(1, PointerDevice::Mouse, end), &bounds, now);
        prop_assert_eq!(list.over_id(), Some(&active));
        let out = list.dispatch(&InputEvent::pointer_up(1, PointerDevice::Mouse, end), &bounds, now);

        prop_assert!(!out.order_changed());
        prop_assert_eq!(list.items(), initial.as_slice());
        let dropped_in_place = out.effects().any(|effect| matches!(
            effect,
            dndsort_sortable::SessionEffect::Dropped { reason: UnchangedReason::SameIndex, .. }
        ));
        prop_assert!(dropped_in_place);
    }
}

// ── 6–7. Random input streams ─────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn random_streams_preserve_container_invariants(
        seed in any::<u64>(),
        len in 0u32..10,
        steps in 1usize..160,
        grid in any::<bool>(),
    ) {
        let mut rng = Lcg::new(seed);
        let config = if grid { SortableConfig::grid(3) } else { SortableConfig::list() };
        let initial: Vec<u32> = (1..=len).collect();
        let mut list = SortableList::new(initial.clone(), |n| *n, config)
            .expect("unique ids");
        let now = Instant::now();
        let mut captured = 0i32;
        let mut last_transition = 0u64;

        for _ in 0..steps {
            let bounds = if grid {
                tiled(list.ids(), 3, 10.0, 0.0)
            } else {
                stacked(list.ids(), 100.0, 10.0, 0.0)
            };
            let event = random_event(&mut rng, list.ids(), len as f32 * 10.0);
            let out = list.dispatch(&event, &bounds, now);

            for command in &out.capture {
                match command {
                    CaptureCommand::Acquire { .. } => captured += 1,
                    CaptureCommand::Release { .. } => captured -= 1,
                }
                prop_assert!((0..=1).contains(&captured));
            }
            for transition in &out.transitions {
                prop_assert!(transition.transition_id > last_transition);
                last_transition = transition.transition_id;
            }

            prop_assert_eq!(captured == 1, list.is_dragging());
            prop_assert_eq!(list.items(), list.ids());
            let unique: HashSet<u32> = list.ids().iter().copied().collect();
            prop_assert_eq!(unique.len(), initial.len());
            prop_assert!(initial.iter().all(|id| unique.contains(id)));
        }

        let out = list.teardown();
        captured -= out
            .capture
            .iter()
            .filter(|command| matches!(command, CaptureCommand::Release { .. }))
            .count() as i32;
        prop_assert_eq!(captured, 0);
        prop_assert!(!list.is_dragging());
    }
}
