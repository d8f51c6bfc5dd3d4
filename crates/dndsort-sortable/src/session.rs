#![forbid(unsafe_code)]

//! Drag session lifecycle machine.
//!
//! ```text
//! Idle --begin--> Dragging --move--> Dragging
//!                    |--end----> Idle   (Committed | Dropped)
//!                    '--cancel-> Idle   (Discarded)
//! ```
//!
//! The machine never changes the order itself. On `end` it resolves the
//! source and destination indices against the collection passed in the
//! [`SessionContext`] and reports them; the owner applies the move.
//!
//! # Invariants
//!
//! 1. At most one session exists; `begin` while dragging is a no-op.
//! 2. Any non-begin event while idle is a no-op and leaves the state
//!    unchanged.
//! 3. `over_id` starts as the active id, and a pointer stays over the active
//!    id while its projection is nearest the vacated home slot.
//! 4. `transition_id` increases by one for every applied event.
//! 5. A `Committed` effect always has `from != to`.
//!
//! # Failure Modes
//!
//! - Begin on an id that is not in the collection: `Noop { UnknownItem }`.
//! - Active item missing from the bounds snapshot at begin: the initial
//!   rect is captured lazily on the first move that has one.
//! - Active item removed before `end`: the drop reports
//!   `from == to == start_index`.

use dndsort_core::geometry::{Point, Rect, Vector};
use dndsort_core::sensor::{CancelReason, MoveInput, SensorKind, SessionEvent};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::bounds::{BoundsSnapshot, ItemId};
use crate::collision::CollisionResolver;
use crate::reorder::{UnchangedReason, index_of};

/// Per-event inputs borrowed from the owner.
#[derive(Debug, Clone, Copy)]
pub struct SessionContext<'a, K> {
    /// Current collection order.
    pub order: &'a [K],
    /// Bounds captured for this event.
    pub bounds: &'a BoundsSnapshot<K>,
}

impl<'a, K> SessionContext<'a, K> {
    #[must_use]
    pub const fn new(order: &'a [K], bounds: &'a BoundsSnapshot<K>) -> Self {
        Self { order, bounds }
    }
}

/// An in-progress drag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragSession<K> {
    pub active_id: K,
    pub over_id: Option<K>,
    /// Translation since begin; visual only.
    pub pointer_delta: Vector,
    pub origin: SensorKind,
    /// Begin coordinates for continuous sensors.
    pub start_point: Option<Point>,
    /// Active item's rect at begin.
    pub initial_rect: Option<Rect>,
    /// Active item's index at begin.
    pub start_index: usize,
}

impl<K> DragSession<K> {
    /// Active rect translated by the current delta.
    #[must_use]
    pub fn projected_rect(&self) -> Option<Rect> {
        self.initial_rect.map(|rect| rect.translate(self.pointer_delta))
    }
}

/// Session lifecycle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState<K> {
    Idle,
    Dragging(DragSession<K>),
}

impl<K> SessionState<K> {
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        match self {
            Self::Idle => SessionPhase::Idle,
            Self::Dragging(_) => SessionPhase::Dragging,
        }
    }
}

/// State label without payload, for transition diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Dragging,
}

/// Explicit no-op diagnostics for events that are safely ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionNoopReason {
    IdleWithoutActiveSession,
    SessionAlreadyActive,
    UnknownItem,
    /// Pointer move for a keyboard session or step for a pointer session.
    IncompatibleMove,
    NonFiniteInput,
    EmptyCollection,
}

/// Transition effect emitted by one lifecycle step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum SessionEffect<K> {
    Started {
        active_id: K,
        origin: SensorKind,
        index: usize,
    },
    OverChanged {
        active_id: K,
        previous: Option<K>,
        over_id: Option<K>,
        pointer_delta: Vector,
    },
    Moved {
        active_id: K,
        pointer_delta: Vector,
    },
    Committed {
        active_id: K,
        over_id: K,
        from: usize,
        to: usize,
    },
    /// Ended without an index change.
    Dropped {
        active_id: K,
        over_id: Option<K>,
        index: usize,
        reason: UnchangedReason,
    },
    Discarded {
        active_id: K,
        over_id: Option<K>,
        reason: CancelReason,
    },
    Noop {
        reason: SessionNoopReason,
    },
}

impl<K> SessionEffect<K> {
    /// Whether this effect terminated a session.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Committed { .. } | Self::Dropped { .. } | Self::Discarded { .. }
        )
    }

    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::Noop { .. })
    }
}

/// One state-machine transition with diagnostic fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTransition<K> {
    pub transition_id: u64,
    pub from: SessionPhase,
    pub to: SessionPhase,
    pub effect: SessionEffect<K>,
}

/// Runtime lifecycle machine for one sortable container.
#[derive(Debug, Clone)]
pub struct SessionMachine<K> {
    state: SessionState<K>,
    resolver: CollisionResolver,
    transition_counter: u64,
}

impl<K: ItemId> SessionMachine<K> {
    #[must_use]
    pub const fn new(resolver: CollisionResolver) -> Self {
        Self {
            state: SessionState::Idle,
            resolver,
            transition_counter: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState<K> {
        &self.state
    }

    /// The active session, if dragging.
    #[must_use]
    pub const fn session(&self) -> Option<&DragSession<K>> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Dragging(session) => Some(session),
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Dragging(_))
    }

    #[must_use]
    pub const fn resolver(&self) -> &CollisionResolver {
        &self.resolver
    }

    /// Replace the collision resolver. Takes effect on the next move.
    pub fn set_resolver(&mut self, resolver: CollisionResolver) {
        self.resolver = resolver;
    }

    /// Unconditionally return to Idle.
    ///
    /// Returns a `Discarded` transition with [`CancelReason::Programmatic`]
    /// if a session was active, `None` otherwise.
    pub fn force_cancel(&mut self) -> Option<SessionTransition<K>> {
        let SessionState::Dragging(session) = std::mem::replace(&mut self.state, SessionState::Idle)
        else {
            return None;
        };
        debug!(active_id = %session.active_id, "session force-cancelled");
        Some(self.record(
            SessionPhase::Dragging,
            SessionEffect::Discarded {
                active_id: session.active_id,
                over_id: session.over_id,
                reason: CancelReason::Programmatic,
            },
        ))
    }

    /// Apply one canonical session event.
    pub fn apply_event(
        &mut self,
        event: &SessionEvent<K>,
        ctx: SessionContext<'_, K>,
    ) -> SessionTransition<K> {
        let from = self.state.phase();
        let effect = match event {
            SessionEvent::Begin { id, origin, at } => self.begin(id, *origin, *at, ctx),
            SessionEvent::Move(input) => self.movement(*input, ctx),
            SessionEvent::End => self.end(ctx),
            SessionEvent::Cancel(reason) => self.cancel(*reason),
        };
        if let SessionEffect::Noop { reason } = &effect {
            debug!(event = event.label(), ?reason, "session event ignored");
        }
        self.record(from, effect)
    }

    fn record(&mut self, from: SessionPhase, effect: SessionEffect<K>) -> SessionTransition<K> {
        self.transition_counter = self.transition_counter.saturating_add(1);
        SessionTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state.phase(),
            effect,
        }
    }

    fn begin(
        &mut self,
        id: &K,
        origin: SensorKind,
        at: Option<Point>,
        ctx: SessionContext<'_, K>,
    ) -> SessionEffect<K> {
        if self.is_active() {
            return SessionEffect::Noop {
                reason: SessionNoopReason::SessionAlreadyActive,
            };
        }
        let Some(index) = ctx.order.iter().position(|candidate| candidate == id) else {
            return SessionEffect::Noop {
                reason: SessionNoopReason::UnknownItem,
            };
        };
        self.state = SessionState::Dragging(DragSession {
            active_id: id.clone(),
            over_id: Some(id.clone()),
            pointer_delta: Vector::ZERO,
            origin,
            start_point: at.filter(|point| point.is_finite()),
            initial_rect: ctx.bounds.usable(id),
            start_index: index,
        });
        debug!(active_id = %id, ?origin, index, "session started");
        SessionEffect::Started {
            active_id: id.clone(),
            origin,
            index,
        }
    }

    fn movement(&mut self, input: MoveInput, ctx: SessionContext<'_, K>) -> SessionEffect<K> {
        let resolver = self.resolver;
        let SessionState::Dragging(session) = &mut self.state else {
            return SessionEffect::Noop {
                reason: SessionNoopReason::IdleWithoutActiveSession,
            };
        };
        if session.initial_rect.is_none() {
            session.initial_rect = ctx.bounds.usable(&session.active_id);
        }
        let previous = session.over_id.clone();

        match input {
            MoveInput::Pointer { position } => {
                let Some(start) = session.start_point else {
                    return SessionEffect::Noop {
                        reason: SessionNoopReason::IncompatibleMove,
                    };
                };
                if !position.is_finite() {
                    return SessionEffect::Noop {
                        reason: SessionNoopReason::NonFiniteInput,
                    };
                }
                session.pointer_delta = position.delta_from(start);
                if let (Some(home), Some(projected)) =
                    (session.initial_rect, session.projected_rect())
                {
                    let hit = resolver.resolve_from_home(
                        &session.active_id,
                        home,
                        session.start_index,
                        projected,
                        ctx.order,
                        ctx.bounds,
                    );
                    trace!(
                        active_id = %session.active_id,
                        dx = session.pointer_delta.dx,
                        dy = session.pointer_delta.dy,
                        over = ?hit.as_ref().map(|c| &c.id),
                        "collision resolved"
                    );
                    session.over_id = hit.map(|collision| collision.id);
                }
            }
            MoveInput::Step { offset } => {
                if session.origin.is_continuous() {
                    return SessionEffect::Noop {
                        reason: SessionNoopReason::IncompatibleMove,
                    };
                }
                if ctx.order.is_empty() {
                    return SessionEffect::Noop {
                        reason: SessionNoopReason::EmptyCollection,
                    };
                }
                let last = ctx.order.len() - 1;
                let base = session
                    .over_id
                    .as_ref()
                    .and_then(|over| ctx.order.iter().position(|id| id == over))
                    .or_else(|| ctx.order.iter().position(|id| *id == session.active_id))
                    .unwrap_or(session.start_index.min(last));
                let target = step_index(base, offset, last);
                let target_id = ctx.order[target].clone();
                if let (Some(initial), Some(slot)) =
                    (session.initial_rect, ctx.bounds.usable(&target_id))
                {
                    session.pointer_delta = slot.origin().delta_from(initial.origin());
                }
                trace!(active_id = %session.active_id, offset, target, "keyboard step");
                session.over_id = Some(target_id);
            }
        }

        if session.over_id != previous {
            debug!(
                active_id = %session.active_id,
                over = ?session.over_id,
                "over target changed"
            );
            SessionEffect::OverChanged {
                active_id: session.active_id.clone(),
                previous,
                over_id: session.over_id.clone(),
                pointer_delta: session.pointer_delta,
            }
        } else {
            SessionEffect::Moved {
                active_id: session.active_id.clone(),
                pointer_delta: session.pointer_delta,
            }
        }
    }

    fn end(&mut self, ctx: SessionContext<'_, K>) -> SessionEffect<K> {
        let SessionState::Dragging(session) = std::mem::replace(&mut self.state, SessionState::Idle)
        else {
            return SessionEffect::Noop {
                reason: SessionNoopReason::IdleWithoutActiveSession,
            };
        };
        let DragSession {
            active_id,
            over_id,
            start_index,
            ..
        } = session;

        let unchanged = |index: usize, reason: UnchangedReason, over_id: Option<K>, active_id: K| {
            SessionEffect::Dropped {
                active_id,
                over_id,
                index,
                reason,
            }
        };

        let Some(from) = index_of(ctx.order, K::clone, &active_id) else {
            debug!(%active_id, "active item vanished before drop");
            return unchanged(start_index, UnchangedReason::ActiveVanished, over_id, active_id);
        };
        let Some(over) = over_id.clone() else {
            return unchanged(from, UnchangedReason::NoTarget, over_id, active_id);
        };
        let Some(to) = index_of(ctx.order, K::clone, &over) else {
            debug!(%active_id, %over, "over item vanished before drop");
            return unchanged(from, UnchangedReason::TargetVanished, over_id, active_id);
        };
        if from == to {
            return unchanged(from, UnchangedReason::SameIndex, over_id, active_id);
        }
        debug!(%active_id, %over, from, to, "session committed");
        SessionEffect::Committed {
            active_id,
            over_id: over,
            from,
            to,
        }
    }

    fn cancel(&mut self, reason: CancelReason) -> SessionEffect<K> {
        let SessionState::Dragging(session) = std::mem::replace(&mut self.state, SessionState::Idle)
        else {
            return SessionEffect::Noop {
                reason: SessionNoopReason::IdleWithoutActiveSession,
            };
        };
        debug!(active_id = %session.active_id, ?reason, "session discarded");
        SessionEffect::Discarded {
            active_id: session.active_id,
            over_id: session.over_id,
            reason,
        }
    }
}

/// `base + offset` clamped to `[0, last]` without overflow.
fn step_index(base: usize, offset: i32, last: usize) -> usize {
    let target = i64::try_from(base)
        .unwrap_or(i64::MAX)
        .saturating_add(i64::from(offset))
        .max(0);
    usize::try_from(target).map_or(last, |t| t.min(last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::stacked;
    use crate::collision::CollisionMetric;
    use dndsort_core::geometry::Orientation;

    fn machine() -> SessionMachine<u32> {
        SessionMachine::new(CollisionResolver::new(CollisionMetric::ClosestCenterOnAxis(
            Orientation::Vertical,
        )))
    }

    fn begin_pointer(id: u32, at: Point) -> SessionEvent<u32> {
        SessionEvent::Begin {
            id,
            origin: SensorKind::Pointer,
            at: Some(at),
        }
    }

    fn begin_keyboard(id: u32) -> SessionEvent<u32> {
        SessionEvent::Begin {
            id,
            origin: SensorKind::Keyboard,
            at: None,
        }
    }

    #[test]
    fn begin_sets_over_to_active() {
        let order = [1, 2, 3];
        let bounds = stacked(&order, 100.0, 10.0, 0.0);
        let mut m = machine();
        let t = m.apply_event(&begin_pointer(2, Point::new(5.0, 15.0)), SessionContext::new(&order, &bounds));
        assert_eq!(t.from, SessionPhase::Idle);
        assert_eq!(t.to, SessionPhase::Dragging);
        assert_eq!(t.transition_id, 1);
        let session = m.session().expect("dragging");
        assert_eq!(session.over_id, Some(2));
        assert_eq!(session.start_index, 1);
        assert_eq!(session.initial_rect, bounds.get(&2));
    }

    #[test]
    fn second_begin_is_ignored() {
        let order = [1, 2, 3];
        let bounds = stacked(&order, 100.0, 10.0, 0.0);
        let ctx = SessionContext::new(&order, &bounds);
        let mut m = machine();
        m.apply_event(&begin_pointer(1, Point::ORIGIN), ctx);
        let t = m.apply_event(&begin_pointer(3, Point::ORIGIN), ctx);
        assert_eq!(
            t.effect,
            SessionEffect::Noop {
                reason: SessionNoopReason::SessionAlreadyActive
            }
        );
        assert_eq!(m.session().map(|s| s.active_id), Some(1));
    }

    #[test]
    fn unknown_item_begin_is_ignored() {
        let order = [1, 2];
        let bounds = stacked(&order, 100.0, 10.0, 0.0);
        let mut m = machine();
        let t = m.apply_event(&begin_keyboard(9), SessionContext::new(&order, &bounds));
        assert_eq!(
            t.effect,
            SessionEffect::Noop {
                reason: SessionNoopReason::UnknownItem
            }
        );
        assert!(!m.is_active());
    }

    #[test]
    fn idle_events_are_noops() {
        let order = [1, 2];
        let bounds = stacked(&order, 100.0, 10.0, 0.0);
        let ctx = SessionContext::new(&order, &bounds);
        let mut m = machine();
        for event in [
            SessionEvent::End,
            SessionEvent::Cancel(CancelReason::Escape),
            SessionEvent::pointer_move(Point::new(1.0, 1.0)),
            SessionEvent::step(1),
        ] {
            let t = m.apply_event(&event, ctx);
            assert_eq!(
                t.effect,
                SessionEffect::Noop {
                    reason: SessionNoopReason::IdleWithoutActiveSession
                }
            );
            assert_eq!(t.to, SessionPhase::Idle);
        }
        assert_eq!(m.state(), &SessionState::Idle);
    }

    #[test]
    fn pointer_drag_commits_indices() {
        let order: Vec<u32> = (1..=8).collect();
        let bounds = stacked(&order, 100.0, 10.0, 0.0);
        let ctx = SessionContext::new(&order, &bounds);
        let mut m = machine();
        // Item 5 occupies y in [40, 50).
        m.apply_event(&begin_pointer(5, Point::new(50.0, 45.0)), ctx);
        let t = m.apply_event(&SessionEvent::pointer_move(Point::new(50.0, 15.0)), ctx);
        match t.effect {
            SessionEffect::OverChanged { over_id, pointer_delta, .. } => {
                assert_eq!(over_id, Some(2));
                assert_eq!(pointer_delta, Vector::new(0.0, -30.0));
            }
            other => panic!("expected OverChanged, got {other:?}"),
        }
        let t = m.apply_event(&SessionEvent::End, ctx);
        assert_eq!(
            t.effect,
            SessionEffect::Committed {
                active_id: 5,
                over_id: 2,
                from: 4,
                to: 1
            }
        );
        assert!(!m.is_active());
    }

    #[test]
    fn repeated_move_over_same_target_reports_moved() {
        let order = [1, 2, 3];
        let bounds = stacked(&order, 100.0, 10.0, 0.0);
        let ctx = SessionContext::new(&order, &bounds);
        let mut m = machine();
        m.apply_event(&begin_pointer(1, Point::new(0.0, 5.0)), ctx);
        m.apply_event(&SessionEvent::pointer_move(Point::new(0.0, 25.0)), ctx);
        let t = m.apply_event(&SessionEvent::pointer_move(Point::new(0.0, 26.0)), ctx);
        assert!(matches!(t.effect, SessionEffect::Moved { .. }));
    }

    #[test]
    fn pointer_jitter_stays_over_self() {
        let order = [1, 2, 3];
        let bounds = stacked(&order, 100.0, 10.0, 0.0);
        let ctx = SessionContext::new(&order, &bounds);
        let mut m = machine();
        m.apply_event(&begin_pointer(2, Point::new(50.0, 15.0)), ctx);
        let t = m.apply_event(&SessionEvent::pointer_move(Point::new(50.5, 15.5)), ctx);
        assert!(matches!(t.effect, SessionEffect::Moved { .. }));
        assert_eq!(m.session().and_then(|s| s.over_id), Some(2));

        // Away and back again.
        m.apply_event(&SessionEvent::pointer_move(Point::new(50.0, 25.0)), ctx);
        assert_eq!(m.session().and_then(|s| s.over_id), Some(3));
        let t = m.apply_event(&SessionEvent::pointer_move(Point::new(50.0, 16.0)), ctx);
        assert!(matches!(
            t.effect,
            SessionEffect::OverChanged {
                previous: Some(3),
                over_id: Some(2),
                ..
            }
        ));

        let t = m.apply_event(&SessionEvent::End, ctx);
        assert_eq!(
            t.effect,
            SessionEffect::Dropped {
                active_id: 2,
                over_id: Some(2),
                index: 1,
                reason: UnchangedReason::SameIndex
            }
        );
    }

    #[test]
    fn keyboard_steps_clamp_at_both_ends() {
        let order = [1, 2, 3];
        let bounds = stacked(&order, 100.0, 10.0, 0.0);
        let ctx = SessionContext::new(&order, &bounds);
        let mut m = machine();
        m.apply_event(&begin_keyboard(2), ctx);

        m.apply_event(&SessionEvent::step(-1), ctx);
        m.apply_event(&SessionEvent::step(-1), ctx);
        let session = m.session().expect("dragging");
        assert_eq!(session.over_id, Some(1));
        assert_eq!(session.pointer_delta, Vector::new(0.0, -10.0));

        m.apply_event(&SessionEvent::step(i32::MAX), ctx);
        assert_eq!(m.session().and_then(|s| s.over_id), Some(3));

        let t = m.apply_event(&SessionEvent::End, ctx);
        assert_eq!(
            t.effect,
            SessionEffect::Committed {
                active_id: 2,
                over_id: 3,
                from: 1,
                to: 2
            }
        );
    }

    #[test]
    fn keyboard_step_back_onto_self_is_a_noop_drop() {
        let order = [1, 2, 3];
        let bounds = stacked(&order, 100.0, 10.0, 0.0);
        let ctx = SessionContext::new(&order, &bounds);
        let mut m = machine();
        m.apply_event(&begin_keyboard(2), ctx);
        m.apply_event(&SessionEvent::step(1), ctx);
        m.apply_event(&SessionEvent::step(-1), ctx);
        let t = m.apply_event(&SessionEvent::End, ctx);
        assert_eq!(
            t.effect,
            SessionEffect::Dropped {
                active_id: 2,
                over_id: Some(2),
                index: 1,
                reason: UnchangedReason::SameIndex
            }
        );
    }

    #[test]
    fn incompatible_moves_are_ignored() {
        let order = [1, 2, 3];
        let bounds = stacked(&order, 100.0, 10.0, 0.0);
        let ctx = SessionContext::new(&order, &bounds);
        let mut m = machine();
        m.apply_event(&begin_keyboard(1), ctx);
        let t = m.apply_event(&SessionEvent::pointer_move(Point::new(0.0, 25.0)), ctx);
        assert_eq!(
            t.effect,
            SessionEffect::Noop {
                reason: SessionNoopReason::IncompatibleMove
            }
        );
    }

    #[test]
    fn vanished_target_drops_in_place() {
        let order = [1, 2, 3];
        let bounds = stacked(&order, 100.0, 10.0, 0.0);
        let mut m = machine();
        m.apply_event(&begin_keyboard(1), SessionContext::new(&order, &bounds));
        m.apply_event(&SessionEvent::step(2), SessionContext::new(&order, &bounds));

        let shrunk = [1, 2];
        let t = m.apply_event(&SessionEvent::End, SessionContext::new(&shrunk, &bounds));
        assert_eq!(
            t.effect,
            SessionEffect::Dropped {
                active_id: 1,
                over_id: Some(3),
                index: 0,
                reason: UnchangedReason::TargetVanished
            }
        );
    }

    #[test]
    fn vanished_active_reports_start_index() {
        let order = [1, 2, 3];
        let bounds = stacked(&order, 100.0, 10.0, 0.0);
        let mut m = machine();
        m.apply_event(&begin_keyboard(2), SessionContext::new(&order, &bounds));
        let remaining = [1, 3];
        let t = m.apply_event(&SessionEvent::End, SessionContext::new(&remaining, &bounds));
        assert!(matches!(
            t.effect,
            SessionEffect::Dropped {
                index: 1,
                reason: UnchangedReason::ActiveVanished,
                ..
            }
        ));
    }

    #[test]
    fn cancel_is_idempotent() {
        let order = [1, 2];
        let bounds = stacked(&order, 100.0, 10.0, 0.0);
        let ctx = SessionContext::new(&order, &bounds);
        let mut m = machine();
        m.apply_event(&begin_keyboard(1), ctx);
        let first = m.apply_event(&SessionEvent::Cancel(CancelReason::Escape), ctx);
        assert!(matches!(first.effect, SessionEffect::Discarded { .. }));
        let second = m.apply_event(&SessionEvent::Cancel(CancelReason::Escape), ctx);
        assert!(second.effect.is_noop());
        assert_eq!(m.state(), &SessionState::Idle);
    }

    #[test]
    fn force_cancel_only_fires_when_active() {
        let order = [1, 2];
        let bounds = stacked(&order, 100.0, 10.0, 0.0);
        let mut m = machine();
        assert!(m.force_cancel().is_none());
        m.apply_event(&begin_keyboard(1), SessionContext::new(&order, &bounds));
        let t = m.force_cancel().expect("transition");
        assert_eq!(t.transition_id, 2);
        assert!(matches!(
            t.effect,
            SessionEffect::Discarded {
                reason: CancelReason::Programmatic,
                ..
            }
        ));
        assert!(!m.is_active());
    }

    #[test]
    fn step_index_saturates() {
        assert_eq!(step_index(0, i32::MIN, 5), 0);
        assert_eq!(step_index(3, i32::MAX, 5), 5);
        assert_eq!(step_index(3, -1, 5), 2);
    }

    #[test]
    fn transition_serializes_with_tags() {
        let order = [1, 2];
        let bounds = stacked(&order, 100.0, 10.0, 0.0);
        let mut m = machine();
        let t = m.apply_event(&begin_keyboard(1), SessionContext::new(&order, &bounds));
        let json = serde_json::to_value(&t).expect("serialize");
        assert_eq!(json["effect"]["effect"], "started");
        assert_eq!(json["to"], "dragging");
    }
}
