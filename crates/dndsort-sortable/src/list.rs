#![forbid(unsafe_code)]

//! Sortable list container.
//!
//! [`SortableList`] wires sensors, the session machine, collision
//! resolution, reordering, the overlay presenter, announcements, and
//! listener registries into one headless component. The host feeds raw
//! input plus a fresh [`BoundsSnapshot`] and renders from the container's
//! state.
//!
//! # Invariants
//!
//! 1. Item identifiers are unique at all times (checked by `new` and
//!    `set_items`).
//! 2. While a session is live only the sensor that started it receives
//!    input.
//! 3. Every `CaptureCommand::Acquire` is followed by exactly one matching
//!    `Release` (on end, cancel, sensor removal, or teardown).
//! 4. The order only changes on a `Committed` transition.
//! 5. At most [`MAX_PENDING_ANNOUNCEMENTS`] undrained announcements are
//!    kept; older ones are discarded first.
//!
//! # Failure Modes
//!
//! - Begin on an item missing from the collection: ignored, sensor reset.
//! - Items replaced mid-drag: indices resolve against the newest collection
//!   at drop time; a vanished id yields an unchanged drop.

use std::collections::VecDeque;
use std::time::Duration;

use dndsort_core::event::InputEvent;
use dndsort_core::geometry::Vector;
use dndsort_core::sensor::{
    CancelReason, KeyboardSensor, PointerSensor, Sensor, SensorKind, SessionEvent,
};
use rustc_hash::FxHashMap;
use tracing::{debug, debug_span, trace};
use web_time::Instant;

use crate::announce::{self, Announcement};
use crate::bounds::{BoundsSnapshot, ItemId};
use crate::config::SortableConfig;
use crate::error::SortableError;
use crate::events::{
    CaptureCommand, Dispatch, DragCancel, DragEnd, DragOver, DragStart, Feedback, OrderChanged,
};
use crate::overlay::{OverlayFrame, OverlayPresenter};
use crate::reorder::{UnchangedReason, array_move};
use crate::session::{DragSession, SessionContext, SessionEffect, SessionMachine};
use crate::strategy;
use crate::subscription::{Emitter, Subscription};

/// Cap on buffered announcements between drains.
pub const MAX_PENDING_ANNOUNCEMENTS: usize = 32;

/// Handle returned by [`SortableList::register_sensor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SensorId(u32);

/// Per-item rendering descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemVisual {
    /// Live reflow shift to apply on top of the item's layout position.
    pub translate: Vector,
    pub opacity: f32,
    /// Whether this item is the active item's in-list placeholder.
    pub dragging: bool,
}

impl Default for ItemVisual {
    fn default() -> Self {
        Self {
            translate: Vector::ZERO,
            opacity: 1.0,
            dragging: false,
        }
    }
}

struct RegisteredSensor<K> {
    id: SensorId,
    sensor: Box<dyn Sensor<K>>,
}

struct Listeners<K> {
    drag_start: Emitter<DragStart<K>>,
    drag_over: Emitter<DragOver<K>>,
    drag_end: Emitter<DragEnd<K>>,
    drag_cancel: Emitter<DragCancel<K>>,
    order_changed: Emitter<OrderChanged<K>>,
    feedback: Emitter<Feedback<K>>,
}

impl<K: 'static> Listeners<K> {
    fn new() -> Self {
        Self {
            drag_start: Emitter::new(),
            drag_over: Emitter::new(),
            drag_end: Emitter::new(),
            drag_cancel: Emitter::new(),
            order_changed: Emitter::new(),
            feedback: Emitter::new(),
        }
    }
}

/// Headless sortable list over items `T` identified by `K`.
pub struct SortableList<T, K: ItemId + 'static> {
    items: Vec<T>,
    ids: Vec<K>,
    key: Box<dyn Fn(&T) -> K>,
    config: SortableConfig,
    machine: SessionMachine<K>,
    sensors: Vec<RegisteredSensor<K>>,
    next_sensor: u32,
    live_sensor: Option<SensorId>,
    overlay: OverlayPresenter<K>,
    announcements: VecDeque<Announcement>,
    listeners: Listeners<K>,
}

impl<T, K: ItemId + 'static> std::fmt::Debug for SortableList<T, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortableList")
            .field("ids", &self.ids)
            .field("config", &self.config)
            .field("session", &self.machine.session())
            .field("sensors", &self.sensors.len())
            .field("live_sensor", &self.live_sensor)
            .finish_non_exhaustive()
    }
}

impl<T: Clone, K: ItemId + 'static> SortableList<T, K> {
    /// Build a container with the default pointer and keyboard sensors.
    ///
    /// Fails on duplicate identifiers or an invalid configuration.
    pub fn new(
        items: Vec<T>,
        key: impl Fn(&T) -> K + 'static,
        config: SortableConfig,
    ) -> Result<Self, SortableError> {
        let mut list = Self::without_sensors(items, key, config)?;
        list.register_sensor(Box::new(PointerSensor::pointer(
            list.config.activation_constraint(),
        )));
        list.register_sensor(Box::new(KeyboardSensor::new(list.config.arrangement())));
        Ok(list)
    }

    /// Build a container with no sensors; feed it through
    /// [`apply`](Self::apply) or register sensors explicitly.
    pub fn without_sensors(
        items: Vec<T>,
        key: impl Fn(&T) -> K + 'static,
        config: SortableConfig,
    ) -> Result<Self, SortableError> {
        config.validate()?;
        let ids = collect_ids(&items, &key)?;
        Ok(Self {
            items,
            ids,
            key: Box::new(key),
            machine: SessionMachine::new(config.collision_resolver()),
            overlay: OverlayPresenter::new(config.drop_animation),
            config,
            sensors: Vec::new(),
            next_sensor: 0,
            live_sensor: None,
            announcements: VecDeque::new(),
            listeners: Listeners::new(),
        })
    }

    // -- collection ---------------------------------------------------------

    /// Current order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Identifiers in current order.
    #[must_use]
    pub fn ids(&self) -> &[K] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn index_of(&self, id: &K) -> Option<usize> {
        self.ids.iter().position(|candidate| candidate == id)
    }

    /// Replace the collection. An active session keeps running; its drop
    /// resolves against the new items.
    pub fn set_items(&mut self, items: Vec<T>) -> Result<(), SortableError> {
        self.ids = collect_ids(&items, &self.key)?;
        self.items = items;
        Ok(())
    }

    /// Consume the container and return the items in their final order.
    #[must_use]
    pub fn into_items(mut self) -> Vec<T> {
        self.teardown();
        std::mem::take(&mut self.items)
    }

    // -- configuration ------------------------------------------------------

    #[must_use]
    pub const fn config(&self) -> &SortableConfig {
        &self.config
    }

    /// Apply a new configuration to the resolver, overlay, and announcement
    /// settings. Registered sensors keep their own constraints.
    pub fn set_config(&mut self, config: SortableConfig) -> Result<(), SortableError> {
        config.validate()?;
        self.machine.set_resolver(config.collision_resolver());
        self.overlay.set_animation(config.drop_animation);
        self.config = config;
        Ok(())
    }

    // -- sensors ------------------------------------------------------------

    /// Add a sensor. Sensors receive idle-time input in registration order.
    pub fn register_sensor(&mut self, sensor: Box<dyn Sensor<K>>) -> SensorId {
        self.next_sensor = self.next_sensor.wrapping_add(1);
        let id = SensorId(self.next_sensor);
        debug!(sensor = ?sensor.kind(), ?id, "sensor registered");
        self.sensors.push(RegisteredSensor { id, sensor });
        id
    }

    /// Remove a sensor. If it drives the current session, the session is
    /// cancelled and capture released. `None` if the id is unknown.
    pub fn deregister_sensor(&mut self, id: SensorId) -> Option<Dispatch<K>> {
        let position = self.sensors.iter().position(|entry| entry.id == id)?;
        let mut out = Dispatch::default();
        if self.live_sensor == Some(id) {
            out = self.cancel();
        }
        self.sensors.remove(position);
        debug!(?id, "sensor deregistered");
        Some(out)
    }

    /// Registered sensor handles and kinds, in dispatch order.
    pub fn sensors(&self) -> impl Iterator<Item = (SensorId, SensorKind)> + '_ {
        self.sensors
            .iter()
            .map(|entry| (entry.id, entry.sensor.kind()))
    }

    // -- session state --------------------------------------------------------

    #[must_use]
    pub const fn session(&self) -> Option<&DragSession<K>> {
        self.machine.session()
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.machine.is_active()
    }

    #[must_use]
    pub fn active_id(&self) -> Option<&K> {
        self.session().map(|session| &session.active_id)
    }

    #[must_use]
    pub fn over_id(&self) -> Option<&K> {
        self.session().and_then(|session| session.over_id.as_ref())
    }

    #[must_use]
    pub const fn overlay(&self) -> &OverlayPresenter<K> {
        &self.overlay
    }

    /// Overlay frame to draw, or `None` when idle.
    #[must_use]
    pub fn overlay_frame(&self) -> Option<OverlayFrame<K>> {
        self.overlay.frame()
    }

    /// Take buffered screen reader announcements, oldest first.
    ///
    /// Hosts should drain once per frame; only the newest
    /// [`MAX_PENDING_ANNOUNCEMENTS`] are retained otherwise.
    pub fn drain_announcements(&mut self) -> Vec<Announcement> {
        self.announcements.drain(..).collect()
    }

    /// Rendering descriptor for `id` given this frame's bounds.
    #[must_use]
    pub fn item_visual(&self, id: &K, bounds: &BoundsSnapshot<K>) -> ItemVisual {
        let ghost = self.config.drop_animation.ghost_opacity;
        if let Some(session) = self.session() {
            let (Some(index), Some(active)) =
                (self.index_of(id), self.index_of(&session.active_id))
            else {
                return ItemVisual::default();
            };
            let over = session.over_id.as_ref().and_then(|over| self.index_of(over));
            let dragging = index == active;
            return ItemVisual {
                translate: strategy::shift_for(&self.ids, bounds, index, active, over),
                opacity: if dragging { ghost } else { 1.0 },
                dragging,
            };
        }
        if self.overlay.is_dropping() && self.overlay.active_id() == Some(id) {
            return ItemVisual {
                translate: Vector::ZERO,
                opacity: ghost,
                dragging: false,
            };
        }
        ItemVisual::default()
    }

    // -- subscriptions --------------------------------------------------------

    pub fn on_drag_start(&self, listener: impl FnMut(&DragStart<K>) + 'static) -> Subscription {
        self.listeners.drag_start.subscribe(listener)
    }

    pub fn on_drag_over(&self, listener: impl FnMut(&DragOver<K>) + 'static) -> Subscription {
        self.listeners.drag_over.subscribe(listener)
    }

    pub fn on_drag_end(&self, listener: impl FnMut(&DragEnd<K>) + 'static) -> Subscription {
        self.listeners.drag_end.subscribe(listener)
    }

    pub fn on_drag_cancel(&self, listener: impl FnMut(&DragCancel<K>) + 'static) -> Subscription {
        self.listeners.drag_cancel.subscribe(listener)
    }

    pub fn on_order_changed(
        &self,
        listener: impl FnMut(&OrderChanged<K>) + 'static,
    ) -> Subscription {
        self.listeners.order_changed.subscribe(listener)
    }

    pub fn on_feedback(&self, listener: impl FnMut(&Feedback<K>) + 'static) -> Subscription {
        self.listeners.feedback.subscribe(listener)
    }

    // -- input ----------------------------------------------------------------

    /// Route one raw input event through the sensors.
    pub fn dispatch(
        &mut self,
        event: &InputEvent<K>,
        bounds: &BoundsSnapshot<K>,
        now: Instant,
    ) -> Dispatch<K> {
        let _span = debug_span!(
            "sortable.dispatch",
            event = input_label(event),
            dragging = self.is_dragging()
        )
        .entered();

        let mut out = Dispatch::default();
        let targets: Vec<SensorId> = match self.live_sensor {
            Some(live) => vec![live],
            None => self.sensors.iter().map(|entry| entry.id).collect(),
        };
        for id in targets {
            if self.live_sensor.is_some_and(|live| live != id) {
                break;
            }
            let Some(entry) = self.sensors.iter_mut().find(|entry| entry.id == id) else {
                continue;
            };
            let produced = entry.sensor.handle(event, now);
            for session_event in produced {
                self.process(session_event, Some(id), bounds, &mut out);
            }
        }
        out
    }

    /// Feed a canonical session event directly, bypassing sensors.
    pub fn apply(&mut self, event: SessionEvent<K>, bounds: &BoundsSnapshot<K>) -> Dispatch<K> {
        let _span = debug_span!("sortable.apply", event = event.label()).entered();
        let mut out = Dispatch::default();
        self.process(event, None, bounds, &mut out);
        out
    }

    /// Cancel the active session, if any.
    pub fn cancel(&mut self) -> Dispatch<K> {
        self.apply(
            SessionEvent::Cancel(CancelReason::Programmatic),
            &BoundsSnapshot::new(),
        )
    }

    /// Poll delayed activation and advance the drop animation.
    pub fn tick(&mut self, now: Instant, dt: Duration, bounds: &BoundsSnapshot<K>) -> Dispatch<K> {
        let mut out = Dispatch::default();
        if !self.is_dragging() {
            let ids: Vec<SensorId> = self.sensors.iter().map(|entry| entry.id).collect();
            for id in ids {
                let Some(entry) = self.sensors.iter_mut().find(|entry| entry.id == id) else {
                    continue;
                };
                let produced = entry.sensor.poll(now);
                for session_event in produced {
                    self.process(session_event, Some(id), bounds, &mut out);
                }
            }
        }
        self.overlay.tick(dt);
        out
    }

    /// Force-cancel any session, reset every sensor, and release capture.
    pub fn teardown(&mut self) -> Dispatch<K> {
        let mut out = Dispatch::default();
        let origin = self.session().map(|session| session.origin);
        if let Some(transition) = self.machine.force_cancel() {
            self.handle_effect(&transition.effect, origin, &BoundsSnapshot::new(), &mut out);
            out.transitions.push(transition);
        }
        for entry in &mut self.sensors {
            entry.sensor.reset();
        }
        self.live_sensor = None;
        self.overlay.hide();
        out
    }

    // -- internals --------------------------------------------------------------

    fn process(
        &mut self,
        event: SessionEvent<K>,
        source: Option<SensorId>,
        bounds: &BoundsSnapshot<K>,
        out: &mut Dispatch<K>,
    ) {
        let origin = self.session().map(|session| session.origin);
        let is_begin = matches!(event, SessionEvent::Begin { .. });
        let transition = self
            .machine
            .apply_event(&event, SessionContext::new(&self.ids, bounds));
        trace!(
            transition_id = transition.transition_id,
            from = ?transition.from,
            to = ?transition.to,
            "session transition"
        );

        if is_begin && transition.effect.is_noop() {
            if let Some(source) = source
                && self.live_sensor != Some(source)
            {
                self.reset_sensor(source);
            }
        } else if matches!(transition.effect, SessionEffect::Started { .. }) {
            self.live_sensor = source;
            for entry in &mut self.sensors {
                if Some(entry.id) != source {
                    entry.sensor.reset();
                }
            }
        }

        self.handle_effect(&transition.effect, origin, bounds, out);
        out.transitions.push(transition);
    }

    fn handle_effect(
        &mut self,
        effect: &SessionEffect<K>,
        origin: Option<SensorKind>,
        bounds: &BoundsSnapshot<K>,
        out: &mut Dispatch<K>,
    ) {
        match effect {
            SessionEffect::Started {
                active_id,
                origin,
                index,
            } => {
                out.capture.push(CaptureCommand::Acquire { sensor: *origin });
                let initial = self.session().and_then(|session| session.initial_rect);
                self.overlay.follow(active_id, initial, Vector::ZERO);
                self.announce(announce::drag_start(active_id, *index, self.ids.len()));
                self.listeners.drag_start.emit(&DragStart {
                    active_id: active_id.clone(),
                    index: *index,
                    origin: *origin,
                });
                self.listeners.feedback.emit(&Feedback {
                    active_id: Some(active_id.clone()),
                    over_id: Some(active_id.clone()),
                });
            }
            SessionEffect::OverChanged {
                active_id,
                over_id,
                pointer_delta,
                ..
            } => {
                self.follow_session(active_id, *pointer_delta);
                let over_index = over_id.as_ref().and_then(|over| self.index_of(over));
                self.announce(announce::drag_over(active_id, over_index, self.ids.len()));
                self.listeners.drag_over.emit(&DragOver {
                    active_id: active_id.clone(),
                    over_id: over_id.clone(),
                });
                self.listeners.feedback.emit(&Feedback {
                    active_id: Some(active_id.clone()),
                    over_id: over_id.clone(),
                });
            }
            SessionEffect::Moved {
                active_id,
                pointer_delta,
            } => self.follow_session(active_id, *pointer_delta),
            SessionEffect::Committed {
                active_id,
                over_id,
                from,
                to,
            } => {
                let target = bounds.usable(over_id);
                self.items = array_move(&self.items, *from, *to);
                self.ids = array_move(&self.ids, *from, *to);
                debug!(%active_id, from, to, "order committed");
                self.overlay.drop_to(target, false);
                self.announce(announce::drag_end(active_id, Some(*to), self.ids.len()));
                self.listeners.drag_end.emit(&DragEnd {
                    active_id: active_id.clone(),
                    over_id: Some(over_id.clone()),
                    order: self.ids.clone(),
                    from: *from,
                    to: *to,
                    unchanged: None,
                });
                self.listeners.order_changed.emit(&OrderChanged {
                    order: self.ids.clone(),
                    from: *from,
                    to: *to,
                });
                self.finish_session(origin, out);
            }
            SessionEffect::Dropped {
                active_id,
                over_id,
                index,
                reason,
            } => {
                self.overlay.drop_to(None, false);
                let position = (*reason != UnchangedReason::ActiveVanished).then_some(*index);
                self.announce(announce::drag_end(active_id, position, self.ids.len()));
                self.listeners.drag_end.emit(&DragEnd {
                    active_id: active_id.clone(),
                    over_id: over_id.clone(),
                    order: self.ids.clone(),
                    from: *index,
                    to: *index,
                    unchanged: Some(*reason),
                });
                self.finish_session(origin, out);
            }
            SessionEffect::Discarded {
                active_id, reason, ..
            } => {
                self.overlay.drop_to(None, true);
                self.announce(announce::drag_cancel(active_id));
                self.listeners.drag_cancel.emit(&DragCancel {
                    active_id: active_id.clone(),
                    reason: *reason,
                });
                self.finish_session(origin, out);
            }
            SessionEffect::Noop { .. } => {}
        }
    }

    fn follow_session(&mut self, active_id: &K, delta: Vector) {
        let initial = self.session().and_then(|session| session.initial_rect);
        self.overlay.follow(active_id, initial, delta);
    }

    fn finish_session(&mut self, origin: Option<SensorKind>, out: &mut Dispatch<K>) {
        if let Some(sensor) = origin {
            out.capture.push(CaptureCommand::Release { sensor });
        }
        if let Some(live) = self.live_sensor.take() {
            self.reset_sensor(live);
        }
        self.listeners.feedback.emit(&Feedback {
            active_id: None,
            over_id: None,
        });
    }

    fn reset_sensor(&mut self, id: SensorId) {
        if let Some(entry) = self.sensors.iter_mut().find(|entry| entry.id == id) {
            entry.sensor.reset();
        }
    }

    fn announce(&mut self, announcement: Announcement) {
        if !self.config.announcements {
            return;
        }
        if self.announcements.len() == MAX_PENDING_ANNOUNCEMENTS {
            self.announcements.pop_front();
            trace!("announcement buffer full, oldest dropped");
        }
        self.announcements.push_back(announcement);
    }
}

impl<T, K: ItemId + 'static> Drop for SortableList<T, K> {
    fn drop(&mut self) {
        if !self.machine.is_active() {
            return;
        }
        let origin = self.machine.session().map(|session| session.origin);
        if let Some(transition) = self.machine.force_cancel()
            && let SessionEffect::Discarded { active_id, reason, .. } = &transition.effect
        {
            debug!(%active_id, ?origin, "session cancelled on teardown");
            self.listeners.drag_cancel.emit(&DragCancel {
                active_id: active_id.clone(),
                reason: *reason,
            });
        }
        for entry in &mut self.sensors {
            entry.sensor.reset();
        }
        self.live_sensor = None;
    }
}

fn collect_ids<T, K: ItemId>(items: &[T], key: &dyn Fn(&T) -> K) -> Result<Vec<K>, SortableError> {
    let mut seen: FxHashMap<K, usize> =
        FxHashMap::with_capacity_and_hasher(items.len(), Default::default());
    let mut ids = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let id = key(item);
        if let Some(&first) = seen.get(&id) {
            return Err(SortableError::DuplicateId {
                id: id.to_string(),
                first,
                second: index,
            });
        }
        seen.insert(id.clone(), index);
        ids.push(id);
    }
    Ok(ids)
}

fn input_label<K>(event: &InputEvent<K>) -> &'static str {
    use dndsort_core::event::PointerEventKind;
    match event {
        InputEvent::Pointer(pointer) => match pointer.kind {
            PointerEventKind::Down { .. } => "pointer_down",
            PointerEventKind::Move => "pointer_move",
            PointerEventKind::Up { .. } => "pointer_up",
            PointerEventKind::Cancel => "pointer_cancel",
        },
        InputEvent::Key(_) => "key",
        InputEvent::Blur => "blur",
    }
}
