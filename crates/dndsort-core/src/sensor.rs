#![forbid(unsafe_code)]

//! Input sensors: raw [`InputEvent`]s in, canonical [`SessionEvent`]s out.
//!
//! A sensor owns the activation logic for one input family. Pointer-like
//! sensors (pointer, mouse, touch) apply an [`ActivationConstraint`] before
//! reporting `Begin`; the keyboard sensor maps keys to discrete slot steps.
//!
//! # Invariants
//!
//! 1. A sensor emits `Begin` at most once per press/activation and only from
//!    its idle state.
//! 2. `Move`, `End`, and `Cancel` are only emitted while the sensor is live.
//! 3. Events from a pointer other than the one that started the press are
//!    ignored.
//! 4. After `reset()`, the sensor is idle and emits nothing until the next
//!    activation.
//!
//! # Failure Modes
//!
//! - Moving farther than the tolerance before a delay constraint elapses
//!   aborts the pending activation silently (the press becomes a click).
//! - The owner must call `reset()` if it rejects a `Begin` (for example
//!   because another session is already running); otherwise the sensor
//!   believes it is live.

use std::time::Duration;

use web_time::Instant;

use crate::event::{
    InputEvent, KeyCode, KeyEvent, KeyEventKind, PointerButton, PointerDevice, PointerEvent,
    PointerEventKind,
};
use crate::geometry::{Orientation, Point};

// ---------------------------------------------------------------------------
// Canonical session events
// ---------------------------------------------------------------------------

/// The family of input that started a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SensorKind {
    /// Any pointer device (mouse, pen, touch).
    Pointer,
    Mouse,
    Touch,
    Keyboard,
}

impl SensorKind {
    /// Whether coordinates from this sensor are continuous viewport points.
    #[must_use]
    pub const fn is_continuous(self) -> bool {
        !matches!(self, Self::Keyboard)
    }
}

/// Why a session was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CancelReason {
    Escape,
    PointerCancel,
    Blur,
    Programmatic,
}

/// Movement payload: continuous coordinates or a logical slot step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "input", rename_all = "snake_case"))]
pub enum MoveInput {
    /// Absolute pointer position in viewport coordinates.
    Pointer { position: Point },
    /// Signed slot offset from the current over target. Saturates and is
    /// clamped to the collection bounds by the consumer.
    Step { offset: i32 },
}

/// Canonical session event produced by sensors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum SessionEvent<K> {
    /// Start dragging `id`. `at` is the press point for continuous sensors.
    Begin {
        id: K,
        origin: SensorKind,
        at: Option<Point>,
    },
    Move(MoveInput),
    End,
    Cancel(CancelReason),
}

impl<K> SessionEvent<K> {
    /// Continuous move to `position`.
    #[must_use]
    pub const fn pointer_move(position: Point) -> Self {
        Self::Move(MoveInput::Pointer { position })
    }

    /// Discrete move by `offset` slots.
    #[must_use]
    pub const fn step(offset: i32) -> Self {
        Self::Move(MoveInput::Step { offset })
    }

    /// Stable label for logging.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Begin { .. } => "begin",
            Self::Move(_) => "move",
            Self::End => "end",
            Self::Cancel(_) => "cancel",
        }
    }
}

// ---------------------------------------------------------------------------
// Activation constraints
// ---------------------------------------------------------------------------

/// Conditions a press must satisfy before it becomes a drag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ActivationConstraint {
    /// Begin on press.
    #[default]
    Immediate,
    /// Begin once the pointer has moved `tolerance_px` from the press point.
    Distance { tolerance_px: f32 },
    /// Begin once the press has been held for `delay`; moving farther than
    /// `tolerance_px` first aborts.
    Delay { delay: Duration, tolerance_px: f32 },
}

impl ActivationConstraint {
    /// Build a constraint from `{ activationDelayMs, movementTolerancePx }`.
    ///
    /// A non-zero delay selects [`Delay`](Self::Delay); otherwise a positive
    /// tolerance selects [`Distance`](Self::Distance); otherwise
    /// [`Immediate`](Self::Immediate). Non-finite or negative tolerances are
    /// treated as zero.
    #[must_use]
    pub fn from_settings(activation_delay_ms: u64, movement_tolerance_px: f32) -> Self {
        let tolerance_px = if movement_tolerance_px.is_finite() {
            movement_tolerance_px.max(0.0)
        } else {
            0.0
        };
        if activation_delay_ms > 0 {
            Self::Delay {
                delay: Duration::from_millis(activation_delay_ms),
                tolerance_px,
            }
        } else if tolerance_px > 0.0 {
            Self::Distance { tolerance_px }
        } else {
            Self::Immediate
        }
    }
}

// ---------------------------------------------------------------------------
// Arrangement (keyboard step mapping)
// ---------------------------------------------------------------------------

/// How items are laid out, for mapping arrow keys to slot steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    List(Orientation),
    /// Row-major grid with a fixed column count.
    Grid { columns: u16 },
}

impl Default for Arrangement {
    fn default() -> Self {
        Self::List(Orientation::Vertical)
    }
}

impl Arrangement {
    /// Slot offset for an arrow key, or `None` if the key does not move along
    /// this arrangement.
    #[must_use]
    pub fn step_for(self, code: KeyCode) -> Option<i32> {
        match (self, code) {
            (Self::List(Orientation::Vertical), KeyCode::Up) => Some(-1),
            (Self::List(Orientation::Vertical), KeyCode::Down) => Some(1),
            (Self::List(Orientation::Horizontal), KeyCode::Left) => Some(-1),
            (Self::List(Orientation::Horizontal), KeyCode::Right) => Some(1),
            (Self::Grid { .. }, KeyCode::Left) => Some(-1),
            (Self::Grid { .. }, KeyCode::Right) => Some(1),
            (Self::Grid { columns }, KeyCode::Up) => Some(-i32::from(columns.max(1))),
            (Self::Grid { columns }, KeyCode::Down) => Some(i32::from(columns.max(1))),
            (_, KeyCode::Home) => Some(i32::MIN),
            (_, KeyCode::End) => Some(i32::MAX),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor trait
// ---------------------------------------------------------------------------

/// A source of canonical session events.
pub trait Sensor<K> {
    /// Which input family this sensor handles.
    fn kind(&self) -> SensorKind;

    /// Feed one raw event. Most events produce zero or one session event;
    /// a deferred activation produces `Begin` followed by `Move`.
    fn handle(&mut self, event: &InputEvent<K>, now: Instant) -> Vec<SessionEvent<K>>;

    /// Check time-based activation (e.g. on tick). Default: nothing.
    fn poll(&mut self, _now: Instant) -> Vec<SessionEvent<K>> {
        Vec::new()
    }

    /// Whether this sensor currently drives a session.
    fn is_live(&self) -> bool;

    /// Whether a press is waiting on its activation constraint.
    fn is_pending(&self) -> bool {
        false
    }

    /// Return to idle without emitting anything.
    fn reset(&mut self);
}

// ---------------------------------------------------------------------------
// Pointer sensor (pointer / mouse / touch)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum PointerState<K> {
    Idle,
    Pending {
        pointer_id: u32,
        target: K,
        origin: Point,
        last: Point,
        pressed_at: Instant,
    },
    Live {
        pointer_id: u32,
    },
}

/// Pointer-family sensor with an activation constraint.
///
/// Construct with [`PointerSensor::pointer`], [`PointerSensor::mouse`], or
/// [`PointerSensor::touch`] to select which devices it accepts.
#[derive(Debug, Clone)]
pub struct PointerSensor<K> {
    kind: SensorKind,
    constraint: ActivationConstraint,
    state: PointerState<K>,
}

impl<K: Clone> PointerSensor<K> {
    /// Accepts every pointer device.
    #[must_use]
    pub fn pointer(constraint: ActivationConstraint) -> Self {
        Self::with_kind(SensorKind::Pointer, constraint)
    }

    /// Accepts mouse and pen input only.
    #[must_use]
    pub fn mouse(constraint: ActivationConstraint) -> Self {
        Self::with_kind(SensorKind::Mouse, constraint)
    }

    /// Accepts touch input only.
    #[must_use]
    pub fn touch(constraint: ActivationConstraint) -> Self {
        Self::with_kind(SensorKind::Touch, constraint)
    }

    fn with_kind(kind: SensorKind, constraint: ActivationConstraint) -> Self {
        Self {
            kind,
            constraint,
            state: PointerState::Idle,
        }
    }

    /// The activation constraint in effect.
    #[must_use]
    pub const fn constraint(&self) -> ActivationConstraint {
        self.constraint
    }

    fn accepts(&self, device: PointerDevice) -> bool {
        match self.kind {
            SensorKind::Pointer => true,
            SensorKind::Mouse => matches!(device, PointerDevice::Mouse | PointerDevice::Pen),
            SensorKind::Touch => matches!(device, PointerDevice::Touch),
            SensorKind::Keyboard => false,
        }
    }

    fn activate(&mut self, pointer_id: u32, target: K, origin: Point, current: Point) -> Vec<SessionEvent<K>> {
        self.state = PointerState::Live { pointer_id };
        let mut out = Vec::with_capacity(2);
        out.push(SessionEvent::Begin {
            id: target,
            origin: self.kind,
            at: Some(origin),
        });
        if current != origin {
            out.push(SessionEvent::pointer_move(current));
        }
        out
    }

    fn on_pointer(&mut self, event: &PointerEvent<K>, now: Instant) -> Vec<SessionEvent<K>> {
        let position = event.position;
        match (&self.state, &event.kind) {
            (
                PointerState::Idle,
                PointerEventKind::Down {
                    target: Some(target),
                    button: PointerButton::Primary,
                },
            ) => {
                if !self.accepts(event.device) || !position.is_finite() {
                    return Vec::new();
                }
                if matches!(self.constraint, ActivationConstraint::Immediate) {
                    return self.activate(event.pointer_id, target.clone(), position, position);
                }
                self.state = PointerState::Pending {
                    pointer_id: event.pointer_id,
                    target: target.clone(),
                    origin: position,
                    last: position,
                    pressed_at: now,
                };
                Vec::new()
            }
            (
                PointerState::Pending {
                    pointer_id,
                    target,
                    origin,
                    pressed_at,
                    ..
                },
                PointerEventKind::Move,
            ) if *pointer_id == event.pointer_id => {
                let (pointer_id, target, origin, pressed_at) =
                    (*pointer_id, target.clone(), *origin, *pressed_at);
                let travelled = position.distance(origin);
                match self.constraint {
                    ActivationConstraint::Immediate => {
                        self.activate(pointer_id, target, origin, position)
                    }
                    ActivationConstraint::Distance { tolerance_px } => {
                        if travelled >= tolerance_px {
                            self.activate(pointer_id, target, origin, position)
                        } else {
                            self.touch_pending(position);
                            Vec::new()
                        }
                    }
                    ActivationConstraint::Delay {
                        delay,
                        tolerance_px,
                    } => {
                        if travelled > tolerance_px {
                            #[cfg(feature = "tracing")]
                            tracing::trace!(
                                sensor = ?self.kind,
                                travelled,
                                tolerance_px,
                                "pending activation aborted by movement"
                            );
                            self.state = PointerState::Idle;
                            Vec::new()
                        } else if now.saturating_duration_since(pressed_at) >= delay {
                            self.activate(pointer_id, target, origin, position)
                        } else {
                            self.touch_pending(position);
                            Vec::new()
                        }
                    }
                }
            }
            (
                PointerState::Pending { pointer_id, .. },
                PointerEventKind::Up { .. } | PointerEventKind::Cancel,
            ) if *pointer_id == event.pointer_id => {
                self.state = PointerState::Idle;
                Vec::new()
            }
            (PointerState::Live { pointer_id }, PointerEventKind::Move)
                if *pointer_id == event.pointer_id =>
            {
                vec![SessionEvent::pointer_move(position)]
            }
            (PointerState::Live { pointer_id }, PointerEventKind::Up { .. })
                if *pointer_id == event.pointer_id =>
            {
                self.state = PointerState::Idle;
                vec![SessionEvent::End]
            }
            (PointerState::Live { pointer_id }, PointerEventKind::Cancel)
                if *pointer_id == event.pointer_id =>
            {
                self.state = PointerState::Idle;
                vec![SessionEvent::Cancel(CancelReason::PointerCancel)]
            }
            _ => Vec::new(),
        }
    }

    fn touch_pending(&mut self, position: Point) {
        if let PointerState::Pending { last, .. } = &mut self.state {
            *last = position;
        }
    }
}

impl<K: Clone> Sensor<K> for PointerSensor<K> {
    fn kind(&self) -> SensorKind {
        self.kind
    }

    fn handle(&mut self, event: &InputEvent<K>, now: Instant) -> Vec<SessionEvent<K>> {
        match event {
            InputEvent::Pointer(pointer) => self.on_pointer(pointer, now),
            InputEvent::Key(KeyEvent {
                code: KeyCode::Escape,
                kind: KeyEventKind::Press,
                ..
            }) => match self.state {
                PointerState::Live { .. } => {
                    self.state = PointerState::Idle;
                    vec![SessionEvent::Cancel(CancelReason::Escape)]
                }
                PointerState::Pending { .. } => {
                    self.state = PointerState::Idle;
                    Vec::new()
                }
                PointerState::Idle => Vec::new(),
            },
            InputEvent::Key(_) => Vec::new(),
            InputEvent::Blur => match self.state {
                PointerState::Live { .. } => {
                    self.state = PointerState::Idle;
                    vec![SessionEvent::Cancel(CancelReason::Blur)]
                }
                _ => {
                    self.state = PointerState::Idle;
                    Vec::new()
                }
            },
        }
    }

    fn poll(&mut self, now: Instant) -> Vec<SessionEvent<K>> {
        let PointerState::Pending {
            pointer_id,
            target,
            origin,
            last,
            pressed_at,
        } = &self.state
        else {
            return Vec::new();
        };
        let ActivationConstraint::Delay { delay, .. } = self.constraint else {
            return Vec::new();
        };
        if now.saturating_duration_since(*pressed_at) < delay {
            return Vec::new();
        }
        let (pointer_id, target, origin, last) = (*pointer_id, target.clone(), *origin, *last);
        self.activate(pointer_id, target, origin, last)
    }

    fn is_live(&self) -> bool {
        matches!(self.state, PointerState::Live { .. })
    }

    fn is_pending(&self) -> bool {
        matches!(self.state, PointerState::Pending { .. })
    }

    fn reset(&mut self) {
        self.state = PointerState::Idle;
    }
}

// ---------------------------------------------------------------------------
// Keyboard sensor
// ---------------------------------------------------------------------------

/// Keyboard sensor: Space/Enter picks up and drops, arrows step, Escape
/// and Tab cancel.
///
/// Home and End step to the first and last slot. Keys pressed with Ctrl,
/// Alt, or Super are left to the host.
#[derive(Debug, Clone)]
pub struct KeyboardSensor {
    arrangement: Arrangement,
    live: bool,
}

impl KeyboardSensor {
    #[must_use]
    pub const fn new(arrangement: Arrangement) -> Self {
        Self {
            arrangement,
            live: false,
        }
    }

    #[must_use]
    pub const fn arrangement(&self) -> Arrangement {
        self.arrangement
    }

    fn is_activator(code: KeyCode) -> bool {
        matches!(code, KeyCode::Enter | KeyCode::Char(' '))
    }
}

impl<K: Clone> Sensor<K> for KeyboardSensor {
    fn kind(&self) -> SensorKind {
        SensorKind::Keyboard
    }

    fn handle(&mut self, event: &InputEvent<K>, _now: Instant) -> Vec<SessionEvent<K>> {
        match event {
            InputEvent::Key(key) => {
                if key.kind == KeyEventKind::Release || key.has_command_modifier() {
                    return Vec::new();
                }
                if !self.live {
                    if key.kind != KeyEventKind::Press || !Self::is_activator(key.code) {
                        return Vec::new();
                    }
                    let Some(id) = &key.focused else {
                        return Vec::new();
                    };
                    self.live = true;
                    return vec![SessionEvent::Begin {
                        id: id.clone(),
                        origin: SensorKind::Keyboard,
                        at: None,
                    }];
                }
                match key.code {
                    code if Self::is_activator(code) && key.kind == KeyEventKind::Press => {
                        self.live = false;
                        vec![SessionEvent::End]
                    }
                    KeyCode::Escape => {
                        self.live = false;
                        vec![SessionEvent::Cancel(CancelReason::Escape)]
                    }
                    KeyCode::Tab | KeyCode::BackTab => {
                        self.live = false;
                        vec![SessionEvent::Cancel(CancelReason::Blur)]
                    }
                    code => self
                        .arrangement
                        .step_for(code)
                        .map(|offset| vec![SessionEvent::step(offset)])
                        .unwrap_or_default(),
                }
            }
            InputEvent::Blur if self.live => {
                self.live = false;
                vec![SessionEvent::Cancel(CancelReason::Blur)]
            }
            InputEvent::Blur | InputEvent::Pointer(_) => Vec::new(),
        }
    }

    fn is_live(&self) -> bool {
        self.live
    }

    fn reset(&mut self) {
        self.live = false;
    }
}
