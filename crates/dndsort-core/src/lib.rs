#![cfg_attr(not(test), forbid(unsafe_code))]

//! Core: geometry, canonical input, sensors, and animation primitives.
//!
//! # Role in dndsort
//! `dndsort-core` is the input layer. It owns the viewport geometry types,
//! the raw [`event::InputEvent`] vocabulary hosts translate into, and the
//! sensors that turn raw input into canonical [`sensor::SessionEvent`]s.
//!
//! # Primary responsibilities
//! - **Geometry**: points, vectors, rects, and list orientation.
//! - **Event**: host-neutral pointer, touch, and keyboard events.
//! - **Sensor**: activation constraints and key mapping per input family.
//! - **Animation**: tick-driven eased progress for drop motion.
//!
//! # How it fits in the system
//! `dndsort-sortable` consumes session events and drives the drag session,
//! collision, and reorder logic. Nothing in this crate knows about item
//! collections.

pub mod animation;
pub mod event;
pub mod geometry;
pub mod sensor;

pub use event::{InputEvent, KeyCode, KeyEvent, Modifiers, PointerDevice};
pub use geometry::{Orientation, Point, Rect, Vector};
pub use sensor::{
    ActivationConstraint, Arrangement, CancelReason, KeyboardSensor, MoveInput, PointerSensor,
    Sensor, SensorKind, SessionEvent,
};
