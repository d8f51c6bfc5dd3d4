#![forbid(unsafe_code)]

//! Canonical raw input events.
//!
//! Hosts translate their native pointer, touch, and keyboard events into
//! [`InputEvent`] values. The type parameter `K` is the item identifier the
//! host resolved by hit testing (which item's drag handle was pressed, which
//! item holds keyboard focus). Sensors turn these into session events.
//!
//! # Design Notes
//!
//! - Touch input is expressed as pointer events with [`PointerDevice::Touch`].
//! - `KeyEventKind` defaults to `Press` when the host cannot distinguish.
//! - `Modifiers` use bitflags for easy combination.

use bitflags::bitflags;

use crate::geometry::Point;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent<K> {
    /// Pointer, mouse, pen, or touch event.
    Pointer(PointerEvent<K>),

    /// A keyboard event.
    Key(KeyEvent<K>),

    /// The host window lost focus or became hidden.
    Blur,
}

impl<K> InputEvent<K> {
    /// Primary-button press on `target` (or on nothing).
    #[must_use]
    pub fn pointer_down(
        pointer_id: u32,
        device: PointerDevice,
        target: Option<K>,
        position: Point,
    ) -> Self {
        Self::Pointer(PointerEvent {
            pointer_id,
            device,
            position,
            kind: PointerEventKind::Down {
                target,
                button: PointerButton::Primary,
            },
        })
    }

    /// Pointer movement.
    #[must_use]
    pub fn pointer_move(pointer_id: u32, device: PointerDevice, position: Point) -> Self {
        Self::Pointer(PointerEvent {
            pointer_id,
            device,
            position,
            kind: PointerEventKind::Move,
        })
    }

    /// Primary-button release.
    #[must_use]
    pub fn pointer_up(pointer_id: u32, device: PointerDevice, position: Point) -> Self {
        Self::Pointer(PointerEvent {
            pointer_id,
            device,
            position,
            kind: PointerEventKind::Up {
                button: PointerButton::Primary,
            },
        })
    }

    /// Platform pointer cancellation (e.g. `pointercancel`, `touchcancel`).
    #[must_use]
    pub fn pointer_cancel(pointer_id: u32, device: PointerDevice, position: Point) -> Self {
        Self::Pointer(PointerEvent {
            pointer_id,
            device,
            position,
            kind: PointerEventKind::Cancel,
        })
    }

    /// Key press with the given focus target.
    #[must_use]
    pub fn key(code: KeyCode, focused: Option<K>) -> Self {
        Self::Key(KeyEvent::new(code, focused))
    }
}

/// A pointer event.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent<K> {
    /// Host pointer identifier. Touches carry one id per finger.
    pub pointer_id: u32,
    pub device: PointerDevice,
    pub position: Point,
    pub kind: PointerEventKind<K>,
}

/// What happened to the pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEventKind<K> {
    /// Button pressed (or finger placed). `target` is the item whose drag
    /// handle was hit, if any.
    Down {
        target: Option<K>,
        button: PointerButton,
    },
    Move,
    Up {
        button: PointerButton,
    },
    Cancel,
}

/// Physical device behind a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PointerDevice {
    Mouse,
    Pen,
    Touch,
}

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// A keyboard event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent<K> {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
    /// Item holding keyboard focus when the key was pressed.
    pub focused: Option<K>,
}

impl<K> KeyEvent<K> {
    /// Create a key press with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode, focused: Option<K>) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
            focused,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether a command modifier (Ctrl, Alt, Super) is held.
    #[must_use]
    pub const fn has_command_modifier(&self) -> bool {
        self.modifiers
            .intersects(Modifiers::CTRL.union(Modifiers::ALT).union(Modifiers::SUPER))
    }
}

/// Key codes relevant to sortable interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key. Space arrives as `Char(' ')`.
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}
