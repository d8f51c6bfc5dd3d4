#![forbid(unsafe_code)]

//! Floating proxy of the active item.
//!
//! The overlay follows the drag delta independent of list reflow, then
//! animates to its resting rect when the session ends. It has no authority
//! over ordering.
//!
//! # Invariants
//!
//! 1. `frame()` is `None` whenever the phase is `Hidden`.
//! 2. A drop animation always ends in `Hidden`.
//! 3. Opacity stays within `[ghost_opacity, 1.0]`.

use std::time::Duration;

use dndsort_core::animation::{Animation, Easing, Fade};
use dndsort_core::geometry::{Rect, Vector};
use serde::{Deserialize, Serialize};

use crate::bounds::ItemId;

/// Default drop animation length.
pub const DEFAULT_DROP_DURATION_MS: u64 = 250;
/// Default opacity of the in-list placeholder and of a cancelled proxy.
pub const DEFAULT_GHOST_OPACITY: f32 = 0.4;

/// Drop animation descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropAnimation {
    pub duration_ms: u64,
    pub easing: Easing,
    /// Placeholder opacity while dragging; a cancelled proxy fades to it.
    pub ghost_opacity: f32,
}

impl Default for DropAnimation {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DROP_DURATION_MS,
            easing: Easing::Ease,
            ghost_opacity: DEFAULT_GHOST_OPACITY,
        }
    }
}

impl DropAnimation {
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Same descriptor with no animation.
    #[must_use]
    pub const fn instant(mut self) -> Self {
        self.duration_ms = 0;
        self
    }
}

/// Presenter phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayPhase {
    Hidden,
    Following,
    Dropping,
}

/// What the host should draw this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFrame<K> {
    pub active_id: K,
    pub rect: Rect,
    pub opacity: f32,
    pub phase: OverlayPhase,
}

#[derive(Debug, Clone)]
enum OverlayState<K> {
    Hidden,
    Following {
        active_id: K,
        initial: Rect,
        delta: Vector,
    },
    Dropping {
        active_id: K,
        from: Rect,
        to: Rect,
        to_opacity: f32,
        progress: Fade,
    },
}

/// Overlay presenter for one container.
#[derive(Debug, Clone)]
pub struct OverlayPresenter<K> {
    animation: DropAnimation,
    state: OverlayState<K>,
}

impl<K: ItemId> OverlayPresenter<K> {
    #[must_use]
    pub const fn new(animation: DropAnimation) -> Self {
        Self {
            animation,
            state: OverlayState::Hidden,
        }
    }

    #[must_use]
    pub const fn animation(&self) -> DropAnimation {
        self.animation
    }

    pub fn set_animation(&mut self, animation: DropAnimation) {
        self.animation = animation;
    }

    #[must_use]
    pub const fn phase(&self) -> OverlayPhase {
        match self.state {
            OverlayState::Hidden => OverlayPhase::Hidden,
            OverlayState::Following { .. } => OverlayPhase::Following,
            OverlayState::Dropping { .. } => OverlayPhase::Dropping,
        }
    }

    /// Whether a drop animation is still running.
    #[must_use]
    pub const fn is_dropping(&self) -> bool {
        matches!(self.state, OverlayState::Dropping { .. })
    }

    /// Id the overlay currently represents, if visible.
    #[must_use]
    pub fn active_id(&self) -> Option<&K> {
        match &self.state {
            OverlayState::Hidden => None,
            OverlayState::Following { active_id, .. } | OverlayState::Dropping { active_id, .. } => {
                Some(active_id)
            }
        }
    }

    /// Track `active_id` at `initial` translated by `delta`.
    ///
    /// Without an initial rect there is nothing to draw and the overlay stays
    /// hidden. Replaces any running drop animation.
    pub fn follow(&mut self, active_id: &K, initial: Option<Rect>, delta: Vector) {
        self.state = match initial {
            Some(initial) => OverlayState::Following {
                active_id: active_id.clone(),
                initial,
                delta,
            },
            None => OverlayState::Hidden,
        };
    }

    /// Start the drop animation toward `target` (or back to the initial rect).
    ///
    /// `cancelled` fades the proxy to the ghost opacity. No-op unless
    /// following.
    pub fn drop_to(&mut self, target: Option<Rect>, cancelled: bool) {
        let OverlayState::Following {
            active_id,
            initial,
            delta,
        } = std::mem::replace(&mut self.state, OverlayState::Hidden)
        else {
            return;
        };
        let duration = self.animation.duration();
        if duration.is_zero() {
            return;
        }
        let to_opacity = if cancelled {
            self.animation.ghost_opacity
        } else {
            1.0
        };
        self.state = OverlayState::Dropping {
            active_id,
            from: initial.translate(delta),
            to: target.filter(Rect::is_finite).unwrap_or(initial),
            to_opacity,
            progress: Fade::new(duration).easing(self.animation.easing),
        };
    }

    /// Advance the drop animation by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        if let OverlayState::Dropping { progress, .. } = &mut self.state {
            progress.tick(dt);
            if progress.is_complete() {
                self.state = OverlayState::Hidden;
            }
        }
    }

    pub fn hide(&mut self) {
        self.state = OverlayState::Hidden;
    }

    /// Current frame, or `None` when hidden.
    #[must_use]
    pub fn frame(&self) -> Option<OverlayFrame<K>> {
        match &self.state {
            OverlayState::Hidden => None,
            OverlayState::Following {
                active_id,
                initial,
                delta,
            } => Some(OverlayFrame {
                active_id: active_id.clone(),
                rect: initial.translate(*delta),
                opacity: 1.0,
                phase: OverlayPhase::Following,
            }),
            OverlayState::Dropping {
                active_id,
                from,
                to,
                to_opacity,
                progress,
            } => {
                let t = progress.value();
                Some(OverlayFrame {
                    active_id: active_id.clone(),
                    rect: from.lerp(to, t),
                    opacity: 1.0 + (to_opacity - 1.0) * t,
                    phase: OverlayPhase::Dropping,
                })
            }
        }
    }
}
