#![forbid(unsafe_code)]

//! Listener registries with RAII unsubscription.
//!
//! Each [`Emitter`] owns a list of `FnMut` listeners behind
//! `Rc<RefCell<_>>`. Subscribing returns a [`Subscription`] guard holding a
//! weak handle to the registry; dropping the guard removes the listener.
//!
//! # Invariants
//!
//! 1. Emission snapshots the listener list before calling anything, so a
//!    listener may subscribe or drop guards (its own included) while being
//!    called.
//! 2. A listener removed during an emission is not called for the rest of
//!    that emission.
//! 3. A listener that re-enters its own emitter is skipped for the nested
//!    emission instead of double-borrowing.
//! 4. Guards outliving their emitter drop without effect.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Listener<E> = Rc<RefCell<dyn FnMut(&E)>>;

struct Registry<E> {
    next_id: u64,
    listeners: Vec<(u64, Listener<E>)>,
}

impl<E> Registry<E> {
    fn contains(&self, id: u64) -> bool {
        self.listeners.iter().any(|(existing, _)| *existing == id)
    }
}

trait Detach {
    fn detach(&self, id: u64);
}

impl<E> Detach for RefCell<Registry<E>> {
    fn detach(&self, id: u64) {
        match self.try_borrow_mut() {
            Ok(mut registry) => registry.listeners.retain(|(existing, _)| *existing != id),
            Err(_) => tracing::debug!(id, "listener registry busy; detach skipped"),
        }
    }
}

/// A single-event-type listener registry.
pub struct Emitter<E> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E: 'static> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> std::fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.len())
            .finish()
    }
}

impl<E: 'static> Emitter<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Register `listener`. It stays registered until the guard drops.
    #[must_use = "dropping the Subscription immediately unsubscribes"]
    pub fn subscribe(&self, listener: impl FnMut(&E) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        registry.next_id = registry.next_id.wrapping_add(1);
        let id = registry.next_id;
        let listener: Listener<E> = Rc::new(RefCell::new(listener));
        registry.listeners.push((id, listener));
        drop(registry);

        let handle: Rc<dyn Detach> = self.registry.clone();
        Subscription {
            id,
            registry: Rc::downgrade(&handle),
        }
    }

    /// Call every registered listener with `event`.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<(u64, Listener<E>)> = match self.registry.try_borrow() {
            Ok(registry) => registry.listeners.clone(),
            Err(_) => return,
        };
        for (id, listener) in snapshot {
            let still_registered = self
                .registry
                .try_borrow()
                .is_ok_and(|registry| registry.contains(id));
            if !still_registered {
                continue;
            }
            if let Ok(mut call) = listener.try_borrow_mut() {
                (&mut *call)(event);
            }
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry
            .try_borrow()
            .map_or(0, |registry| registry.listeners.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// RAII guard; dropping it unsubscribes the listener.
#[must_use = "dropping the Subscription immediately unsubscribes"]
pub struct Subscription {
    id: u64,
    registry: Weak<dyn Detach>,
}

impl Subscription {
    /// Whether the emitter still exists.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.registry.strong_count() > 0
    }

    /// Explicitly unsubscribe (same as dropping).
    pub fn unsubscribe(self) {}
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.detach(self.id);
        }
    }
}
