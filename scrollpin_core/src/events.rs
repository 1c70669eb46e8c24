// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-threaded event sources with owned subscriptions.
//!
//! Host-global signals (document scroll, window resize, media queries) are
//! modelled as [`EventSource`]s handed to each session instead of as shared
//! mutable state. Every [`subscribe`](EventSource::subscribe) returns a
//! [`Subscription`]; dropping it detaches the listener, so teardown is just
//! dropping the subscriptions a session owns.
//!
//! [`emit`](EventSource::emit) snapshots the listener list before calling
//! out, so listeners may subscribe or unsubscribe (themselves included)
//! while an event is being delivered. A listener detached mid-emit is not
//! called for the rest of that emit.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

type Listener<E> = Rc<RefCell<dyn FnMut(&E)>>;

struct Registry<E: ?Sized> {
    next_id: u64,
    listeners: Vec<(u64, Listener<E>)>,
}

impl<E: ?Sized> Registry<E> {
    fn contains(&self, id: u64) -> bool {
        self.listeners.iter().any(|(i, _)| *i == id)
    }

    fn remove(&mut self, id: u64) {
        self.listeners.retain(|(i, _)| *i != id);
    }
}

/// A source of `E` events.
///
/// Cloning an `EventSource` yields another handle to the same listener list.
pub struct EventSource<E: ?Sized> {
    inner: Rc<RefCell<Registry<E>>>,
}

impl<E: ?Sized> Clone for EventSource<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: ?Sized> Default for EventSource<E> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }
}

impl<E: ?Sized + 'static> fmt::Debug for EventSource<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSource")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<E: ?Sized + 'static> EventSource<E> {
    /// Creates a source with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a listener. It stays attached until the returned
    /// [`Subscription`] is dropped or detached.
    #[must_use = "dropping the subscription detaches the listener immediately"]
    pub fn subscribe(&self, listener: impl FnMut(&E) + 'static) -> Subscription {
        let listener: Listener<E> = Rc::new(RefCell::new(listener));
        let id = {
            let mut reg = self.inner.borrow_mut();
            let id = reg.next_id;
            reg.next_id += 1;
            reg.listeners.push((id, listener));
            id
        };
        let weak: Weak<RefCell<Registry<E>>> = Rc::downgrade(&self.inner);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(reg) = weak.upgrade() {
                    reg.borrow_mut().remove(id);
                }
            })),
        }
    }

    /// Delivers `event` to every listener attached at the time of the call.
    ///
    /// A listener that re-entrantly triggers its own source is not called
    /// recursively.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<(u64, Listener<E>)> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(id, l)| (*id, Rc::clone(l)))
            .collect();
        for (id, listener) in snapshot {
            if !self.inner.borrow().contains(id) {
                continue;
            }
            if let Ok(mut f) = listener.try_borrow_mut() {
                f(event);
            }
        }
    }

    /// Number of attached listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Keeps a listener attached; detaches it on drop.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Detaches the listener now.
    pub fn detach(mut self) {
        self.run_detach();
    }

    /// Returns `true` until the subscription is detached.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.detach.is_some()
    }

    fn run_detach(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_detach();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
