// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-shot `setTimeout` keyed by deadline.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use scrollpin_core::time::HostTime;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "setTimeout")]
    fn set_timeout(handler: &JsValue, timeout_ms: i32) -> i32;

    #[wasm_bindgen(js_name = "clearTimeout")]
    fn clear_timeout(id: i32);
}

/// A `setTimeout` handle that tracks one deadline.
///
/// [`arm_at`](Self::arm_at) with the deadline already armed is a no-op, so
/// hosts can call it after every event without churning browser timers.
pub struct Timeout {
    inner: Rc<TimeoutInner>,
}

struct TimeoutInner {
    closure: RefCell<Option<Closure<dyn FnMut()>>>,
    callback: RefCell<Box<dyn FnMut()>>,
    armed: Cell<Option<HostTime>>,
    timeout_id: Cell<i32>,
}

impl Timeout {
    /// Creates a disarmed timeout.
    pub fn new(callback: impl FnMut() + 'static) -> Self {
        let inner = Rc::new(TimeoutInner {
            closure: RefCell::new(None),
            callback: RefCell::new(Box::new(callback)),
            armed: Cell::new(None),
            timeout_id: Cell::new(0),
        });

        let this = Rc::clone(&inner);
        let closure = Closure::wrap(Box::new(move || {
            if this.armed.take().is_none() {
                return;
            }
            if let Ok(mut callback) = this.callback.try_borrow_mut() {
                callback();
            }
        }) as Box<dyn FnMut()>);
        *inner.closure.borrow_mut() = Some(closure);

        Self { inner }
    }

    /// Arms the timeout for `deadline`, replacing any other deadline.
    pub fn arm_at(&self, deadline: HostTime, now: HostTime) {
        if self.inner.armed.get() == Some(deadline) {
            return;
        }
        self.cancel();
        if let Some(ref closure) = *self.inner.closure.borrow() {
            let id = set_timeout(closure.as_ref().unchecked_ref(), delay_ms(deadline, now));
            self.inner.timeout_id.set(id);
            self.inner.armed.set(Some(deadline));
        }
    }

    /// Disarms the timeout.
    pub fn cancel(&self) {
        if self.inner.armed.take().is_some() {
            clear_timeout(self.inner.timeout_id.get());
        }
    }

    /// The armed deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<HostTime> {
        self.inner.armed.get()
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for Timeout {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Timeout")
            .field("armed", &self.inner.armed.get())
            .finish_non_exhaustive()
    }
}

/// Milliseconds from `now` until `deadline` (µs ticks), rounded up so the
/// callback never runs before the deadline.
pub(crate) fn delay_ms(deadline: HostTime, now: HostTime) -> i32 {
    let us = deadline.ticks().saturating_sub(now.ticks());
    let ms = us.div_ceil(1000);
    i32::try_from(ms).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_rounds_up() {
        assert_eq!(delay_ms(HostTime(150_000), HostTime(0)), 150);
        assert_eq!(delay_ms(HostTime(150_001), HostTime(0)), 151);
        assert_eq!(delay_ms(HostTime(10), HostTime(20)), 0, "past deadline");
        assert_eq!(delay_ms(HostTime(u64::MAX), HostTime(0)), i32::MAX);
    }
}
