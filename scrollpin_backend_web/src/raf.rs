// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-shot `requestAnimationFrame` requests.
//!
//! Unlike a free-running loop, a [`FrameRequest`] only asks the browser for a
//! frame when [`request`](FrameRequest::request) is called, and at most one
//! request is outstanding at a time. A session at rest therefore costs no
//! frames at all. Each callback receives a [`DOMHighResTimeStamp`][mdn]
//! converted to microsecond [`HostTime`] ticks.
//!
//! [mdn]: https://developer.mozilla.org/en-US/docs/Web/API/DOMHighResTimeStamp

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use scrollpin_core::time::HostTime;

// Direct global bindings instead of `web_sys::Window` methods, so no
// Window/Performance object has to be fetched per frame.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type RafClosure = Closure<dyn FnMut(f64)>;

/// A coalescing `requestAnimationFrame` handle.
///
/// Any number of [`request`](Self::request) calls before the next frame
/// produce one callback. Dropping the handle cancels the outstanding request.
pub struct FrameRequest {
    inner: Rc<FrameInner>,
}

struct FrameInner {
    /// The JS closure registered with `requestAnimationFrame`.
    closure: RefCell<Option<RafClosure>>,

    /// Receives the frame timestamp.
    callback: RefCell<Box<dyn FnMut(HostTime)>>,

    /// Whether a request is outstanding.
    pending: Cell<bool>,

    /// ID of the outstanding request.
    raf_id: Cell<i32>,

    /// Callbacks delivered so far.
    delivered: Cell<u64>,
}

impl FrameRequest {
    /// Creates a handle with no request outstanding.
    pub fn new(callback: impl FnMut(HostTime) + 'static) -> Self {
        let inner = Rc::new(FrameInner {
            closure: RefCell::new(None),
            callback: RefCell::new(Box::new(callback)),
            pending: Cell::new(false),
            raf_id: Cell::new(0),
            delivered: Cell::new(0),
        });

        let this = Rc::clone(&inner);
        let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            if !this.pending.replace(false) {
                return;
            }
            this.delivered.set(this.delivered.get() + 1);
            let now = crate::ms_to_host_time(timestamp_ms);
            // The callback may call `request` again; that only touches the
            // `closure` cell, which is not borrowed mutably here.
            if let Ok(mut callback) = this.callback.try_borrow_mut() {
                callback(now);
            }
        }) as Box<dyn FnMut(f64)>);
        *inner.closure.borrow_mut() = Some(closure);

        Self { inner }
    }

    /// Asks for a frame. No-op if one is already outstanding.
    pub fn request(&self) {
        if self.inner.pending.get() {
            return;
        }
        if let Some(ref closure) = *self.inner.closure.borrow() {
            let id = request_animation_frame(closure.as_ref().unchecked_ref());
            self.inner.raf_id.set(id);
            self.inner.pending.set(true);
        }
    }

    /// Cancels the outstanding request, if any.
    pub fn cancel(&self) {
        if self.inner.pending.replace(false) {
            cancel_animation_frame(self.inner.raf_id.get());
        }
    }

    /// Returns `true` while a request is outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.pending.get()
    }
}

impl Drop for FrameRequest {
    fn drop(&mut self) {
        self.cancel();
        // The closure holds an `Rc` to `inner`; dropping it breaks the cycle.
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for FrameRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameRequest")
            .field("pending", &self.inner.pending.get())
            .field("delivered", &self.inner.delivered.get())
            .finish_non_exhaustive()
    }
}
