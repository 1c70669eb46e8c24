// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wiring a session to host signals and a presenter.
//!
//! [`Mount`] is what a host keeps alive for one pinned region. It owns the
//! [`ScrollSession`], the subscriptions that feed it and the [`FrameSink`]
//! that presents its output. Dropping (or [`destroy`](Mount::destroy)ing) the
//! mount detaches every listener synchronously and tears the session down;
//! after that the sink is never called again.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use kurbo::Size;

use crate::backend::FrameSink;
use crate::events::{EventSource, Subscription};
use crate::measure::LayoutProbe;
use crate::session::{FrameOutput, ScrollSession, Wake};
use crate::time::HostTime;

/// A viewport change together with when it happened.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeSignal {
    /// New viewport size.
    pub viewport: Size,
    /// Time of the resize.
    pub now: HostTime,
}

/// The host signals a session listens to.
#[derive(Clone, Debug, Default)]
pub struct HostSignals {
    /// Vertical scroll position.
    pub scroll: EventSource<f64>,
    /// Viewport resizes.
    pub resize: EventSource<ResizeSignal>,
    /// Reduced-motion preference changes.
    pub reduced_motion: EventSource<bool>,
}

impl HostSignals {
    /// Creates a set of sources with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total listeners across all sources.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.scroll.listener_count()
            + self.resize.listener_count()
            + self.reduced_motion.listener_count()
    }
}

/// A live session attached to host signals and a presenter.
pub struct Mount {
    session: Rc<RefCell<ScrollSession>>,
    subscriptions: Vec<Subscription>,
    sink: Option<Box<dyn FrameSink>>,
}

impl fmt::Debug for Mount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mount")
            .field("session", &self.session)
            .field("subscriptions", &self.subscriptions.len())
            .field("attached", &self.sink.is_some())
            .finish()
    }
}

impl Mount {
    /// Subscribes `session` to `signals` and presents through `sink`.
    #[must_use]
    pub fn attach(session: ScrollSession, signals: &HostSignals, sink: Box<dyn FrameSink>) -> Self {
        let session = Rc::new(RefCell::new(session));

        let subscriptions = alloc::vec![
            signals.scroll.subscribe(forward(&session, |s, y: &f64| {
                s.notify_scroll(*y);
            })),
            signals.resize.subscribe(forward(&session, |s, r: &ResizeSignal| {
                s.notify_resize(r.viewport, r.now);
            })),
            signals
                .reduced_motion
                .subscribe(forward(&session, |s, reduced: &bool| {
                    s.set_reduced_motion(*reduced);
                })),
        ];

        Self {
            session,
            subscriptions,
            sink: Some(sink),
        }
    }

    /// Runs a frame and presents it. Returns the presented output.
    pub fn on_frame(&mut self, now: HostTime, probe: &dyn LayoutProbe) -> Option<FrameOutput> {
        let sink = self.sink.as_mut()?;
        // The session borrow ends before the sink runs, so a sink that
        // triggers host events cannot observe a borrowed session.
        let output = self.session.borrow_mut().frame(now, probe)?;
        sink.present(&output);
        Some(output)
    }

    /// Fires timers due at `now`. Returns how many fired.
    pub fn on_deadline(&mut self, now: HostTime) -> usize {
        if self.sink.is_none() {
            return 0;
        }
        self.session.borrow_mut().advance(now)
    }

    /// What the host should schedule next.
    #[must_use]
    pub fn wake(&self) -> Wake {
        if self.sink.is_none() {
            return Wake::IDLE;
        }
        self.session.borrow().wake()
    }

    /// Runs `f` with read access to the session.
    pub fn with_session<R>(&self, f: impl FnOnce(&ScrollSession) -> R) -> R {
        f(&self.session.borrow())
    }

    /// Runs `f` with write access to the session, for inputs that do not
    /// arrive through [`HostSignals`] (region geometry, trace sinks).
    pub fn with_session_mut<R>(&self, f: impl FnOnce(&mut ScrollSession) -> R) -> R {
        f(&mut self.session.borrow_mut())
    }

    /// Returns `true` until [`destroy`](Self::destroy).
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.sink.is_some()
    }

    /// Detaches every listener, tears the session down and drops the sink.
    ///
    /// If the session is borrowed at that moment, listeners and sink are
    /// still released; the session itself is left as is.
    ///
    /// Returns `false` if already destroyed.
    pub fn destroy(&mut self, now: HostTime) -> bool {
        if self.sink.take().is_none() {
            return false;
        }
        self.subscriptions.clear();
        if let Ok(mut session) = self.session.try_borrow_mut() {
            session.destroy(now);
        }
        true
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        let now = self
            .session
            .try_borrow()
            .map_or(HostTime(0), |s| s.last_time());
        self.destroy(now);
    }
}

fn forward<E: ?Sized>(
    session: &Rc<RefCell<ScrollSession>>,
    apply: impl Fn(&mut ScrollSession, &E) + 'static,
) -> impl FnMut(&E) + 'static {
    let weak: Weak<RefCell<ScrollSession>> = Rc::downgrade(session);
    move |event: &E| {
        if let Some(session) = weak.upgrade()
            && let Ok(mut s) = session.try_borrow_mut()
        {
            apply(&mut s, event);
        }
    }
}
