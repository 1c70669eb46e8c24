// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A pinned region wired to the browser.
//!
//! [`ScrollPin`] owns everything one region needs on a page: the [`Mount`]
//! (session, subscriptions and presenter), the window listeners that feed
//! [`HostSignals`], one [`FrameRequest`] and one [`Timeout`]. After every
//! input it asks the session what to schedule via [`Mount::wake`], so frames
//! run only while something is pending or settling.
//!
//! Layout is read at the start of a frame, before any style write, and the
//! region height is the height the wrapper is given while pinned. A change
//! of reserved distance therefore feeds back into the anchors on the next
//! frame.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use scrollpin_core::config::{ConfigError, EngineConfig};
use scrollpin_core::mapper::{RangeMap, reservation_height};
use scrollpin_core::mount::{HostSignals, Mount, ResizeSignal};
use scrollpin_core::progress::RegionGeometry;
use scrollpin_core::session::{MountParams, ScrollSession};
use scrollpin_core::time::HostTime;
use scrollpin_core::trace::TraceSink;
use web_sys::{EventTarget, HtmlElement, MediaQueryList, Window};

use crate::listener::DomListener;
use crate::presenter::DomPresenter;
use crate::probe::{DomProbe, region_at, viewport_size};
use crate::raf::FrameRequest;
use crate::timeout::Timeout;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Why [`ScrollPin::attach`] failed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttachError {
    /// No `window` (not running in a browser main thread).
    NoWindow,
    /// The window reported no usable inner size.
    NoViewport,
    /// The engine configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindow => f.write_str("no window available"),
            Self::NoViewport => f.write_str("window has no usable inner size"),
            Self::Config(e) => write!(f, "invalid engine configuration: {e}"),
        }
    }
}

impl core::error::Error for AttachError {}

impl From<ConfigError> for AttachError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

struct Shared {
    window: Window,
    wrapper: HtmlElement,
    reduced_query: Option<MediaQueryList>,
    signals: HostSignals,
    mount: RefCell<Mount>,
    probe: DomProbe,
    region_top: Cell<f64>,
    frame: FrameRequest,
    timeout: Timeout,
}

impl Shared {
    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn on_scroll(&self) {
        self.signals.scroll.emit(&self.scroll_y());
        self.schedule();
    }

    fn on_resize(&self) {
        if let Some(viewport) = viewport_size(&self.window) {
            self.signals.resize.emit(&ResizeSignal {
                viewport,
                now: crate::now(),
            });
        }
        self.schedule();
    }

    fn on_reduced_motion(&self) {
        let reduced = self
            .reduced_query
            .as_ref()
            .is_some_and(MediaQueryList::matches);
        self.signals.reduced_motion.emit(&reduced);
        self.schedule();
    }

    fn on_frame(&self, now: HostTime) {
        let Ok(mut mount) = self.mount.try_borrow_mut() else {
            return;
        };
        if !mount.is_attached() {
            return;
        }
        // Read phase: document position of the wrapper.
        let top = region_at(&self.wrapper, self.scroll_y(), 0.0).top;
        self.region_top.set(top);
        sync_region(&mount, top);

        // Write phase: the presenter touches styles only.
        mount.on_frame(now, &self.probe);

        // The reserved distance may have changed with a new measurement.
        sync_region(&mount, top);
        drop(mount);
        self.schedule();
    }

    fn on_deadline(&self) {
        if let Ok(mut mount) = self.mount.try_borrow_mut() {
            mount.on_deadline(crate::now());
        }
        self.schedule();
    }

    fn schedule(&self) {
        let Ok(mount) = self.mount.try_borrow() else {
            return;
        };
        let wake = mount.wake();
        drop(mount);
        if wake.frame {
            self.frame.request();
        }
        match wake.deadline {
            Some(deadline) => self.timeout.arm_at(deadline, crate::now()),
            None => self.timeout.cancel(),
        }
    }

    fn destroy(&self) -> bool {
        self.frame.cancel();
        self.timeout.cancel();
        self.mount
            .try_borrow_mut()
            .is_ok_and(|mut mount| mount.destroy(crate::now()))
    }
}

fn sync_region(mount: &Mount, top: f64) {
    mount.with_session_mut(|s| {
        let height = reservation_height(s.viewport().height, s.measurer().reserve());
        s.set_region(RegionGeometry::new(top, height));
    });
}

/// Optional extras for [`ScrollPin::attach_with`].
#[derive(Default)]
pub struct AttachOptions {
    trace: Option<Box<dyn TraceSink>>,
    track_opacity: Option<RangeMap>,
}

impl fmt::Debug for AttachOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachOptions")
            .field("trace", &self.trace.is_some())
            .field("track_opacity", &self.track_opacity)
            .finish()
    }
}

impl AttachOptions {
    /// No trace sink and no extra effects.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `sink` on the session.
    #[must_use]
    pub fn with_trace_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.trace = Some(sink);
        self
    }

    /// Fades the track through `map` over smoothed progress.
    #[must_use]
    pub fn with_track_opacity(mut self, map: RangeMap) -> Self {
        self.track_opacity = Some(map);
        self
    }
}

/// A pinned region attached to the page.
///
/// Dropping it (or calling [`destroy`](Self::destroy)) removes every window
/// listener, cancels the outstanding frame and timer, and clears the inline
/// styles the presenter wrote.
pub struct ScrollPin {
    shared: Rc<Shared>,
    listeners: Vec<DomListener>,
}

impl fmt::Debug for ScrollPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollPin")
            .field("mount", &self.shared.mount)
            .field("listeners", &self.listeners.len())
            .field("frame", &self.shared.frame)
            .field("timeout", &self.shared.timeout)
            .finish_non_exhaustive()
    }
}

impl ScrollPin {
    /// Pins `track` inside `wrapper` and starts listening to the window.
    ///
    /// # Errors
    ///
    /// Returns an [`AttachError`] if there is no window, no usable viewport,
    /// or `config` is invalid.
    pub fn attach(
        wrapper: HtmlElement,
        track: HtmlElement,
        config: EngineConfig,
    ) -> Result<Self, AttachError> {
        Self::attach_with(wrapper, track, config, AttachOptions::new())
    }

    /// Like [`attach`](Self::attach), with a trace sink and presentation
    /// extras from `options`.
    ///
    /// # Errors
    ///
    /// See [`attach`](Self::attach).
    pub fn attach_with(
        wrapper: HtmlElement,
        track: HtmlElement,
        config: EngineConfig,
        options: AttachOptions,
    ) -> Result<Self, AttachError> {
        let window = web_sys::window().ok_or(AttachError::NoWindow)?;
        let viewport = viewport_size(&window).ok_or(AttachError::NoViewport)?;
        let scroll_y = window.scroll_y().unwrap_or(0.0);
        let reduced_query = window.match_media(REDUCED_MOTION_QUERY).ok().flatten();
        let reduced_motion = reduced_query
            .as_ref()
            .is_some_and(MediaQueryList::matches);

        let height = reservation_height(viewport.height, config.placeholder_bound);
        let params = MountParams {
            region: region_at(&wrapper, scroll_y, height),
            viewport,
            scroll_y,
            reduced_motion,
        };
        let mut session = ScrollSession::new(config, params, crate::now())?;
        if let Some(sink) = options.trace {
            session.set_trace_sink(sink);
        }

        let signals = HostSignals::new();
        let mut presenter = DomPresenter::new(track.clone(), wrapper.clone());
        if let Some(map) = options.track_opacity {
            presenter = presenter.with_track_opacity(map);
        }
        let mount = Mount::attach(session, &signals, Box::new(presenter));

        let shared = Rc::new_cyclic(|weak: &Weak<Shared>| {
            let w = weak.clone();
            let frame = FrameRequest::new(move |now| {
                if let Some(s) = w.upgrade() {
                    s.on_frame(now);
                }
            });
            let w = weak.clone();
            let timeout = Timeout::new(move || {
                if let Some(s) = w.upgrade() {
                    s.on_deadline();
                }
            });
            Shared {
                probe: DomProbe::new(track.into(), window.clone()),
                window,
                wrapper,
                reduced_query,
                signals,
                mount: RefCell::new(mount),
                region_top: Cell::new(params.region.top),
                frame,
                timeout,
            }
        });

        let mut listeners = Vec::new();
        let window_target: &EventTarget = shared.window.as_ref();
        listeners.extend(DomListener::new(
            window_target,
            "scroll",
            forward(&shared, Shared::on_scroll),
        ));
        listeners.extend(DomListener::new(
            window_target,
            "resize",
            forward(&shared, Shared::on_resize),
        ));
        if let Some(query) = &shared.reduced_query {
            let query_target: &EventTarget = query.as_ref();
            listeners.extend(DomListener::new(
                query_target,
                "change",
                forward(&shared, Shared::on_reduced_motion),
            ));
        }

        shared.schedule();
        Ok(Self { shared, listeners })
    }

    /// Runs `f` with read access to the session.
    pub fn with_session<R>(&self, f: impl FnOnce(&ScrollSession) -> R) -> R {
        self.shared.mount.borrow().with_session(f)
    }

    /// Document-space top of the wrapper as of the last frame.
    #[must_use]
    pub fn region_top(&self) -> f64 {
        self.shared.region_top.get()
    }

    /// Returns `true` until [`destroy`](Self::destroy).
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.shared
            .mount
            .try_borrow()
            .is_ok_and(|mount| mount.is_attached())
    }

    /// Detaches every listener and tears the session down.
    ///
    /// Returns `false` if already destroyed.
    pub fn destroy(&mut self) -> bool {
        self.listeners.clear();
        self.shared.destroy()
    }
}

impl Drop for ScrollPin {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn forward(
    shared: &Rc<Shared>,
    handler: fn(&Shared),
) -> impl FnMut(web_sys::Event) + 'static {
    let weak = Rc::downgrade(shared);
    move |_event| {
        if let Some(s) = weak.upgrade() {
            handler(&s);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use scrollpin_core::trace::NoopSink;

    #[test]
    fn options_collect_extras() {
        let fade = RangeMap::linear([0.0, 1.0], [1.0, 0.2]).unwrap();
        let options = AttachOptions::new()
            .with_trace_sink(Box::new(NoopSink))
            .with_track_opacity(fade.clone());
        assert!(options.trace.is_some());
        assert_eq!(options.track_opacity, Some(fade));
        assert!(format!("{options:?}").contains("trace: true"));
    }

    #[test]
    fn attach_error_mentions_the_config_problem() {
        let err = AttachError::from(ConfigError::ZeroStep);
        assert_eq!(
            format!("{err}"),
            "invalid engine configuration: maximum integration step must be non-zero"
        );
    }
}
