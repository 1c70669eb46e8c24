// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A host with a manual clock.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use kurbo::Size;
use scrollpin_core::backend::FrameSink;
use scrollpin_core::config::{ConfigError, EngineConfig};
use scrollpin_core::measure::LayoutProbe;
use scrollpin_core::mount::{HostSignals, Mount, ResizeSignal};
use scrollpin_core::session::{FrameOutput, MountParams, ScrollSession};
use scrollpin_core::time::{Duration, HostTime};

/// One 60 Hz frame in µs ticks.
pub const FRAME_INTERVAL: Duration = Duration(16_667);

/// A layout probe whose answers the test controls.
#[derive(Debug, Default)]
pub struct FakeProbe {
    track: Cell<Option<f64>>,
    viewport: Cell<Option<Size>>,
    reads: Cell<u64>,
}

impl FakeProbe {
    /// Creates a probe reporting the given track width and viewport.
    #[must_use]
    pub fn new(track: Option<f64>, viewport: Option<Size>) -> Self {
        Self {
            track: Cell::new(track),
            viewport: Cell::new(viewport),
            reads: Cell::new(0),
        }
    }

    /// Changes the reported track width.
    pub fn set_track_width(&self, width: Option<f64>) {
        self.track.set(width);
    }

    /// Changes the reported viewport.
    pub fn set_viewport(&self, viewport: Option<Size>) {
        self.viewport.set(viewport);
    }

    /// How many times the track width was read.
    #[must_use]
    pub fn reads(&self) -> u64 {
        self.reads.get()
    }
}

impl LayoutProbe for FakeProbe {
    fn track_width(&self) -> Option<f64> {
        self.reads.set(self.reads.get() + 1);
        self.track.get()
    }

    fn viewport(&self) -> Option<Size> {
        self.viewport.get()
    }
}

/// A presenter that records every frame it is given.
#[derive(Clone, Debug, Default)]
pub struct SpySink {
    log: Rc<RefCell<Vec<FrameOutput>>>,
}

impl SpySink {
    /// Creates an empty spy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames presented so far.
    #[must_use]
    pub fn frames(&self) -> Vec<FrameOutput> {
        self.log.borrow().clone()
    }

    /// Number of frames presented so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    /// Returns `true` if nothing was presented.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }
}

impl FrameSink for SpySink {
    fn present(&mut self, output: &FrameOutput) {
        self.log.borrow_mut().push(*output);
    }
}

/// Drives a mounted session with a manual clock.
///
/// Each [`tick`](Self::tick) is one display refresh: the clock moves by the
/// frame interval, timers due by then fire, and a frame runs if the session
/// asked for one.
pub struct FakeHost {
    clock: HostTime,
    interval: Duration,
    signals: HostSignals,
    probe: FakeProbe,
    spy: SpySink,
    mount: Mount,
    timers_fired: u64,
}

impl fmt::Debug for FakeHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeHost")
            .field("clock", &self.clock)
            .field("presented", &self.spy.len())
            .field("timers_fired", &self.timers_fired)
            .field("mount", &self.mount)
            .finish_non_exhaustive()
    }
}

impl FakeHost {
    /// Mounts a session at time zero. The probe reports `track_width` and
    /// the mount viewport.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `config` does not validate.
    pub fn new(
        config: EngineConfig,
        params: MountParams,
        track_width: Option<f64>,
    ) -> Result<Self, ConfigError> {
        let session = ScrollSession::new(config, params, HostTime(0))?;
        Ok(Self::attach(session, params.viewport, track_width))
    }

    /// Mounts an existing session. The clock starts at the session's last
    /// observed time.
    #[must_use]
    pub fn attach(session: ScrollSession, viewport: Size, track_width: Option<f64>) -> Self {
        let clock = session.last_time();
        let signals = HostSignals::new();
        let spy = SpySink::new();
        let mount = Mount::attach(session, &signals, Box::new(spy.clone()));
        Self {
            clock,
            interval: FRAME_INTERVAL,
            signals,
            probe: FakeProbe::new(track_width, Some(viewport)),
            spy,
            mount,
            timers_fired: 0,
        }
    }

    /// Builder: uses a different refresh interval.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Current clock.
    #[must_use]
    pub fn now(&self) -> HostTime {
        self.clock
    }

    /// The sources the session listens to.
    #[must_use]
    pub fn signals(&self) -> &HostSignals {
        &self.signals
    }

    /// The fake layout.
    #[must_use]
    pub fn probe(&self) -> &FakeProbe {
        &self.probe
    }

    /// The mount under test.
    #[must_use]
    pub fn mount(&self) -> &Mount {
        &self.mount
    }

    /// Emits a scroll position.
    pub fn scroll_to(&self, y: f64) {
        self.signals.scroll.emit(&y);
    }

    /// Resizes the viewport now. The probe reports the new size from here on.
    pub fn resize(&self, viewport: Size) {
        self.probe.set_viewport(Some(viewport));
        self.signals.resize.emit(&ResizeSignal {
            viewport,
            now: self.clock,
        });
    }

    /// Emits a reduced-motion preference change.
    pub fn set_reduced_motion(&self, reduced: bool) {
        self.signals.reduced_motion.emit(&reduced);
    }

    /// Changes what the probe reports for the track.
    pub fn set_track_width(&self, width: Option<f64>) {
        self.probe.set_track_width(width);
    }

    /// Runs one display refresh. Returns the presented frame, if any.
    pub fn tick(&mut self) -> Option<FrameOutput> {
        self.clock = self.clock.saturating_add(self.interval);
        if self
            .mount
            .wake()
            .deadline
            .is_some_and(|deadline| deadline <= self.clock)
        {
            let fired = self.mount.on_deadline(self.clock);
            self.timers_fired += fired as u64;
        }
        if self.mount.wake().frame {
            self.mount.on_frame(self.clock, &self.probe)
        } else {
            None
        }
    }

    /// Runs `n` refreshes. Returns the frames presented during them.
    pub fn run_frames(&mut self, n: u32) -> Vec<FrameOutput> {
        (0..n).filter_map(|_| self.tick()).collect()
    }

    /// Ticks until the session wants neither frames nor timers, or
    /// `max_ticks` refreshes have passed. Returns the frames presented.
    pub fn run_until_idle(&mut self, max_ticks: u32) -> Vec<FrameOutput> {
        let mut out = Vec::new();
        for _ in 0..max_ticks {
            if self.mount.wake().is_idle() {
                break;
            }
            out.extend(self.tick());
        }
        out
    }

    /// Returns `true` once the session requests nothing.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.mount.wake().is_idle()
    }

    /// Every frame presented so far.
    #[must_use]
    pub fn presented(&self) -> Vec<FrameOutput> {
        self.spy.frames()
    }

    /// Number of frames presented so far.
    #[must_use]
    pub fn presented_count(&self) -> usize {
        self.spy.len()
    }

    /// Most recent frame the session produced.
    #[must_use]
    pub fn last_output(&self) -> Option<FrameOutput> {
        self.mount.with_session(|s| s.output().copied())
    }

    /// Timers fired so far.
    #[must_use]
    pub fn timers_fired(&self) -> u64 {
        self.timers_fired
    }

    /// Runs `f` with read access to the session.
    pub fn with_session<R>(&self, f: impl FnOnce(&ScrollSession) -> R) -> R {
        self.mount.with_session(f)
    }

    /// Runs `f` with write access to the session.
    pub fn with_session_mut<R>(&self, f: impl FnOnce(&mut ScrollSession) -> R) -> R {
        self.mount.with_session_mut(f)
    }

    /// Tears the mount down at the current time.
    pub fn destroy(&mut self) -> bool {
        self.mount.destroy(self.clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollpin_core::mode::Mode;
    use scrollpin_core::progress::RegionGeometry;

    fn params(scroll_y: f64) -> MountParams {
        MountParams {
            region: RegionGeometry::new(0.0, 1800.0),
            viewport: Size::new(1000.0, 800.0),
            scroll_y,
            reduced_motion: false,
        }
    }

    #[test]
    fn first_tick_measures_and_presents() {
        let mut host = FakeHost::new(EngineConfig::web(), params(500.0), Some(3000.0)).unwrap();
        let out = host.tick().expect("mount requests a frame");
        assert_eq!(out.mode, Mode::Pinned);
        assert_eq!(out.translate, Some(-1000.0));
        assert_eq!(host.probe().reads(), 1);
        assert_eq!(host.presented_count(), 1);
    }

    #[test]
    fn idle_host_runs_only_the_retry() {
        let mut host = FakeHost::new(EngineConfig::web(), params(0.0), Some(3000.0)).unwrap();
        host.run_until_idle(100);
        assert!(host.is_idle());
        assert_eq!(host.timers_fired(), 1, "one deferred re-measurement");
        assert_eq!(host.probe().reads(), 2);

        let presented = host.presented_count();
        assert!(host.run_frames(30).is_empty(), "no frames while idle");
        assert_eq!(host.presented_count(), presented);
    }

    #[test]
    fn timers_fire_at_their_deadline() {
        let mut host = FakeHost::new(EngineConfig::web(), params(0.0), Some(3000.0)).unwrap();
        host.tick();
        // The retry is due 100 ms after mount: the 6th refresh is at 100.002 ms.
        for _ in 0..4 {
            host.tick();
            assert_eq!(host.timers_fired(), 0);
        }
        host.tick();
        assert_eq!(host.timers_fired(), 1);
    }
}
