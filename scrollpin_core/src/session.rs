// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One pinned region, from mount to teardown.
//!
//! A [`ScrollSession`] ties the pieces together. Host events only record
//! state; all work happens in [`ScrollSession::frame`], in a fixed order:
//!
//! ```text
//!   due timers ──► pending measurement ──► anchors ──► mode
//!        │                                               │
//!        ▼                                               ▼
//!   progress (coalesced) ──► smoother ──► mapper ──► FrameOutput
//! ```
//!
//! so a frame never combines a stale bound with fresh progress.
//!
//! The session never schedules anything itself. [`ScrollSession::wake`] tells
//! the host whether another frame is wanted and when the next timer is due;
//! the host owns the actual `requestAnimationFrame`/`setTimeout` calls. Once
//! [`ScrollSession::destroy`] runs, every timer is gone, `wake` reports
//! nothing and every call is a no-op.

use alloc::boxed::Box;
use core::fmt;

use kurbo::Size;

use crate::config::{ConfigError, EngineConfig, SmoothingProfile};
use crate::mapper::{reservation_height, translate_for};
use crate::measure::{DimensionMeasurer, LayoutProbe, Rearm};
use crate::mode::{Mode, ModeDecision, ModeInputs, ModeSelector};
use crate::progress::{ProgressTracker, RegionGeometry, ScrollAnchors};
use crate::spring::MotionSmoother;
use crate::time::HostTime;
use crate::timer::{TimerKind, TimerQueue};
use crate::trace::{
    FrameEvent, MeasureEvent, ModeEvent, TeardownEvent, TimerAction, TimerEvent, TraceSink,
    Tracer,
};

/// Host state at mount time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MountParams {
    /// Region placement in document coordinates.
    pub region: RegionGeometry,
    /// Viewport size.
    pub viewport: Size,
    /// Current vertical scroll position.
    pub scroll_y: f64,
    /// Whether the user prefers reduced motion.
    pub reduced_motion: bool,
}

/// What the host should schedule next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Wake {
    /// Request an animation frame.
    pub frame: bool,
    /// Arm a timer for this deadline.
    pub deadline: Option<HostTime>,
}

impl Wake {
    /// Nothing to schedule.
    pub const IDLE: Self = Self {
        frame: false,
        deadline: None,
    };

    /// Returns `true` if nothing needs scheduling.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !self.frame && self.deadline.is_none()
    }
}

/// Everything a presenter needs for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameOutput {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Layout mode.
    pub mode: Mode,
    /// Horizontal track offset in `[−max_translate, 0]`; `None` in static
    /// mode.
    pub translate: Option<f64>,
    /// Unsmoothed progress in `[0, 1]`.
    pub raw_progress: f64,
    /// Smoothed progress in `[−ε, 1 + ε]`.
    pub smoothed_progress: f64,
    /// Current bound.
    pub max_translate: f64,
    /// Height of the wrapper that reserves the scroll distance (0 in static
    /// mode).
    pub reservation_height: f64,
}

/// Engine state for a single pinned region.
pub struct ScrollSession {
    config: EngineConfig,
    selector: ModeSelector,
    region: RegionGeometry,
    viewport: Size,
    reduced_motion: bool,
    decision: ModeDecision,
    tracker: ProgressTracker,
    smoother: MotionSmoother,
    measurer: DimensionMeasurer,
    timers: TimerQueue,
    needs_frame: bool,
    frame_index: u64,
    output: Option<FrameOutput>,
    last_time: HostTime,
    destroyed: bool,
    sink: Option<Box<dyn TraceSink>>,
}

impl fmt::Debug for ScrollSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollSession")
            .field("decision", &self.decision)
            .field("region", &self.region)
            .field("viewport", &self.viewport)
            .field("frame_index", &self.frame_index)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl ScrollSession {
    /// Creates a session and requests the initial measurement.
    ///
    /// The smoother starts at rest on the current progress, so a page loaded
    /// mid-region does not animate in from zero.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `config` does not validate.
    pub fn new(config: EngineConfig, params: MountParams, now: HostTime) -> Result<Self, ConfigError> {
        config.validate()?;
        let selector = ModeSelector::new(
            config.compact_breakpoint,
            config.reduced_motion_policy,
            config.preferred_profile,
        );
        let anchors = config.offsets.anchors(params.region, params.viewport.height);
        let tracker = ProgressTracker::new(anchors, params.scroll_y);
        let decision = selector.select(ModeInputs {
            viewport_width: params.viewport.width,
            reduced_motion: params.reduced_motion,
            degenerate_range: anchors.is_degenerate(),
        });
        let smoother = MotionSmoother::new(
            config.spring(decision.profile),
            tracker.progress(),
            config.overshoot_tolerance,
        );
        let mut measurer = DimensionMeasurer::new(
            config.placeholder_bound,
            config.resize_debounce,
            config.initial_measure_delay,
        );
        let mut timers = TimerQueue::new();
        measurer.on_mount(now, &mut timers);

        Ok(Self {
            config,
            selector,
            region: params.region,
            viewport: params.viewport,
            reduced_motion: params.reduced_motion,
            decision,
            tracker,
            smoother,
            measurer,
            timers,
            needs_frame: true,
            frame_index: 0,
            output: None,
            last_time: now,
            destroyed: false,
            sink: None,
        })
    }

    /// Installs a trace sink.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.sink = Some(sink);
    }

    /// Builder form of [`set_trace_sink`](Self::set_trace_sink).
    #[must_use]
    pub fn with_trace_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Removes and returns the trace sink.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.sink.take()
    }

    // -----------------------------------------------------------------------
    // Inputs
    // -----------------------------------------------------------------------

    /// Records a scroll position. Cheap; progress is recomputed on the next
    /// frame.
    pub fn notify_scroll(&mut self, scroll_y: f64) {
        if self.destroyed {
            return;
        }
        self.tracker.notify(scroll_y);
    }

    /// Records a viewport change.
    ///
    /// Mode is re-evaluated immediately; the track is re-measured once the
    /// debounce window closes.
    pub fn notify_resize(&mut self, viewport: Size, now: HostTime) {
        if self.destroyed {
            return;
        }
        self.observe(now);
        self.viewport = viewport;
        let rearm = self.measurer.on_resize(now, &mut self.timers);
        self.trace_rearm(now, TimerKind::ResizeDebounce, rearm);
        self.reevaluate_mode();
        self.needs_frame = true;
    }

    /// Records a change of the reduced-motion preference.
    pub fn set_reduced_motion(&mut self, reduced_motion: bool) {
        if self.destroyed || reduced_motion == self.reduced_motion {
            return;
        }
        self.reduced_motion = reduced_motion;
        self.reevaluate_mode();
        self.needs_frame = true;
    }

    /// Records new region geometry.
    pub fn set_region(&mut self, region: RegionGeometry) {
        if self.destroyed || region == self.region {
            return;
        }
        self.region = region;
        self.needs_frame = true;
    }

    /// Fires every timer due at `now`. Returns how many fired.
    pub fn advance(&mut self, now: HostTime) -> usize {
        if self.destroyed {
            return 0;
        }
        self.observe(now);
        let mut fired = 0;
        while let Some(expired) = self.timers.pop_expired(now) {
            self.measurer.on_timer(&expired);
            self.tracer().timer(&TimerEvent {
                now,
                kind: expired.kind,
                action: TimerAction::Fired,
                deadline: expired.deadline,
            });
            fired += 1;
        }
        fired
    }

    // -----------------------------------------------------------------------
    // Frame
    // -----------------------------------------------------------------------

    /// Runs one frame and returns what to present, or `None` after
    /// [`destroy`](Self::destroy).
    pub fn frame(&mut self, now: HostTime, probe: &dyn LayoutProbe) -> Option<FrameOutput> {
        if self.destroyed {
            return None;
        }
        self.advance(now);

        if self.measurer.is_pending() {
            let outcome = self.measurer.apply(probe, self.viewport.width);
            let reserve = self.measurer.reserve();
            self.tracer().measure(&MeasureEvent {
                now,
                track_width: outcome.track_width,
                viewport_width: outcome.viewport_width,
                bound: outcome.bound,
                reserve,
                changed: outcome.changed,
            });
        }

        let anchors = self
            .config
            .offsets
            .anchors(self.region, self.viewport.height);
        self.tracker.set_anchors(anchors);
        self.reevaluate_mode();

        let raw = self.tracker.resolve();
        let mode = self.decision.mode;
        let smoothed = match mode {
            Mode::Pinned => {
                self.smoother.set_target(raw);
                self.smoother
                    .tick(now, self.config.timebase, self.config.max_step)
            }
            Mode::Static => {
                // Keep the smoother parked on the input so re-pinning does
                // not animate from a stale value.
                self.smoother.snap_to(raw);
                raw
            }
        };

        let max_translate = self.measurer.bound();
        let (translate, reserved) = match mode {
            Mode::Pinned => (
                Some(translate_for(smoothed, max_translate)),
                reservation_height(self.viewport.height, self.measurer.reserve()),
            ),
            Mode::Static => (None, 0.0),
        };

        self.frame_index += 1;
        self.needs_frame = false;
        let output = FrameOutput {
            frame_index: self.frame_index,
            mode,
            translate,
            raw_progress: raw,
            smoothed_progress: smoothed,
            max_translate,
            reservation_height: reserved,
        };
        self.output = Some(output);

        let profile = self.decision.profile;
        let settling = !self.smoother.is_at_rest();
        self.tracer().frame(&FrameEvent {
            frame_index: output.frame_index,
            now,
            mode,
            profile,
            raw_progress: raw,
            smoothed_progress: smoothed,
            translate,
            max_translate,
            settling,
        });
        Some(output)
    }

    /// What the host should schedule next.
    ///
    /// A frame is wanted only while an input is unprocessed, a measurement is
    /// pending, or the smoother is settling. Idle sessions cost nothing.
    #[must_use]
    pub fn wake(&self) -> Wake {
        if self.destroyed {
            return Wake::IDLE;
        }
        Wake {
            frame: self.needs_frame
                || self.tracker.is_dirty()
                || self.measurer.is_pending()
                || !self.smoother.is_at_rest(),
            deadline: self.timers.next_deadline(),
        }
    }

    /// Releases every timer and frame request. Later calls do nothing.
    ///
    /// Returns `false` if the session was already destroyed.
    pub fn destroy(&mut self, now: HostTime) -> bool {
        if self.destroyed {
            return false;
        }
        self.observe(now);
        let frame_cancelled = self.wake().frame;
        let timers_cancelled = self.measurer.teardown(&mut self.timers) + self.timers.clear();
        self.destroyed = true;
        self.needs_frame = false;
        let frames_rendered = self.frame_index;
        self.tracer().teardown(&TeardownEvent {
            now,
            timers_cancelled,
            frame_cancelled,
            frames_rendered,
        });
        true
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Returns `true` after [`destroy`](Self::destroy).
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Output of the most recent frame.
    #[must_use]
    pub fn output(&self) -> Option<&FrameOutput> {
        self.output.as_ref()
    }

    /// Current layout mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.decision.mode
    }

    /// Current smoothing profile.
    #[must_use]
    pub fn profile(&self) -> SmoothingProfile {
        self.decision.profile
    }

    /// Full current mode decision.
    #[must_use]
    pub fn decision(&self) -> ModeDecision {
        self.decision
    }

    /// Current scroll anchors.
    #[must_use]
    pub fn anchors(&self) -> ScrollAnchors {
        self.tracker.anchors()
    }

    /// Current viewport.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Latest timestamp the session has seen.
    #[must_use]
    pub fn last_time(&self) -> HostTime {
        self.last_time
    }

    /// Number of frames rendered.
    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        self.frame_index
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The progress tracker (for diagnostics).
    #[must_use]
    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    /// The motion smoother (for diagnostics).
    #[must_use]
    pub fn smoother(&self) -> &MotionSmoother {
        &self.smoother
    }

    /// The dimension measurer (for diagnostics).
    #[must_use]
    pub fn measurer(&self) -> &DimensionMeasurer {
        &self.measurer
    }

    /// Number of armed timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn observe(&mut self, now: HostTime) {
        self.last_time = self.last_time.max(now);
    }

    fn reevaluate_mode(&mut self) {
        let next = self.selector.select(ModeInputs {
            viewport_width: self.viewport.width,
            reduced_motion: self.reduced_motion,
            degenerate_range: self.tracker.anchors().is_degenerate(),
        });
        if next == self.decision {
            return;
        }
        let from = self.decision.mode;
        if next.profile != self.decision.profile {
            self.smoother.set_spring(self.config.spring(next.profile));
        }
        self.decision = next;
        self.needs_frame = true;
        let now = self.last_time;
        self.tracer().mode(&ModeEvent {
            now,
            from,
            to: next.mode,
            profile: next.profile,
            reason: next.reason,
        });
    }

    fn trace_rearm(&mut self, now: HostTime, kind: TimerKind, rearm: Rearm) {
        if let Some(deadline) = rearm.replaced {
            self.tracer().timer(&TimerEvent {
                now,
                kind,
                action: TimerAction::Cancelled,
                deadline,
            });
        }
        self.tracer().timer(&TimerEvent {
            now,
            kind,
            action: TimerAction::Scheduled,
            deadline: rearm.deadline,
        });
    }

    fn tracer(&mut self) -> Tracer<'_> {
        match self.sink.as_deref_mut() {
            Some(sink) => Tracer::new(sink),
            None => Tracer::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReducedMotionPolicy;
    use crate::time::{Duration, Timebase};

    const FRAME: u64 = 16_667;

    struct Probe {
        track: Option<f64>,
        viewport: Size,
    }

    impl LayoutProbe for Probe {
        fn track_width(&self) -> Option<f64> {
            self.track
        }
        fn viewport(&self) -> Option<Size> {
            Some(self.viewport)
        }
    }

    /// Region laid out so that the reserved range is `[0, 1000]`.
    fn params(viewport: Size, scroll_y: f64, reduced_motion: bool) -> MountParams {
        MountParams {
            region: RegionGeometry::new(0.0, viewport.height + 1000.0),
            viewport,
            scroll_y,
            reduced_motion,
        }
    }

    fn probe(viewport: Size) -> Probe {
        Probe {
            track: Some(3000.0),
            viewport,
        }
    }

    fn run_until_idle(s: &mut ScrollSession, p: &Probe, mut now: u64, max: usize) -> u64 {
        for _ in 0..max {
            if !s.wake().frame {
                break;
            }
            now += FRAME;
            s.frame(HostTime(now), p);
        }
        now
    }

    #[test]
    fn at_rest_output_matches_progress() {
        let vp = Size::new(1000.0, 800.0);
        let mut s =
            ScrollSession::new(EngineConfig::web(), params(vp, 500.0, false), HostTime(0)).unwrap();
        let out = s.frame(HostTime(FRAME), &probe(vp)).unwrap();
        assert_eq!(out.mode, Mode::Pinned);
        assert_eq!(out.raw_progress, 0.5);
        assert_eq!(out.max_translate, 2000.0);
        assert_eq!(out.translate, Some(-1000.0));
        assert_eq!(out.reservation_height, 800.0 + 2000.0);
    }

    #[test]
    fn scrolling_settles_on_the_target() {
        let vp = Size::new(1000.0, 800.0);
        let p = probe(vp);
        let mut s =
            ScrollSession::new(EngineConfig::web(), params(vp, 0.0, false), HostTime(0)).unwrap();
        s.frame(HostTime(FRAME), &p);
        s.notify_scroll(500.0);
        let lagging = s.frame(HostTime(2 * FRAME), &p).unwrap();
        assert!(lagging.smoothed_progress < 0.5, "smooth profile lags");

        run_until_idle(&mut s, &p, 2 * FRAME, 1000);
        let out = s.output().unwrap();
        assert_eq!(out.smoothed_progress, 0.5);
        assert_eq!(out.translate, Some(-1000.0));
        assert!(!s.wake().frame, "settled sessions request no frames");
    }

    #[test]
    fn placeholder_reserves_but_does_not_translate() {
        let vp = Size::new(1000.0, 800.0);
        let mut s =
            ScrollSession::new(EngineConfig::web(), params(vp, 500.0, false), HostTime(0)).unwrap();
        let unavailable = Probe {
            track: None,
            viewport: vp,
        };
        let out = s.frame(HostTime(FRAME), &unavailable).unwrap();
        assert_eq!(out.max_translate, 0.0);
        assert_eq!(out.translate, Some(0.0));
        assert_eq!(out.reservation_height, 800.0 + 1200.0);
    }

    #[test]
    fn narrow_first_measurement_never_pulls_the_track_back() {
        let vp = Size::new(1000.0, 800.0);
        let mut s =
            ScrollSession::new(EngineConfig::web(), params(vp, 600.0, false), HostTime(0)).unwrap();
        let unavailable = Probe {
            track: None,
            viewport: vp,
        };
        let before = s.frame(HostTime(FRAME), &unavailable).unwrap();
        let narrow = Probe {
            track: Some(1500.0),
            viewport: vp,
        };
        s.advance(HostTime(100_000));
        let after = s.frame(HostTime(100_000 + FRAME), &narrow).unwrap();
        assert_eq!(after.max_translate, 500.0);
        let (Some(b), Some(a)) = (before.translate, after.translate) else {
            panic!("pinned frames carry a translate");
        };
        assert!(a <= b, "track moved back from {b} to {a}");
        assert!((-500.0..=0.0).contains(&a), "out of range: {a}");
    }

    #[test]
    fn compact_viewport_is_static() {
        let vp = Size::new(600.0, 800.0);
        let mut s =
            ScrollSession::new(EngineConfig::web(), params(vp, 500.0, false), HostTime(0)).unwrap();
        let out = s.frame(HostTime(FRAME), &probe(vp)).unwrap();
        assert_eq!(out.mode, Mode::Static);
        assert_eq!(out.translate, None);
    }

    #[test]
    fn resize_switches_mode_immediately() {
        let vp = Size::new(1000.0, 800.0);
        let mut s =
            ScrollSession::new(EngineConfig::web(), params(vp, 500.0, false), HostTime(0)).unwrap();
        s.frame(HostTime(FRAME), &probe(vp));
        s.notify_resize(Size::new(500.0, 800.0), HostTime(2 * FRAME));
        assert_eq!(s.mode(), Mode::Static);
        assert!(s.wake().frame);
    }

    #[test]
    fn reduced_motion_switches_profile_and_keeps_pinning() {
        let vp = Size::new(1000.0, 800.0);
        let mut s =
            ScrollSession::new(EngineConfig::web(), params(vp, 0.0, false), HostTime(0)).unwrap();
        s.set_reduced_motion(true);
        assert_eq!(s.mode(), Mode::Pinned);
        assert_eq!(s.profile(), SmoothingProfile::Direct);
    }

    #[test]
    fn static_policy_under_reduced_motion() {
        let vp = Size::new(1000.0, 800.0);
        let cfg = EngineConfig::web().with_reduced_motion_policy(ReducedMotionPolicy::StaticLayout);
        let mut s = ScrollSession::new(cfg, params(vp, 500.0, true), HostTime(0)).unwrap();
        let out = s.frame(HostTime(FRAME), &probe(vp)).unwrap();
        assert_eq!(out.mode, Mode::Static);
        assert_eq!(out.translate, None);
    }

    #[test]
    fn degenerate_region_falls_back_to_static() {
        let vp = Size::new(1000.0, 800.0);
        let mut p = params(vp, 0.0, false);
        // Shorter than the viewport: the pinned range is empty.
        p.region = RegionGeometry::new(0.0, 400.0);
        let mut s = ScrollSession::new(EngineConfig::web(), p, HostTime(0)).unwrap();
        let out = s.frame(HostTime(FRAME), &probe(vp)).unwrap();
        assert_eq!(out.mode, Mode::Static);
        assert_eq!(out.raw_progress, 0.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let vp = Size::new(1000.0, 800.0);
        let mut cfg = EngineConfig::web();
        cfg.smooth.damping_ratio = 0.5;
        let err = ScrollSession::new(cfg, params(vp, 0.0, false), HostTime(0)).unwrap_err();
        assert_eq!(err, ConfigError::Underdamped(0.5));
    }

    #[test]
    fn retry_timer_drives_a_second_measurement() {
        let vp = Size::new(1000.0, 800.0);
        let mut s =
            ScrollSession::new(EngineConfig::web(), params(vp, 0.0, false), HostTime(0)).unwrap();
        let early = Probe {
            track: None,
            viewport: vp,
        };
        s.frame(HostTime(FRAME), &early);
        assert_eq!(s.measurer().bound(), 0.0);
        assert_eq!(s.measurer().reserve(), 1200.0);

        let retry = Duration::from_millis(100, Timebase::MICROS);
        assert_eq!(s.wake().deadline, Some(HostTime(retry.ticks())));
        assert_eq!(s.advance(HostTime(retry.ticks())), 1);
        assert!(s.wake().frame);
        s.frame(HostTime(retry.ticks() + FRAME), &probe(vp));
        assert_eq!(s.measurer().bound(), 2000.0);
        assert_eq!(s.measurer().recomputations(), 2);
    }

    #[test]
    fn destroy_releases_everything() {
        let vp = Size::new(1000.0, 800.0);
        let mut s =
            ScrollSession::new(EngineConfig::web(), params(vp, 0.0, false), HostTime(0)).unwrap();
        s.notify_resize(Size::new(1100.0, 800.0), HostTime(10));
        assert_eq!(s.pending_timers(), 2);

        assert!(s.destroy(HostTime(20)));
        assert!(!s.destroy(HostTime(30)), "second destroy is a no-op");
        assert_eq!(s.pending_timers(), 0);
        assert_eq!(s.wake(), Wake::IDLE);
        assert!(s.frame(HostTime(40), &probe(vp)).is_none());

        s.notify_scroll(900.0);
        s.notify_resize(vp, HostTime(50));
        assert_eq!(s.pending_timers(), 0);
        assert_eq!(s.wake(), Wake::IDLE);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn trace_sink_sees_frames_and_teardown() {
        use alloc::rc::Rc;
        use core::cell::RefCell;

        #[derive(Default)]
        struct Counts {
            frames: u32,
            measures: u32,
            teardowns: u32,
        }
        struct Sink(Rc<RefCell<Counts>>);
        impl TraceSink for Sink {
            fn on_frame(&mut self, _: &FrameEvent) {
                self.0.borrow_mut().frames += 1;
            }
            fn on_measure(&mut self, _: &MeasureEvent) {
                self.0.borrow_mut().measures += 1;
            }
            fn on_teardown(&mut self, _: &TeardownEvent) {
                self.0.borrow_mut().teardowns += 1;
            }
        }

        let counts = Rc::new(RefCell::new(Counts::default()));
        let vp = Size::new(1000.0, 800.0);
        let mut s = ScrollSession::new(EngineConfig::web(), params(vp, 0.0, false), HostTime(0))
            .unwrap()
            .with_trace_sink(Box::new(Sink(counts.clone())));
        s.frame(HostTime(FRAME), &probe(vp));
        s.frame(HostTime(2 * FRAME), &probe(vp));
        s.destroy(HostTime(3 * FRAME));

        let c = counts.borrow();
        assert_eq!(c.frames, 2);
        assert_eq!(c.measures, 1);
        assert_eq!(c.teardowns, 1);
    }
}
