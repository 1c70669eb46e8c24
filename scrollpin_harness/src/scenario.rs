// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted host input.
//!
//! A [`Scenario`] is a list of [`Step`]s replayed against a [`FakeHost`].
//! Signals are emitted at the host's current time; only `Frames` and
//! `Settle` move the clock.

use alloc::vec::Vec;

use kurbo::Size;
use scrollpin_core::session::FrameOutput;

use crate::host::FakeHost;
use crate::metrics::{MotionReport, MotionTracker};

/// One scripted host action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// Emit a scroll position.
    Scroll(f64),
    /// Resize the viewport.
    Resize(Size),
    /// Change the reduced-motion preference.
    ReducedMotion(bool),
    /// Change the track width the layout reports.
    TrackWidth(Option<f64>),
    /// Run this many refreshes.
    Frames(u32),
    /// Run until idle, at most this many refreshes.
    Settle(u32),
}

/// A replayable list of steps.
#[derive(Clone, Debug, Default)]
pub struct Scenario {
    steps: Vec<Step>,
}

impl Scenario {
    /// Creates an empty scenario.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step.
    #[must_use]
    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Appends [`Step::Scroll`].
    #[must_use]
    pub fn scroll(self, y: f64) -> Self {
        self.then(Step::Scroll(y))
    }

    /// Appends [`Step::Resize`].
    #[must_use]
    pub fn resize(self, width: f64, height: f64) -> Self {
        self.then(Step::Resize(Size::new(width, height)))
    }

    /// Appends [`Step::ReducedMotion`].
    #[must_use]
    pub fn reduced_motion(self, reduced: bool) -> Self {
        self.then(Step::ReducedMotion(reduced))
    }

    /// Appends [`Step::TrackWidth`].
    #[must_use]
    pub fn track_width(self, width: Option<f64>) -> Self {
        self.then(Step::TrackWidth(width))
    }

    /// Appends [`Step::Frames`].
    #[must_use]
    pub fn frames(self, n: u32) -> Self {
        self.then(Step::Frames(n))
    }

    /// Appends [`Step::Settle`].
    #[must_use]
    pub fn settle(self, max_ticks: u32) -> Self {
        self.then(Step::Settle(max_ticks))
    }

    /// The scripted steps.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Replays the steps. Returns every frame presented during the run.
    pub fn run(&self, host: &mut FakeHost) -> Vec<FrameOutput> {
        let mut presented = Vec::new();
        for step in &self.steps {
            match *step {
                Step::Scroll(y) => host.scroll_to(y),
                Step::Resize(size) => host.resize(size),
                Step::ReducedMotion(reduced) => host.set_reduced_motion(reduced),
                Step::TrackWidth(width) => host.set_track_width(width),
                Step::Frames(n) => presented.extend(host.run_frames(n)),
                Step::Settle(max) => presented.extend(host.run_until_idle(max)),
            }
        }
        presented
    }
}

/// Grades the smoothed progress of `frames` as one step response from
/// `start` toward the last frame's raw progress.
///
/// Returns `None` for an empty slice.
#[must_use]
pub fn motion_report(
    frames: &[FrameOutput],
    start: f64,
    settle_tolerance: f64,
    band_tolerance: f64,
) -> Option<MotionReport> {
    let target = frames.last()?.raw_progress;
    let mut tracker = MotionTracker::new(start, target, settle_tolerance, band_tolerance);
    for frame in frames {
        tracker.observe(frame.smoothed_progress);
    }
    Some(tracker.report())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MotionGrade;
    use alloc::rc::Rc;
    use core::cell::RefCell;
    use scrollpin_core::config::{EngineConfig, SmoothingProfile};
    use scrollpin_core::mode::Mode;
    use scrollpin_core::progress::RegionGeometry;
    use scrollpin_core::session::MountParams;
    use scrollpin_core::timer::TimerKind;
    use scrollpin_core::trace::{
        FrameEvent, MeasureEvent, ModeEvent, TeardownEvent, TimerAction, TimerEvent, TraceSink,
    };
    use scrollpin_debug::recorder::{RecordedEvent, RecorderSink, decode};

    const VIEWPORT: Size = Size::new(1000.0, 800.0);

    /// Reserved range `[0, 1000]`, track 3000 px.
    fn host_with(config: EngineConfig, viewport: Size, reduced_motion: bool) -> FakeHost {
        let params = MountParams {
            region: RegionGeometry::new(0.0, viewport.height + 1000.0),
            viewport,
            scroll_y: 0.0,
            reduced_motion,
        };
        FakeHost::new(config, params, Some(3000.0)).unwrap()
    }

    fn host() -> FakeHost {
        host_with(EngineConfig::web(), VIEWPORT, false)
    }

    #[derive(Clone, Default)]
    struct SharedRecorder(Rc<RefCell<RecorderSink>>);

    impl SharedRecorder {
        fn events(&self) -> Vec<RecordedEvent> {
            decode(self.0.borrow().as_bytes()).collect()
        }
    }

    impl TraceSink for SharedRecorder {
        fn on_frame(&mut self, e: &FrameEvent) {
            self.0.borrow_mut().on_frame(e);
        }
        fn on_measure(&mut self, e: &MeasureEvent) {
            self.0.borrow_mut().on_measure(e);
        }
        fn on_mode(&mut self, e: &ModeEvent) {
            self.0.borrow_mut().on_mode(e);
        }
        fn on_timer(&mut self, e: &TimerEvent) {
            self.0.borrow_mut().on_timer(e);
        }
        fn on_teardown(&mut self, e: &TeardownEvent) {
            self.0.borrow_mut().on_teardown(e);
        }
    }

    fn recorded(host: &FakeHost) -> SharedRecorder {
        let recorder = SharedRecorder::default();
        let sink = recorder.clone();
        host.with_session_mut(|s| s.set_trace_sink(alloc::boxed::Box::new(sink)));
        recorder
    }

    #[test]
    fn scenario_a_rests_at_half_the_bound() {
        let mut host = host();
        host.run_frames(1);
        let frames = Scenario::new().scroll(500.0).settle(600).run(&mut host);

        let last = host.last_output().unwrap();
        assert_eq!(last.max_translate, 2000.0);
        assert_eq!(last.raw_progress, 0.5);
        assert_eq!(last.smoothed_progress, 0.5);
        assert_eq!(last.translate, Some(-1000.0));
        assert!(host.is_idle());

        let report = motion_report(&frames, 0.0, 0.005, 0.01).unwrap();
        assert!(report.settle_frames.unwrap() > 2, "default profile lags");
        assert_eq!(report.overshoot, 0.0);
        assert_eq!(report.grade, MotionGrade::A, "report: {report:?}");
    }

    #[test]
    fn scenario_b_breakpoint_decides_the_mode() {
        let narrow = Size::new(800.0, 800.0);

        let mut pinned = host_with(EngineConfig::web(), narrow, false);
        Scenario::new().scroll(500.0).settle(600).run(&mut pinned);
        let out = pinned.last_output().unwrap();
        assert_eq!(out.mode, Mode::Pinned);
        assert_eq!(out.max_translate, 2200.0);
        assert_eq!(out.translate, Some(-1100.0));

        let mut fallback = host_with(EngineConfig::web().with_breakpoint(1024.0), narrow, false);
        let frames = Scenario::new().scroll(500.0).settle(600).run(&mut fallback);
        assert!(!frames.is_empty());
        for out in &frames {
            assert_eq!(out.mode, Mode::Static);
            assert_eq!(out.translate, None, "static mode produces no translate");
            assert_eq!(out.reservation_height, 0.0);
        }
    }

    #[test]
    fn scenario_c_reduced_motion_tracks_within_two_frames() {
        let mut reduced = host_with(EngineConfig::web(), VIEWPORT, true);
        reduced.run_frames(1);
        reduced.with_session(|s| assert_eq!(s.profile(), SmoothingProfile::Direct));

        let frames = Scenario::new().scroll(500.0).frames(2).run(&mut reduced);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].smoothed_progress, 0.5);
        assert_eq!(frames[1].translate, Some(-1000.0));

        let mut lagging = host();
        lagging.run_frames(1);
        let frames = Scenario::new().scroll(500.0).frames(2).run(&mut lagging);
        assert!(frames[1].smoothed_progress < 0.5, "default profile lags");
    }

    #[test]
    fn reduced_motion_toggle_mid_motion_switches_profile() {
        let mut host = host();
        host.run_frames(1);
        Scenario::new()
            .scroll(1000.0)
            .frames(3)
            .reduced_motion(true)
            .frames(3)
            .run(&mut host);
        let out = host.last_output().unwrap();
        assert_eq!(out.mode, Mode::Pinned);
        assert_eq!(out.smoothed_progress, 1.0);
        assert!(host.with_session(|s| s.smoother().is_at_rest()));
    }

    #[test]
    fn resize_burst_measures_once() {
        let mut host = host();
        let recorder = recorded(&host);
        host.run_until_idle(200);
        let before = host.with_session(|s| s.measurer().recomputations());

        for i in 1..=5 {
            host.resize(Size::new(1000.0 + f64::from(i) * 20.0, 800.0));
            host.tick();
        }
        host.run_until_idle(200);

        let after = host.with_session(|s| s.measurer().recomputations());
        assert_eq!(after - before, 1, "five resizes, one measurement");
        assert_eq!(host.last_output().unwrap().max_translate, 3000.0 - 1100.0);

        let debounce: Vec<TimerAction> = recorder
            .events()
            .into_iter()
            .filter_map(|e| match e {
                RecordedEvent::Timer(t) if t.kind == TimerKind::ResizeDebounce => Some(t.action),
                _ => None,
            })
            .collect();
        let count = |a: TimerAction| debounce.iter().filter(|x| **x == a).count();
        assert_eq!(count(TimerAction::Scheduled), 5);
        assert_eq!(count(TimerAction::Cancelled), 4);
        assert_eq!(count(TimerAction::Fired), 1);
    }

    #[test]
    fn remeasuring_unchanged_layout_is_idempotent() {
        let mut host = host();
        let recorder = recorded(&host);
        Scenario::new().scroll(250.0).settle(600).run(&mut host);
        let settled = host.last_output().unwrap();

        Scenario::new().resize(1000.0, 800.0).settle(600).run(&mut host);
        let again = host.last_output().unwrap();
        assert_eq!(again.translate, settled.translate);
        assert_eq!(again.max_translate, settled.max_translate);

        let last_measure = recorder
            .events()
            .into_iter()
            .rev()
            .find_map(|e| match e {
                RecordedEvent::Measure(m) => Some(m),
                _ => None,
            })
            .unwrap();
        assert!(!last_measure.changed);
        assert_eq!(last_measure.bound, 2000.0);
    }

    #[test]
    fn late_layout_replaces_the_placeholder() {
        let mut host = host();
        host.set_track_width(None);
        host.scroll_to(500.0);
        let first = host.tick().unwrap();
        assert_eq!(first.max_translate, 0.0, "no travel until measured");
        assert_eq!(first.translate, Some(0.0));
        assert_eq!(first.reservation_height, 800.0 + 1200.0, "placeholder reserves");

        // Layout lands before the deferred re-measurement.
        host.set_track_width(Some(3000.0));
        host.run_until_idle(600);
        let out = host.last_output().unwrap();
        assert_eq!(out.max_translate, 2000.0);
        assert_eq!(out.translate, Some(-1000.0));
        assert_eq!(out.reservation_height, 800.0 + 2000.0);
    }

    #[test]
    fn narrow_late_layout_never_moves_the_track_back() {
        let params = MountParams {
            region: RegionGeometry::new(0.0, 800.0 + 1200.0),
            viewport: VIEWPORT,
            scroll_y: 600.0,
            reduced_motion: false,
        };
        let mut host = FakeHost::new(EngineConfig::web(), params, None).unwrap();
        let mut frames: Vec<FrameOutput> = host.tick().into_iter().collect();

        // 500 px of travel, well under the 1200 px placeholder.
        host.set_track_width(Some(1500.0));
        frames.extend(host.run_until_idle(600));

        let last = frames.last().unwrap();
        assert_eq!(last.max_translate, 500.0);
        assert_eq!(last.translate, Some(-250.0));
        assert_eq!(last.reservation_height, 800.0 + 1200.0, "floor keeps the wrapper");

        let mut previous = 0.0;
        for out in &frames {
            let x = out.translate.unwrap();
            assert!((-out.max_translate..=0.0).contains(&x), "translate {x}");
            assert!(x <= previous, "track moved back from {previous} to {x}");
            previous = x;
        }
    }

    #[test]
    fn narrow_resize_mid_motion_goes_static_without_stale_offset() {
        let mut host = host();
        host.run_frames(1);
        let frames = Scenario::new()
            .scroll(800.0)
            .frames(3)
            .resize(600.0, 800.0)
            .frames(1)
            .run(&mut host);
        let last = frames.last().unwrap();
        assert_eq!(last.mode, Mode::Static);
        assert_eq!(last.translate, None);
        assert_eq!(last.smoothed_progress, last.raw_progress);

        let back = Scenario::new().resize(1000.0, 800.0).frames(1).run(&mut host);
        let out = back.last().unwrap();
        assert_eq!(out.mode, Mode::Pinned);
        assert_eq!(out.smoothed_progress, out.raw_progress, "no animation from a stale value");
    }

    #[test]
    fn teardown_silences_everything() {
        let mut host = host();
        let recorder = recorded(&host);
        assert_eq!(host.signals().listener_count(), 3);
        host.tick();
        host.scroll_to(400.0);

        assert!(host.destroy());
        assert_eq!(host.signals().listener_count(), 0);
        assert!(host.is_idle());

        let presented = host.presented_count();
        host.scroll_to(900.0);
        host.resize(Size::new(600.0, 800.0));
        host.set_reduced_motion(true);
        assert!(host.run_frames(120).is_empty());
        assert_eq!(host.presented_count(), presented);
        assert_eq!(host.timers_fired(), 0);
        assert!(!host.destroy(), "second destroy is a no-op");

        let teardown: Vec<TeardownEvent> = recorder
            .events()
            .into_iter()
            .filter_map(|e| match e {
                RecordedEvent::Teardown(t) => Some(t),
                _ => None,
            })
            .collect();
        assert_eq!(teardown.len(), 1);
        assert_eq!(teardown[0].timers_cancelled, 1, "the pending retry");
        assert!(teardown[0].frame_cancelled, "scroll was waiting for a frame");
    }

    #[test]
    fn outputs_stay_clamped_under_erratic_input() {
        let mut host = host();
        // Deterministic LCG over [-2000, 4000).
        let mut state: u32 = 0x2545_f491;
        let mut next = || {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            f64::from(state >> 8) / f64::from(1_u32 << 24) * 6000.0 - 2000.0
        };

        let mut frames = Vec::new();
        for _ in 0..300 {
            host.scroll_to(next());
            frames.extend(host.tick());
        }
        frames.extend(host.run_until_idle(1000));

        assert!(!frames.is_empty());
        for out in &frames {
            assert!((0.0..=1.0).contains(&out.raw_progress), "raw {}", out.raw_progress);
            assert!(
                (-0.01..=1.01).contains(&out.smoothed_progress),
                "smoothed {}",
                out.smoothed_progress
            );
            let x = out.translate.unwrap();
            assert!((-out.max_translate..=0.0).contains(&x), "translate {x}");
        }
        let last = frames.last().unwrap();
        assert_eq!(last.smoothed_progress, last.raw_progress, "converges once input stops");
        assert!(host.is_idle());
    }
}
