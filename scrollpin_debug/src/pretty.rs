// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to milliseconds using a [`Timebase`].

use std::io::Write;

use scrollpin_core::mode::Mode;
use scrollpin_core::time::{HostTime, Timebase};
use scrollpin_core::trace::{
    FrameEvent, MeasureEvent, ModeEvent, TeardownEvent, TimerAction, TimerEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn ms(&self, t: HostTime) -> f64 {
        self.timebase.ticks_to_nanos(t.ticks()) as f64 / 1e6
    }
}

fn mode_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Pinned => "pinned",
        Mode::Static => "static",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame(&mut self, e: &FrameEvent) {
        let translate = match e.translate {
            Some(x) => format!("{x:.1}px"),
            None => "-".to_owned(),
        };
        let state = if e.settling { "settling" } else { "rest" };
        let _ = writeln!(
            self.writer,
            "[frame] #{} at {:.3}ms {} {:?} raw={:.4} smooth={:.4} x={translate} max={:.1} {state}",
            e.frame_index,
            self.ms(e.now),
            mode_name(e.mode),
            e.profile,
            e.raw_progress,
            e.smoothed_progress,
            e.max_translate,
        );
    }

    fn on_measure(&mut self, e: &MeasureEvent) {
        let track = match e.track_width {
            Some(w) => format!("{w:.1}"),
            None => "unavailable".to_owned(),
        };
        let changed = if e.changed { "changed" } else { "same" };
        let _ = writeln!(
            self.writer,
            "[measure] at {:.3}ms track={track} viewport={:.1} bound={:.1} reserve={:.1} {changed}",
            self.ms(e.now),
            e.viewport_width,
            e.bound,
            e.reserve,
        );
    }

    fn on_mode(&mut self, e: &ModeEvent) {
        let _ = writeln!(
            self.writer,
            "[mode] at {:.3}ms {} -> {} profile={:?} reason={:?}",
            self.ms(e.now),
            mode_name(e.from),
            mode_name(e.to),
            e.profile,
            e.reason,
        );
    }

    fn on_timer(&mut self, e: &TimerEvent) {
        let action = match e.action {
            TimerAction::Scheduled => "scheduled",
            TimerAction::Cancelled => "cancelled",
            TimerAction::Fired => "fired",
        };
        let _ = writeln!(
            self.writer,
            "[timer] at {:.3}ms {:?} {action} deadline={:.3}ms",
            self.ms(e.now),
            e.kind,
            self.ms(e.deadline),
        );
    }

    fn on_teardown(&mut self, e: &TeardownEvent) {
        let _ = writeln!(
            self.writer,
            "[teardown] at {:.3}ms timers={} frame_request={} frames={}",
            self.ms(e.now),
            e.timers_cancelled,
            e.frame_cancelled,
            e.frames_rendered,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollpin_core::config::SmoothingProfile;
    use scrollpin_core::timer::TimerKind;

    #[test]
    fn pretty_print_frame() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::MICROS);
        sink.on_frame(&FrameEvent {
            frame_index: 3,
            now: HostTime(16_667),
            mode: Mode::Pinned,
            profile: SmoothingProfile::Smooth,
            raw_progress: 0.5,
            smoothed_progress: 0.25,
            translate: Some(-500.0),
            max_translate: 2000.0,
            settling: true,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.starts_with("[frame] #3"), "got: {output}");
        assert!(output.contains("x=-500.0px"), "got: {output}");
        assert!(output.contains("settling"), "got: {output}");
    }

    #[test]
    fn pretty_print_timer_and_teardown() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::MICROS);
        sink.on_timer(&TimerEvent {
            now: HostTime(0),
            kind: TimerKind::ResizeDebounce,
            action: TimerAction::Scheduled,
            deadline: HostTime(150_000),
        });
        sink.on_teardown(&TeardownEvent {
            now: HostTime(200_000),
            timers_cancelled: 1,
            frame_cancelled: false,
            frames_rendered: 12,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("deadline=150.000ms"), "got: {}", lines[0]);
        assert!(lines[1].contains("frames=12"), "got: {}", lines[1]);
    }
}
