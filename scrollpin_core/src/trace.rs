// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for scroll sessions.
//!
//! This module provides a [`TraceSink`] trait with one method per event the
//! session emits: every rendered frame, every applied measurement, every mode
//! change, timer activity and teardown. All method bodies default to no-ops,
//! so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use crate::config::SmoothingProfile;
use crate::mode::{Mode, ModeReason};
use crate::time::HostTime;
use crate::timer::TimerKind;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What happened to a timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerAction {
    /// The timer was armed.
    Scheduled,
    /// The timer was cancelled before its deadline.
    Cancelled,
    /// The timer reached its deadline.
    Fired,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted for every frame the session renders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Frame timestamp.
    pub now: HostTime,
    /// Layout mode for this frame.
    pub mode: Mode,
    /// Active smoothing profile.
    pub profile: SmoothingProfile,
    /// Unsmoothed progress.
    pub raw_progress: f64,
    /// Smoothed progress.
    pub smoothed_progress: f64,
    /// Horizontal offset, `None` in static mode.
    pub translate: Option<f64>,
    /// Bound the offset was computed against.
    pub max_translate: f64,
    /// Whether the smoother still wants frames.
    pub settling: bool,
}

/// Emitted when a pending measurement is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasureEvent {
    /// Time of the frame that applied it.
    pub now: HostTime,
    /// Track width read from the layout, `None` if unavailable.
    pub track_width: Option<f64>,
    /// Viewport width used.
    pub viewport_width: f64,
    /// Resulting bound.
    pub bound: f64,
    /// Resulting reserved scroll distance.
    pub reserve: f64,
    /// Whether the bound changed.
    pub changed: bool,
}

/// Emitted when mode or profile changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeEvent {
    /// Time of the change.
    pub now: HostTime,
    /// Mode before the change.
    pub from: Mode,
    /// Mode after the change.
    pub to: Mode,
    /// Smoothing profile after the change.
    pub profile: SmoothingProfile,
    /// Deciding condition.
    pub reason: ModeReason,
}

/// Emitted for timer activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerEvent {
    /// Time of the activity.
    pub now: HostTime,
    /// Which timer.
    pub kind: TimerKind,
    /// What happened.
    pub action: TimerAction,
    /// The timer's deadline.
    pub deadline: HostTime,
}

/// Emitted once when a session is destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TeardownEvent {
    /// Time of teardown.
    pub now: HostTime,
    /// Timers that were still armed and got cancelled.
    pub timers_cancelled: usize,
    /// Whether a frame request was outstanding.
    pub frame_cancelled: bool,
    /// Frames rendered over the session's lifetime.
    pub frames_rendered: u64,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from a scroll session.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a frame is computed.
    fn on_frame(&mut self, e: &FrameEvent) {
        _ = e;
    }

    /// Called after a measurement is applied.
    fn on_measure(&mut self, e: &MeasureEvent) {
        _ = e;
    }

    /// Called when mode or profile changes.
    fn on_mode(&mut self, e: &ModeEvent) {
        _ = e;
    }

    /// Called on timer activity.
    fn on_timer(&mut self, e: &TimerEvent) {
        _ = e;
    }

    /// Called when the session is destroyed.
    fn on_teardown(&mut self, e: &TeardownEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameEvent`].
    #[inline]
    pub fn frame(&mut self, e: &FrameEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`MeasureEvent`].
    #[inline]
    pub fn measure(&mut self, e: &MeasureEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_measure(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ModeEvent`].
    #[inline]
    pub fn mode(&mut self, e: &ModeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_mode(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TimerEvent`].
    #[inline]
    pub fn timer(&mut self, e: &TimerEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_timer(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TeardownEvent`].
    #[inline]
    pub fn teardown(&mut self, e: &TeardownEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_teardown(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> FrameEvent {
        FrameEvent {
            frame_index: 42,
            now: HostTime(1_000_000),
            mode: Mode::Pinned,
            profile: SmoothingProfile::Smooth,
            raw_progress: 0.5,
            smoothed_progress: 0.4,
            translate: Some(-800.0),
            max_translate: 2000.0,
            settling: true,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_frame(&sample_frame());
        sink.on_timer(&TimerEvent {
            now: HostTime(0),
            kind: TimerKind::ResizeDebounce,
            action: TimerAction::Scheduled,
            deadline: HostTime(150_000),
        });
        sink.on_teardown(&TeardownEvent {
            now: HostTime(0),
            timers_cancelled: 1,
            frame_cancelled: false,
            frames_rendered: 0,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.frame(&sample_frame());
        tracer.mode(&ModeEvent {
            now: HostTime(0),
            from: Mode::Pinned,
            to: Mode::Static,
            profile: SmoothingProfile::Smooth,
            reason: ModeReason::Compact,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            frames: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_frame(&mut self, e: &FrameEvent) {
                self.frames.push(e.frame_index);
            }
        }

        let mut sink = RecordingSink { frames: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.frame(&sample_frame());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.frames, &[42]);
    }
}
