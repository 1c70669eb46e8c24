// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Floating point fields are stored as their IEEE 754 bit patterns, so a
//! recording reproduces every value exactly (NaN payloads included).

use scrollpin_core::config::SmoothingProfile;
use scrollpin_core::mode::{Mode, ModeReason};
use scrollpin_core::time::HostTime;
use scrollpin_core::timer::TimerKind;
use scrollpin_core::trace::{
    FrameEvent, MeasureEvent, ModeEvent, TeardownEvent, TimerAction, TimerEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_FRAME: u8 = 1;
const TAG_MEASURE: u8 = 2;
const TAG_MODE: u8 = 3;
const TAG_TIMER: u8 = 4;
const TAG_TEARDOWN: u8 = 5;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_option_f64(&mut self, v: Option<f64>) {
        match v {
            Some(val) => {
                self.write_u8(1);
                self.write_f64(val);
            }
            None => {
                self.write_u8(0);
                self.write_u64(0);
            }
        }
    }

    fn write_mode(&mut self, m: Mode) {
        self.write_u8(match m {
            Mode::Pinned => 0,
            Mode::Static => 1,
        });
    }

    fn write_profile(&mut self, p: SmoothingProfile) {
        self.write_u8(match p {
            SmoothingProfile::Smooth => 0,
            SmoothingProfile::Direct => 1,
        });
    }

    fn write_reason(&mut self, r: ModeReason) {
        self.write_u8(match r {
            ModeReason::Wide => 0,
            ModeReason::Compact => 1,
            ModeReason::ReducedMotion => 2,
            ModeReason::DegenerateRange => 3,
        });
    }

    fn write_timer_kind(&mut self, k: TimerKind) {
        self.write_u8(match k {
            TimerKind::ResizeDebounce => 0,
            TimerKind::InitialRetry => 1,
        });
    }

    fn write_timer_action(&mut self, a: TimerAction) {
        self.write_u8(match a {
            TimerAction::Scheduled => 0,
            TimerAction::Cancelled => 1,
            TimerAction::Fired => 2,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_frame(&mut self, e: &FrameEvent) {
        self.write_u8(TAG_FRAME);
        self.write_u64(e.frame_index);
        self.write_u64(e.now.ticks());
        self.write_mode(e.mode);
        self.write_profile(e.profile);
        self.write_f64(e.raw_progress);
        self.write_f64(e.smoothed_progress);
        self.write_option_f64(e.translate);
        self.write_f64(e.max_translate);
        self.write_bool(e.settling);
    }

    fn on_measure(&mut self, e: &MeasureEvent) {
        self.write_u8(TAG_MEASURE);
        self.write_u64(e.now.ticks());
        self.write_option_f64(e.track_width);
        self.write_f64(e.viewport_width);
        self.write_f64(e.bound);
        self.write_f64(e.reserve);
        self.write_bool(e.changed);
    }

    fn on_mode(&mut self, e: &ModeEvent) {
        self.write_u8(TAG_MODE);
        self.write_u64(e.now.ticks());
        self.write_mode(e.from);
        self.write_mode(e.to);
        self.write_profile(e.profile);
        self.write_reason(e.reason);
    }

    fn on_timer(&mut self, e: &TimerEvent) {
        self.write_u8(TAG_TIMER);
        self.write_u64(e.now.ticks());
        self.write_timer_kind(e.kind);
        self.write_timer_action(e.action);
        self.write_u64(e.deadline.ticks());
    }

    fn on_teardown(&mut self, e: &TeardownEvent) {
        self.write_u8(TAG_TEARDOWN);
        self.write_u64(e.now.ticks());
        self.write_u64(e.timers_cancelled as u64);
        self.write_bool(e.frame_cancelled);
        self.write_u64(e.frames_rendered);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`FrameEvent`].
    Frame(FrameEvent),
    /// A [`MeasureEvent`].
    Measure(MeasureEvent),
    /// A [`ModeEvent`].
    Mode(ModeEvent),
    /// A [`TimerEvent`].
    Timer(TimerEvent),
    /// A [`TeardownEvent`].
    Teardown(TeardownEvent),
}

impl RecordedEvent {
    /// Timestamp of the event.
    #[must_use]
    pub fn now(&self) -> HostTime {
        match self {
            Self::Frame(e) => e.now,
            Self::Measure(e) => e.now,
            Self::Mode(e) => e.now,
            Self::Timer(e) => e.now,
            Self::Teardown(e) => e.now,
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first truncated record or unknown tag.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_option_f64(&mut self) -> Option<Option<f64>> {
        let present = self.read_u8()?;
        let val = self.read_f64()?;
        Some(if present != 0 { Some(val) } else { None })
    }

    fn read_usize(&mut self) -> Option<usize> {
        usize::try_from(self.read_u64()?).ok()
    }

    fn read_mode(&mut self) -> Option<Mode> {
        Some(match self.read_u8()? {
            0 => Mode::Pinned,
            _ => Mode::Static,
        })
    }

    fn read_profile(&mut self) -> Option<SmoothingProfile> {
        Some(match self.read_u8()? {
            0 => SmoothingProfile::Smooth,
            _ => SmoothingProfile::Direct,
        })
    }

    fn read_reason(&mut self) -> Option<ModeReason> {
        Some(match self.read_u8()? {
            0 => ModeReason::Wide,
            1 => ModeReason::Compact,
            2 => ModeReason::ReducedMotion,
            _ => ModeReason::DegenerateRange,
        })
    }

    fn read_timer_kind(&mut self) -> Option<TimerKind> {
        Some(match self.read_u8()? {
            0 => TimerKind::ResizeDebounce,
            _ => TimerKind::InitialRetry,
        })
    }

    fn read_timer_action(&mut self) -> Option<TimerAction> {
        Some(match self.read_u8()? {
            0 => TimerAction::Scheduled,
            1 => TimerAction::Cancelled,
            _ => TimerAction::Fired,
        })
    }

    fn decode_frame(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Frame(FrameEvent {
            frame_index: self.read_u64()?,
            now: HostTime(self.read_u64()?),
            mode: self.read_mode()?,
            profile: self.read_profile()?,
            raw_progress: self.read_f64()?,
            smoothed_progress: self.read_f64()?,
            translate: self.read_option_f64()?,
            max_translate: self.read_f64()?,
            settling: self.read_bool()?,
        }))
    }

    fn decode_measure(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Measure(MeasureEvent {
            now: HostTime(self.read_u64()?),
            track_width: self.read_option_f64()?,
            viewport_width: self.read_f64()?,
            bound: self.read_f64()?,
            reserve: self.read_f64()?,
            changed: self.read_bool()?,
        }))
    }

    fn decode_mode(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Mode(ModeEvent {
            now: HostTime(self.read_u64()?),
            from: self.read_mode()?,
            to: self.read_mode()?,
            profile: self.read_profile()?,
            reason: self.read_reason()?,
        }))
    }

    fn decode_timer(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Timer(TimerEvent {
            now: HostTime(self.read_u64()?),
            kind: self.read_timer_kind()?,
            action: self.read_timer_action()?,
            deadline: HostTime(self.read_u64()?),
        }))
    }

    fn decode_teardown(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Teardown(TeardownEvent {
            now: HostTime(self.read_u64()?),
            timers_cancelled: self.read_usize()?,
            frame_cancelled: self.read_bool()?,
            frames_rendered: self.read_u64()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_FRAME => self.decode_frame(),
            TAG_MEASURE => self.decode_measure(),
            TAG_MODE => self.decode_mode(),
            TAG_TIMER => self.decode_timer(),
            TAG_TEARDOWN => self.decode_teardown(),
            _ => None,
        }
    }
}
