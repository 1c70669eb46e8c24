// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Frames become counter tracks (progress and offset), so settling curves can
//! be inspected directly in the timeline. Everything else is an instant event.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use scrollpin_core::time::Timebase;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Frame(e) => {
                let ts = ticks_to_us(e.now.ticks(), timebase);
                events.push(json!({
                    "ph": "C",
                    "name": "Progress",
                    "cat": "Frame",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "raw": e.raw_progress,
                        "smoothed": e.smoothed_progress,
                    }
                }));
                if let Some(x) = e.translate {
                    events.push(json!({
                        "ph": "C",
                        "name": "Translate",
                        "cat": "Frame",
                        "ts": ts,
                        "pid": 0,
                        "tid": 0,
                        "args": { "x": x }
                    }));
                }
            }
            RecordedEvent::Measure(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Measure",
                    "cat": "Layout",
                    "ts": ticks_to_us(e.now.ticks(), timebase),
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "track_width": e.track_width,
                        "viewport_width": e.viewport_width,
                        "bound": e.bound,
                        "reserve": e.reserve,
                        "changed": e.changed,
                    }
                }));
            }
            RecordedEvent::Mode(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.to),
                    "cat": "Mode",
                    "ts": ticks_to_us(e.now.ticks(), timebase),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "from": format!("{:?}", e.from),
                        "profile": format!("{:?}", e.profile),
                        "reason": format!("{:?}", e.reason),
                    }
                }));
            }
            RecordedEvent::Timer(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.kind),
                    "cat": "Timer",
                    "ts": ticks_to_us(e.now.ticks(), timebase),
                    "pid": 0,
                    "tid": 1,
                    "s": "t",
                    "args": {
                        "action": format!("{:?}", e.action),
                        "deadline_us": ticks_to_us(e.deadline.ticks(), timebase),
                    }
                }));
            }
            RecordedEvent::Teardown(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Teardown",
                    "cat": "Lifecycle",
                    "ts": ticks_to_us(e.now.ticks(), timebase),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "timers_cancelled": e.timers_cancelled,
                        "frame_cancelled": e.frame_cancelled,
                        "frames_rendered": e.frames_rendered,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}
