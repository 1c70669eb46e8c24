// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for scrollpin.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`ScrollPin`]: attaches a session to a wrapper/track element pair and
//!   drives it from window events
//! - [`FrameRequest`]: single-shot `requestAnimationFrame` wrapper
//! - [`Timeout`]: single-shot `setTimeout` wrapper keyed by deadline
//! - [`DomListener`]: an event listener removed on drop
//! - [`DomProbe`]: [`LayoutProbe`] over a track element and the window
//! - [`DomPresenter`]: [`FrameSink`] writing the track transform, wrapper
//!   height and an optional progress-driven opacity

#![no_std]

extern crate alloc;

mod driver;
mod listener;
mod presenter;
mod probe;
mod raf;
mod timeout;

pub use driver::{AttachError, AttachOptions, ScrollPin};
pub use listener::DomListener;
pub use presenter::DomPresenter;
pub use probe::DomProbe;
pub use raf::FrameRequest;
pub use scrollpin_core::backend::FrameSink;
pub use scrollpin_core::measure::LayoutProbe;
pub use timeout::Timeout;

use scrollpin_core::time::{HostTime, Timebase};

/// Returns the current host time from `performance.now()`.
///
/// The returned [`HostTime`] is in microsecond ticks. Use [`timebase`] to
/// convert to nanoseconds.
#[must_use]
pub fn now() -> HostTime {
    ms_to_host_time(raf::performance_now())
}

/// Returns the web [`Timebase`]: 1 tick = 1 µs = 1000 ns.
#[must_use]
pub fn timebase() -> Timebase {
    Timebase::MICROS
}

/// Converts a `DOMHighResTimeStamp` (ms) to µs ticks.
pub(crate) fn ms_to_host_time(ms: f64) -> HostTime {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "DOMHighResTimeStamp is a small positive f64; µs fits in u64"
    )]
    let us = (ms.max(0.0) * 1000.0) as u64;
    HostTime(us)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timebase_is_microsecond() {
        let tb = timebase();
        // 1 tick = 1 µs = 1000 ns
        assert_eq!(tb.ticks_to_nanos(1), 1000);
        assert_eq!(tb.ticks_to_nanos(1_000_000), 1_000_000_000);
    }

    #[test]
    fn timestamps_convert_to_micros() {
        assert_eq!(ms_to_host_time(16.5), HostTime(16_500));
        assert_eq!(ms_to_host_time(-3.0), HostTime(0));
    }
}
