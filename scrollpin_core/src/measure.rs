// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Track measurement and the horizontal bound.
//!
//! [`DimensionMeasurer`] owns the answer to "how far can the track move":
//!
//! ```text
//! bound = max(0, track_width − viewport_width)
//! ```
//!
//! Measurement is never synchronous with the event that asks for it. Mount
//! and debounced resizes only mark a measurement as *pending*; the session
//! applies it at the start of the next frame, after layout has settled, by
//! reading a [`LayoutProbe`].
//!
//! Until a real measurement lands the bound is zero, so the first correction
//! can only widen it. The configured placeholder feeds the reserved scroll
//! distance instead, which keeps the wrapper tall enough before layout
//! settles. An unavailable or zero-width track is an expected state during
//! early layout and simply keeps the last known bound.

use kurbo::Size;

use crate::time::{Duration, HostTime};
use crate::timer::{Expired, TimerId, TimerKind, TimerQueue};

/// Read-only access to the host's laid-out geometry.
pub trait LayoutProbe {
    /// Full scrollable width of the content track, or `None` if the track is
    /// not laid out yet.
    fn track_width(&self) -> Option<f64>;

    /// Current viewport size, or `None` if unknown.
    fn viewport(&self) -> Option<Size>;
}

/// A timer armed by the measurer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rearm {
    /// Handle of the new timer.
    pub id: TimerId,
    /// Its deadline.
    pub deadline: HostTime,
    /// Deadline of the timer it replaced, if one was still armed.
    pub replaced: Option<HostTime>,
}

/// Result of one [`DimensionMeasurer::apply`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasureOutcome {
    /// Track width read from the probe (`None` if unavailable or zero).
    pub track_width: Option<f64>,
    /// Viewport width the bound was computed against.
    pub viewport_width: f64,
    /// Bound after this measurement.
    pub bound: f64,
    /// Whether the bound changed.
    pub changed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Measured {
    track_width: f64,
    viewport_width: f64,
    bound: f64,
}

/// Debounced, deferred measurement of the track bound.
#[derive(Clone, Debug)]
pub struct DimensionMeasurer {
    placeholder: f64,
    debounce_window: Duration,
    retry_delay: Duration,
    measured: Option<Measured>,
    pending: bool,
    debounce: Option<TimerId>,
    retry: Option<TimerId>,
    recomputations: u64,
}

impl DimensionMeasurer {
    /// Creates a measurer that reserves at least `placeholder` px of scroll.
    #[must_use]
    pub fn new(placeholder: f64, debounce_window: Duration, retry_delay: Duration) -> Self {
        Self {
            placeholder: sanitize(placeholder),
            debounce_window,
            retry_delay,
            measured: None,
            pending: false,
            debounce: None,
            retry: None,
            recomputations: 0,
        }
    }

    /// Requests a measurement on the next frame and schedules one deferred
    /// re-measurement, for layouts that are not final at mount time.
    pub fn on_mount(&mut self, now: HostTime, timers: &mut TimerQueue) -> Rearm {
        self.pending = true;
        let replaced = self.retry.take().and_then(|id| timers.cancel(id));
        let deadline = now.saturating_add(self.retry_delay);
        let id = timers.schedule(deadline, TimerKind::InitialRetry);
        self.retry = Some(id);
        Rearm {
            id,
            deadline,
            replaced,
        }
    }

    /// Restarts the resize debounce window.
    ///
    /// Every resize inside the window pushes the deadline back, so a burst of
    /// resizes ends in exactly one measurement.
    pub fn on_resize(&mut self, now: HostTime, timers: &mut TimerQueue) -> Rearm {
        let replaced = self.debounce.take().and_then(|id| timers.cancel(id));
        let deadline = now.saturating_add(self.debounce_window);
        let id = timers.schedule(deadline, TimerKind::ResizeDebounce);
        self.debounce = Some(id);
        Rearm {
            id,
            deadline,
            replaced,
        }
    }

    /// Handles an expired timer. Returns `true` if it belonged to this
    /// measurer, in which case a measurement is now pending.
    pub fn on_timer(&mut self, expired: &Expired) -> bool {
        if self.debounce == Some(expired.id) {
            self.debounce = None;
        } else if self.retry == Some(expired.id) {
            self.retry = None;
        } else {
            return false;
        }
        self.pending = true;
        true
    }

    /// Returns `true` if a measurement should run on the next frame.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Returns `true` while a debounce or retry timer is armed.
    #[must_use]
    pub fn has_timers(&self) -> bool {
        self.debounce.is_some() || self.retry.is_some()
    }

    /// Reads the probe and updates the bound.
    ///
    /// `fallback_viewport_width` is used when the probe cannot report the
    /// viewport. Applying twice against unchanged layout never changes the
    /// bound.
    pub fn apply(
        &mut self,
        probe: &dyn LayoutProbe,
        fallback_viewport_width: f64,
    ) -> MeasureOutcome {
        self.pending = false;
        self.recomputations += 1;

        let before = self.bound();
        let viewport_width = probe
            .viewport()
            .map(|s| s.width)
            .filter(|w| w.is_finite())
            .unwrap_or(fallback_viewport_width);
        let track_width = probe
            .track_width()
            .filter(|w| w.is_finite() && *w > 0.0);

        if let Some(track) = track_width {
            let viewport = sanitize(viewport_width);
            self.measured = Some(Measured {
                track_width: track,
                viewport_width: viewport,
                bound: (track - viewport).max(0.0),
            });
        }

        let bound = self.bound();
        MeasureOutcome {
            track_width,
            viewport_width,
            bound,
            changed: bound != before,
        }
    }

    /// Current bound: the measured value, or `0.0` before the first
    /// successful measurement.
    #[must_use]
    pub fn bound(&self) -> f64 {
        self.measured.map_or(0.0, |m| m.bound)
    }

    /// Scroll distance to reserve: never less than the placeholder.
    #[must_use]
    pub fn reserve(&self) -> f64 {
        self.bound().max(self.placeholder)
    }

    /// Returns `true` once a real measurement has landed.
    #[must_use]
    pub fn is_measured(&self) -> bool {
        self.measured.is_some()
    }

    /// Last measured `(track_width, viewport_width)`.
    #[must_use]
    pub fn last_measurement(&self) -> Option<(f64, f64)> {
        self.measured.map(|m| (m.track_width, m.viewport_width))
    }

    /// Number of measurements applied so far.
    #[must_use]
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Cancels every timer this measurer owns and drops the pending request.
    /// Returns how many timers were still armed.
    pub fn teardown(&mut self, timers: &mut TimerQueue) -> usize {
        self.pending = false;
        [self.debounce.take(), self.retry.take()]
            .into_iter()
            .flatten()
            .filter(|id| timers.cancel(*id).is_some())
            .count()
    }
}

fn sanitize(px: f64) -> f64 {
    if px.is_finite() { px.max(0.0) } else { 0.0 }
}
