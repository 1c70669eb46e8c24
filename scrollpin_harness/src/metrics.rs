// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Motion quality metrics and grading.

use alloc::string::String;
use alloc::vec::Vec;

/// Letter grade for how a step response moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionGrade {
    /// Settled quickly with no overshoot.
    A,
    /// Settled with negligible overshoot.
    B,
    /// Settled and stayed inside the tolerance band.
    C,
    /// Did not settle, or left the band.
    D,
}

impl MotionGrade {
    /// Returns a short label for HUD rendering.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

/// Aggregated report returned by [`MotionTracker::observe`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionReport {
    /// Current grade.
    pub grade: MotionGrade,
    /// Largest travel past the target, in progress units.
    pub overshoot: f64,
    /// Largest excursion outside `[0, 1]`.
    pub band_excursion: f64,
    /// Frame at which the value entered the settle tolerance for good, if
    /// it has.
    pub settle_frames: Option<u64>,
    /// Frames observed.
    pub frames: u64,
}

/// Tracks one step response of smoothed progress.
#[derive(Clone, Debug)]
pub struct MotionTracker {
    start: f64,
    target: f64,
    settle_tolerance: f64,
    band_tolerance: f64,
    samples: Vec<f64>,
    overshoot: f64,
    band_excursion: f64,
    settled_at: Option<u64>,
}

impl MotionTracker {
    /// Frames within which an A grade must settle (one second at 60 Hz).
    pub const A_SETTLE_FRAMES: u64 = 60;
    /// Frames within which a B grade must settle.
    pub const B_SETTLE_FRAMES: u64 = 120;

    /// Creates a tracker for motion from `start` toward `target`.
    ///
    /// `settle_tolerance` is the distance from the target that counts as
    /// settled; `band_tolerance` is the allowed excursion outside `[0, 1]`.
    #[must_use]
    pub fn new(start: f64, target: f64, settle_tolerance: f64, band_tolerance: f64) -> Self {
        Self {
            start,
            target,
            settle_tolerance,
            band_tolerance,
            samples: Vec::new(),
            overshoot: 0.0,
            band_excursion: 0.0,
            settled_at: None,
        }
    }

    /// Observes one frame's smoothed progress and returns an updated report.
    pub fn observe(&mut self, smoothed: f64) -> MotionReport {
        self.samples.push(smoothed);
        let frame = self.samples.len() as u64;

        let direction = self.target - self.start;
        let past = if direction > 0.0 {
            smoothed - self.target
        } else if direction < 0.0 {
            self.target - smoothed
        } else {
            (smoothed - self.target).abs()
        };
        self.overshoot = self.overshoot.max(past);
        self.band_excursion = self
            .band_excursion
            .max(-smoothed)
            .max(smoothed - 1.0);

        if (smoothed - self.target).abs() <= self.settle_tolerance {
            self.settled_at.get_or_insert(frame);
        } else {
            self.settled_at = None;
        }

        self.report()
    }

    /// Current report.
    #[must_use]
    pub fn report(&self) -> MotionReport {
        MotionReport {
            grade: grade_for(
                self.overshoot,
                self.band_excursion,
                self.band_tolerance,
                self.settled_at,
            ),
            overshoot: self.overshoot,
            band_excursion: self.band_excursion,
            settle_frames: self.settled_at,
            frames: self.samples.len() as u64,
        }
    }

    /// Observed values, oldest first.
    #[must_use]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Returns an ASCII sparkline of the observed values over `[0, 1]`.
    #[must_use]
    pub fn sparkline_ascii(&self) -> String {
        const LEVELS: &[u8] = b" .:-=+*#%@";
        let mut out = String::with_capacity(self.samples.len());
        for &v in &self.samples {
            let t = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
            #[expect(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "index is clamped to ASCII level count"
            )]
            let level = (t * (LEVELS.len() as f64 - 1.0) + 0.5) as usize;
            out.push(LEVELS[level] as char);
        }
        out
    }
}

fn grade_for(
    overshoot: f64,
    band_excursion: f64,
    band_tolerance: f64,
    settled_at: Option<u64>,
) -> MotionGrade {
    let Some(settle) = settled_at else {
        return MotionGrade::D;
    };
    if band_excursion > band_tolerance {
        MotionGrade::D
    } else if overshoot <= 1e-9 && settle <= MotionTracker::A_SETTLE_FRAMES {
        MotionGrade::A
    } else if overshoot <= 0.001 && settle <= MotionTracker::B_SETTLE_FRAMES {
        MotionGrade::B
    } else {
        MotionGrade::C
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotone_fast_response_is_a() {
        let mut t = MotionTracker::new(0.0, 0.5, 0.001, 0.01);
        t.observe(0.3);
        let r = t.observe(0.5);
        assert_eq!(r.grade, MotionGrade::A);
        assert_eq!(r.settle_frames, Some(2));
        assert_eq!(r.overshoot, 0.0);
    }

    #[test]
    fn overshoot_is_measured_in_travel_direction() {
        let mut down = MotionTracker::new(1.0, 0.5, 0.001, 0.01);
        down.observe(0.45);
        let r = down.observe(0.5);
        assert!((r.overshoot - 0.05).abs() < 1e-12, "got {}", r.overshoot);
        assert_eq!(r.grade, MotionGrade::C);
    }

    #[test]
    fn leaving_the_tolerance_resets_settling() {
        let mut t = MotionTracker::new(0.0, 1.0, 0.001, 0.01);
        t.observe(1.0);
        t.observe(0.9);
        let r = t.report();
        assert_eq!(r.settle_frames, None);
        assert_eq!(r.grade, MotionGrade::D);
        let r = t.observe(1.0);
        assert_eq!(r.settle_frames, Some(3));
    }

    #[test]
    fn band_excursion_fails_the_grade() {
        let mut t = MotionTracker::new(0.0, 1.0, 0.001, 0.01);
        t.observe(1.05);
        let r = t.observe(1.0);
        assert_eq!(r.grade, MotionGrade::D);
        assert!((r.band_excursion - 0.05).abs() < 1e-12, "got {}", r.band_excursion);
    }

    #[test]
    fn sparkline_levels() {
        let mut t = MotionTracker::new(0.0, 1.0, 0.001, 0.01);
        for v in [0.0, 0.5, 1.0, 2.0] {
            t.observe(v);
        }
        assert_eq!(t.sparkline_ascii(), " +@@");
    }
}
