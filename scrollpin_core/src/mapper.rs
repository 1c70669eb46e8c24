// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Progress → presentation values.
//!
//! The mandatory mapping is [`translate_for`]: smoothed progress times the
//! measured bound, negated, so the track slides left as the page scrolls
//! down. The result is clamped to `[−max_translate, 0]` even when the
//! smoothed value briefly leaves `[0, 1]`.
//!
//! [`RangeMap`] generalizes this to any clamped piecewise-linear curve, for
//! secondary effects (scale, opacity, vertical drift) driven by the same
//! progress signal.

use alloc::vec::Vec;
use core::fmt;

use kurbo::Vec2;

/// Horizontal offset for `smoothed` progress against `max_translate`.
///
/// Always in `[−max_translate, 0]`. Negative or non-finite bounds count as 0,
/// and NaN progress counts as 0.
#[must_use]
pub fn translate_for(smoothed: f64, max_translate: f64) -> f64 {
    let max = if max_translate.is_finite() {
        max_translate.max(0.0)
    } else {
        0.0
    };
    let p = if smoothed.is_nan() {
        0.0
    } else {
        smoothed.clamp(0.0, 1.0)
    };
    // `0.0 - x` rather than `-x` keeps a positive zero at progress 0.
    0.0 - p * max
}

/// [`translate_for`] as a 2D offset for presenters working in vectors, such
/// as the web backend's DOM presenter.
#[must_use]
pub fn translate_offset(smoothed: f64, max_translate: f64) -> Vec2 {
    Vec2::new(translate_for(smoothed, max_translate), 0.0)
}

/// Height of the wrapper that reserves the scroll distance: one viewport of
/// pinned content plus `reserve` extra pixels.
#[must_use]
pub fn reservation_height(viewport_height: f64, reserve: f64) -> f64 {
    let vh = if viewport_height.is_finite() {
        viewport_height.max(0.0)
    } else {
        0.0
    };
    let extra = if reserve.is_finite() { reserve.max(0.0) } else { 0.0 };
    vh + extra
}

/// Reasons a [`RangeMap`] cannot be built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeError {
    /// Fewer than two stops.
    TooFewStops,
    /// Input and output stop counts differ.
    LengthMismatch {
        /// Number of input stops.
        input: usize,
        /// Number of output stops.
        output: usize,
    },
    /// Input stops are not strictly ascending.
    NotAscending,
    /// A stop is NaN or infinite.
    NonFinite,
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewStops => f.write_str("a range needs at least two stops"),
            Self::LengthMismatch { input, output } => {
                write!(f, "{input} input stops but {output} output stops")
            }
            Self::NotAscending => f.write_str("input stops must be strictly ascending"),
            Self::NonFinite => f.write_str("range stops must be finite"),
        }
    }
}

impl core::error::Error for RangeError {}

/// Clamped piecewise-linear mapping between stop lists.
///
/// Inputs below the first stop map to the first output, inputs above the
/// last stop map to the last output. Presenters evaluate it at smoothed
/// progress for effects that follow the track (the web backend's track
/// opacity, for one).
#[derive(Clone, Debug, PartialEq)]
pub struct RangeMap {
    input: Vec<f64>,
    output: Vec<f64>,
}

impl RangeMap {
    /// Builds a map from matching stop lists.
    ///
    /// # Errors
    ///
    /// Returns a [`RangeError`] if the stops are too few, mismatched, not
    /// strictly ascending, or not finite.
    pub fn new(input: &[f64], output: &[f64]) -> Result<Self, RangeError> {
        if input.len() != output.len() {
            return Err(RangeError::LengthMismatch {
                input: input.len(),
                output: output.len(),
            });
        }
        if input.len() < 2 {
            return Err(RangeError::TooFewStops);
        }
        if !input.iter().chain(output).all(|v| v.is_finite()) {
            return Err(RangeError::NonFinite);
        }
        if input.windows(2).any(|w| w[1] <= w[0]) {
            return Err(RangeError::NotAscending);
        }
        Ok(Self {
            input: input.to_vec(),
            output: output.to_vec(),
        })
    }

    /// Two-stop shorthand.
    ///
    /// # Errors
    ///
    /// Same as [`RangeMap::new`].
    pub fn linear(from: [f64; 2], to: [f64; 2]) -> Result<Self, RangeError> {
        Self::new(&from, &to)
    }

    /// Maps `x` through the stops.
    #[must_use]
    pub fn map(&self, x: f64) -> f64 {
        let last = self.input.len() - 1;
        if !x.is_finite() || x <= self.input[0] {
            return self.output[0];
        }
        if x >= self.input[last] {
            return self.output[last];
        }
        // First stop strictly above x; x lies in [input[i-1], input[i]).
        let i = self.input.partition_point(|s| *s <= x);
        let (x0, x1) = (self.input[i - 1], self.input[i]);
        let (y0, y1) = (self.output[i - 1], self.output[i]);
        let t = (x - x0) / (x1 - x0);
        y0 + (y1 - y0) * t
    }

    /// Input stops.
    #[must_use]
    pub fn input(&self) -> &[f64] {
        &self.input
    }

    /// Output stops.
    #[must_use]
    pub fn output(&self) -> &[f64] {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_scales_and_negates() {
        assert_eq!(translate_for(0.5, 2000.0), -1000.0);
        assert_eq!(translate_for(0.0, 2000.0), 0.0);
        assert_eq!(translate_for(1.0, 2000.0), -2000.0);
    }

    #[test]
    fn translate_clamps_overshoot() {
        assert_eq!(translate_for(1.01, 2000.0), -2000.0);
        assert_eq!(translate_for(-0.01, 2000.0), 0.0);
    }

    #[test]
    fn translate_sanitizes_bad_inputs() {
        assert_eq!(translate_for(0.5, -10.0), 0.0);
        assert_eq!(translate_for(0.5, f64::NAN), 0.0);
        assert_eq!(translate_for(f64::NAN, 100.0), 0.0);
        assert_eq!(translate_for(f64::INFINITY, 100.0), -100.0);
    }

    #[test]
    fn translate_stays_in_range_for_arbitrary_inputs() {
        let progress = [-3.0, -0.01, 0.0, 0.2, 0.5, 0.99, 1.0, 1.01, 7.5];
        let bounds = [0.0, 1.0, 250.0, 2000.0, 1e9];
        for &p in &progress {
            for &m in &bounds {
                let t = translate_for(p, m);
                assert!(-m <= t && t <= 0.0, "translate {t} for p={p} m={m}");
            }
        }
    }

    #[test]
    fn offset_is_horizontal() {
        let v = translate_offset(0.25, 400.0);
        assert_eq!(v, Vec2::new(-100.0, 0.0));
    }

    #[test]
    fn reservation_adds_viewport() {
        assert_eq!(reservation_height(800.0, 2000.0), 2800.0);
        assert_eq!(reservation_height(800.0, -5.0), 800.0);
    }

    #[test]
    fn range_map_interpolates_and_clamps() {
        let scale = RangeMap::linear([0.0, 0.5], [1.0, 0.88]).unwrap();
        assert_eq!(scale.map(-1.0), 1.0);
        assert!((scale.map(0.25) - 0.94).abs() < 1e-12);
        assert_eq!(scale.map(0.5), 0.88);
        assert_eq!(scale.map(0.9), 0.88);
    }

    #[test]
    fn range_map_multiple_segments() {
        let fade = RangeMap::new(&[0.0, 0.25, 0.75, 1.0], &[0.0, 1.0, 1.0, 0.0]).unwrap();
        assert_eq!(fade.map(0.125), 0.5);
        assert_eq!(fade.map(0.5), 1.0);
        assert_eq!(fade.map(0.875), 0.5);
        assert_eq!(fade.map(f64::NAN), 0.0);
    }

    #[test]
    fn range_map_rejects_bad_stops() {
        assert_eq!(RangeMap::new(&[0.0], &[1.0]), Err(RangeError::TooFewStops));
        assert_eq!(
            RangeMap::new(&[0.0, 1.0], &[1.0]),
            Err(RangeError::LengthMismatch {
                input: 2,
                output: 1
            })
        );
        assert_eq!(
            RangeMap::new(&[0.5, 0.5], &[0.0, 1.0]),
            Err(RangeError::NotAscending)
        );
        assert_eq!(
            RangeMap::new(&[0.0, f64::NAN], &[0.0, 1.0]),
            Err(RangeError::NonFinite)
        );
    }
}
