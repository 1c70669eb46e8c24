// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.
//!
//! [`EngineConfig`] is the whole recognized option surface: smoothing profile
//! selection, spring parameters for both profiles, the compact-mode
//! breakpoint, the resize debounce window, the deferred initial measurement,
//! the placeholder bound and the reduced-motion policy. Presets are `const`
//! so hosts can start from [`EngineConfig::web`] and override single fields.
//!
//! Configurations are checked once, when a
//! [`ScrollSession`](crate::session::ScrollSession) is created, via
//! [`EngineConfig::validate`].

use core::fmt;

use crate::progress::ScrollOffsets;
use crate::time::{Duration, Timebase};

/// Parameters of a spring/damper filter.
///
/// Only critically damped (`damping_ratio == 1`) and over-damped
/// (`damping_ratio > 1`) springs are accepted; an under-damped spring would
/// oscillate around the target and break the bounded-overshoot guarantee.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    /// Spring constant `k`.
    pub stiffness: f64,
    /// Damping ratio `ζ = c / (2·√(k·m))`. Must be `>= 1`.
    pub damping_ratio: f64,
    /// Mass `m`.
    pub mass: f64,
    /// Distance to target below which the spring may come to rest.
    pub rest_delta: f64,
    /// Speed below which the spring may come to rest.
    pub rest_velocity: f64,
}

impl SpringConfig {
    /// Default profile: soft and slightly lagging behind the scroll input.
    ///
    /// Equivalent to stiffness 150, damping coefficient 25, mass 0.5.
    pub const SMOOTH: Self = Self {
        stiffness: 150.0,
        damping_ratio: 1.443_375_672_974_064_4,
        mass: 0.5,
        rest_delta: 0.0001,
        rest_velocity: 0.01,
    };

    /// Near-instant profile used under reduced motion.
    ///
    /// Critically damped with a natural frequency of ~447 rad/s, so a step
    /// input settles within two 60 Hz frames.
    pub const DIRECT: Self = Self {
        stiffness: 100_000.0,
        damping_ratio: 1.0,
        mass: 0.5,
        rest_delta: 0.0001,
        rest_velocity: 0.01,
    };

    /// Builds a config from a raw damping coefficient `c` instead of a ratio.
    #[must_use]
    pub fn from_coefficients(stiffness: f64, damping: f64, mass: f64) -> Self {
        let critical = 2.0 * libm::sqrt(stiffness * mass);
        Self {
            stiffness,
            damping_ratio: if critical > 0.0 { damping / critical } else { 0.0 },
            mass,
            ..Self::SMOOTH
        }
    }

    /// Natural (undamped) angular frequency `ω₀ = √(k/m)`.
    #[must_use]
    pub fn natural_frequency(&self) -> f64 {
        libm::sqrt(self.stiffness / self.mass)
    }

    /// Checks the parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first offending parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.stiffness.is_finite() && self.stiffness > 0.0) {
            return Err(ConfigError::Stiffness(self.stiffness));
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(ConfigError::Mass(self.mass));
        }
        if !(self.damping_ratio.is_finite() && self.damping_ratio >= 1.0) {
            return Err(ConfigError::Underdamped(self.damping_ratio));
        }
        if !(self.rest_delta.is_finite() && self.rest_delta >= 0.0) {
            return Err(ConfigError::RestThreshold(self.rest_delta));
        }
        if !(self.rest_velocity.is_finite() && self.rest_velocity >= 0.0) {
            return Err(ConfigError::RestThreshold(self.rest_velocity));
        }
        Ok(())
    }
}

/// Which spring drives the smoothed progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SmoothingProfile {
    /// Soft, lagging motion ([`EngineConfig::smooth`]).
    #[default]
    Smooth,
    /// Near-instant motion ([`EngineConfig::direct`]).
    Direct,
}

/// What a reduced-motion preference does to the pinned region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ReducedMotionPolicy {
    /// Keep the pinned geometry and switch to the direct spring.
    #[default]
    DirectSmoothing,
    /// Drop pinning entirely and render the static layout.
    StaticLayout,
}

/// Reasons a configuration is rejected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    /// Stiffness is not a positive finite number.
    Stiffness(f64),
    /// Mass is not a positive finite number.
    Mass(f64),
    /// Damping ratio is below 1 (or not finite).
    Underdamped(f64),
    /// A rest threshold is negative or not finite.
    RestThreshold(f64),
    /// The compact breakpoint is negative or not finite.
    Breakpoint(f64),
    /// The placeholder bound is negative or not finite.
    Placeholder(f64),
    /// The overshoot tolerance is negative or not finite.
    OvershootTolerance(f64),
    /// The maximum integration step is zero.
    ZeroStep,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stiffness(v) => write!(f, "spring stiffness must be positive, got {v}"),
            Self::Mass(v) => write!(f, "spring mass must be positive, got {v}"),
            Self::Underdamped(v) => {
                write!(f, "spring damping ratio must be at least 1, got {v}")
            }
            Self::RestThreshold(v) => write!(f, "rest threshold must be non-negative, got {v}"),
            Self::Breakpoint(v) => write!(f, "compact breakpoint must be non-negative, got {v}"),
            Self::Placeholder(v) => write!(f, "placeholder bound must be non-negative, got {v}"),
            Self::OvershootTolerance(v) => {
                write!(f, "overshoot tolerance must be non-negative, got {v}")
            }
            Self::ZeroStep => f.write_str("maximum integration step must be non-zero"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Full engine configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Profile used when the user has not asked for reduced motion.
    pub preferred_profile: SmoothingProfile,
    /// Spring for [`SmoothingProfile::Smooth`].
    pub smooth: SpringConfig,
    /// Spring for [`SmoothingProfile::Direct`].
    pub direct: SpringConfig,
    /// Viewports narrower than this (px) use the static layout.
    pub compact_breakpoint: f64,
    /// Resize bursts closer together than this produce one measurement.
    pub resize_debounce: Duration,
    /// Delay of the one deferred re-measurement after mount.
    pub initial_measure_delay: Duration,
    /// Bound (px) used before the first real measurement; also the floor of
    /// the reserved scroll distance.
    pub placeholder_bound: f64,
    /// Largest integration step; longer frame gaps are clamped to this.
    pub max_step: Duration,
    /// Allowed excursion `ε` of smoothed progress outside `[0, 1]`.
    pub overshoot_tolerance: f64,
    /// How region geometry maps to scroll anchors.
    pub offsets: ScrollOffsets,
    /// Reduced-motion handling.
    pub reduced_motion_policy: ReducedMotionPolicy,
    /// Tick-to-nanosecond conversion of the host clock.
    pub timebase: Timebase,
}

impl EngineConfig {
    /// Default configuration for a host whose clock ticks in `timebase`.
    #[must_use]
    pub const fn new(timebase: Timebase) -> Self {
        Self {
            preferred_profile: SmoothingProfile::Smooth,
            smooth: SpringConfig::SMOOTH,
            direct: SpringConfig::DIRECT,
            compact_breakpoint: 768.0,
            resize_debounce: Duration::from_millis(150, timebase),
            initial_measure_delay: Duration::from_millis(100, timebase),
            placeholder_bound: 1200.0,
            max_step: Duration::from_millis(64, timebase),
            overshoot_tolerance: 0.01,
            offsets: ScrollOffsets::PINNED,
            reduced_motion_policy: ReducedMotionPolicy::DirectSmoothing,
            timebase,
        }
    }

    /// Default configuration for the web backend (microsecond ticks).
    #[must_use]
    pub const fn web() -> Self {
        Self::new(Timebase::MICROS)
    }

    /// Sets the compact-mode breakpoint.
    #[must_use]
    pub const fn with_breakpoint(mut self, px: f64) -> Self {
        self.compact_breakpoint = px;
        self
    }

    /// Sets the placeholder bound.
    #[must_use]
    pub const fn with_placeholder_bound(mut self, px: f64) -> Self {
        self.placeholder_bound = px;
        self
    }

    /// Sets the resize debounce window in milliseconds.
    #[must_use]
    pub const fn with_resize_debounce_ms(mut self, millis: u64) -> Self {
        self.resize_debounce = Duration::from_millis(millis, self.timebase);
        self
    }

    /// Sets the preferred smoothing profile.
    #[must_use]
    pub const fn with_profile(mut self, profile: SmoothingProfile) -> Self {
        self.preferred_profile = profile;
        self
    }

    /// Sets the reduced-motion policy.
    #[must_use]
    pub const fn with_reduced_motion_policy(mut self, policy: ReducedMotionPolicy) -> Self {
        self.reduced_motion_policy = policy;
        self
    }

    /// Sets the scroll offsets.
    #[must_use]
    pub const fn with_offsets(mut self, offsets: ScrollOffsets) -> Self {
        self.offsets = offsets;
        self
    }

    /// Returns the spring parameters for `profile`.
    #[must_use]
    pub const fn spring(&self, profile: SmoothingProfile) -> SpringConfig {
        match profile {
            SmoothingProfile::Smooth => self.smooth,
            SmoothingProfile::Direct => self.direct,
        }
    }

    /// Checks every field.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.smooth.validate()?;
        self.direct.validate()?;
        if !(self.compact_breakpoint.is_finite() && self.compact_breakpoint >= 0.0) {
            return Err(ConfigError::Breakpoint(self.compact_breakpoint));
        }
        if !(self.placeholder_bound.is_finite() && self.placeholder_bound >= 0.0) {
            return Err(ConfigError::Placeholder(self.placeholder_bound));
        }
        if !(self.overshoot_tolerance.is_finite() && self.overshoot_tolerance >= 0.0) {
            return Err(ConfigError::OvershootTolerance(self.overshoot_tolerance));
        }
        if self.max_step == Duration::ZERO {
            return Err(ConfigError::ZeroStep);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        assert_eq!(EngineConfig::web().validate(), Ok(()));
        assert_eq!(EngineConfig::new(Timebase::NANOS).validate(), Ok(()));
    }

    #[test]
    fn smooth_preset_matches_raw_coefficients() {
        let derived = SpringConfig::from_coefficients(150.0, 25.0, 0.5);
        assert!(
            (derived.damping_ratio - SpringConfig::SMOOTH.damping_ratio).abs() < 1e-12,
            "damping 25 on k=150, m=0.5 is ζ≈1.443"
        );
    }

    #[test]
    fn underdamped_spring_is_rejected() {
        let spring = SpringConfig::from_coefficients(150.0, 10.0, 0.5);
        assert!(matches!(spring.validate(), Err(ConfigError::Underdamped(_))));
    }

    #[test]
    fn bad_fields_are_rejected() {
        let mut cfg = EngineConfig::web();
        cfg.smooth.mass = 0.0;
        assert_eq!(cfg.validate(), Err(ConfigError::Mass(0.0)));

        let cfg = EngineConfig::web().with_breakpoint(f64::NAN);
        assert!(matches!(cfg.validate(), Err(ConfigError::Breakpoint(_))));

        let cfg = EngineConfig::web().with_placeholder_bound(-1.0);
        assert_eq!(cfg.validate(), Err(ConfigError::Placeholder(-1.0)));

        let mut cfg = EngineConfig::web();
        cfg.max_step = Duration::ZERO;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroStep));
    }

    #[test]
    fn web_durations_are_microseconds() {
        let cfg = EngineConfig::web();
        assert_eq!(cfg.resize_debounce, Duration(150_000));
        assert_eq!(cfg.initial_measure_delay, Duration(100_000));
        assert_eq!(cfg.with_resize_debounce_ms(40).resize_debounce, Duration(40_000));
    }

    #[test]
    fn spring_lookup_follows_profile() {
        let cfg = EngineConfig::web();
        assert_eq!(cfg.spring(SmoothingProfile::Smooth), SpringConfig::SMOOTH);
        assert_eq!(cfg.spring(SmoothingProfile::Direct), SpringConfig::DIRECT);
    }
}
