// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spring/damper smoothing of the progress signal.
//!
//! [`MotionSmoother`] tracks a target in `[0, 1]` with second-order dynamics
//!
//! ```text
//! m·x'' = −k·(x − target) − c·x'        c = 2·ζ·√(k·m)
//! ```
//!
//! Each step advances the state with the closed-form solution of that
//! equation for the step length, so the result depends only on
//! `(position, velocity, target, Δt, parameters)` and stays stable for any
//! `Δt`. Only critically damped (`ζ = 1`) and over-damped (`ζ > 1`) springs
//! are accepted by [`SpringConfig::validate`].
//!
//! The smoother is an explicit two-state machine. While
//! [`Settling`](SpringPhase::Settling) it wants another frame; once both the
//! distance and the speed drop below the rest thresholds it snaps to the
//! target and moves to [`AtRest`](SpringPhase::AtRest), where ticks are free
//! and no further frame is requested.

use crate::config::SpringConfig;
use crate::time::{Duration, HostTime, Timebase};

/// Step used for the first frame after the spring leaves rest, when there is
/// no previous frame timestamp to difference against.
const NOMINAL_FRAME_SECS: f64 = 1.0 / 60.0;

/// Damping ratios closer to 1 than this use the critically damped solution.
const CRITICAL_EPSILON: f64 = 1e-9;

/// Integration state of a [`MotionSmoother`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpringPhase {
    /// Moving toward the target; needs another frame.
    Settling,
    /// Exactly at the target with zero velocity.
    AtRest,
}

/// Critically/over-damped spring filter over progress values.
#[derive(Clone, Debug)]
pub struct MotionSmoother {
    spring: SpringConfig,
    position: f64,
    velocity: f64,
    target: f64,
    phase: SpringPhase,
    last_tick: Option<HostTime>,
    tolerance: f64,
    steps: u64,
}

impl MotionSmoother {
    /// Creates a smoother resting at `initial`.
    ///
    /// `tolerance` is the overshoot band `ε`: the position never leaves
    /// `[−ε, 1 + ε]`.
    #[must_use]
    pub fn new(spring: SpringConfig, initial: f64, tolerance: f64) -> Self {
        let initial = clamp_unit(initial);
        Self {
            spring,
            position: initial,
            velocity: 0.0,
            target: initial,
            phase: SpringPhase::AtRest,
            last_tick: None,
            tolerance: tolerance.max(0.0),
            steps: 0,
        }
    }

    /// Switches spring parameters, keeping position and velocity.
    pub fn set_spring(&mut self, spring: SpringConfig) {
        self.spring = spring;
    }

    /// Returns the active spring parameters.
    #[must_use]
    pub fn spring(&self) -> SpringConfig {
        self.spring
    }

    /// Sets a new target (clamped to `[0, 1]`).
    ///
    /// Leaving rest resets the frame clock so the first step after a long
    /// idle period is one nominal frame rather than the whole idle time.
    pub fn set_target(&mut self, target: f64) {
        let target = clamp_unit(target);
        if target == self.target && self.phase == SpringPhase::AtRest {
            return;
        }
        self.target = target;
        if self.phase == SpringPhase::AtRest && target != self.position {
            self.phase = SpringPhase::Settling;
            self.last_tick = None;
        }
    }

    /// Jumps to `value` and comes to rest there.
    pub fn snap_to(&mut self, value: f64) {
        let value = clamp_unit(value);
        self.position = value;
        self.target = value;
        self.velocity = 0.0;
        self.phase = SpringPhase::AtRest;
        self.last_tick = None;
    }

    /// Advances to frame time `now` and returns the new position.
    ///
    /// The step is the time since the previous tick, clamped to `max_step`.
    /// Repeated ticks with the same timestamp do not integrate.
    pub fn tick(&mut self, now: HostTime, timebase: Timebase, max_step: Duration) -> f64 {
        if self.phase == SpringPhase::AtRest {
            self.last_tick = Some(now);
            return self.position;
        }
        let max_secs = max_step.as_secs_f64(timebase);
        let dt = match self.last_tick {
            Some(prev) => now
                .saturating_duration_since(prev)
                .min(max_step)
                .as_secs_f64(timebase),
            None => NOMINAL_FRAME_SECS.min(max_secs),
        };
        self.last_tick = Some(now);
        if dt > 0.0 {
            self.step(dt);
        }
        self.position
    }

    /// Integrates the spring over `dt` seconds and returns the new position.
    ///
    /// Non-finite or non-positive steps are ignored.
    pub fn step(&mut self, dt: f64) -> f64 {
        if self.phase == SpringPhase::AtRest || !(dt.is_finite() && dt > 0.0) {
            return self.position;
        }
        let (offset, velocity) = self.integrate(self.position - self.target, self.velocity, dt);
        self.position = self.target + offset;
        self.velocity = velocity;
        self.steps += 1;

        let (lo, hi) = (-self.tolerance, 1.0 + self.tolerance);
        if self.position < lo {
            self.position = lo;
            self.velocity = self.velocity.max(0.0);
        } else if self.position > hi {
            self.position = hi;
            self.velocity = self.velocity.min(0.0);
        }

        if (self.target - self.position).abs() < self.spring.rest_delta
            && self.velocity.abs() < self.spring.rest_velocity
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.phase = SpringPhase::AtRest;
        }
        self.position
    }

    /// Closed-form evolution of displacement `e0` and velocity `v0`.
    fn integrate(&self, e0: f64, v0: f64, dt: f64) -> (f64, f64) {
        let omega = self.spring.natural_frequency();
        let zeta = self.spring.damping_ratio;

        if (zeta - 1.0).abs() < CRITICAL_EPSILON {
            // e(t) = (e0 + (v0 + ω·e0)·t)·e^(−ωt)
            let b = v0 + omega * e0;
            let decay = libm::exp(-omega * dt);
            let e = (e0 + b * dt) * decay;
            let v = (v0 - omega * b * dt) * decay;
            (e, v)
        } else {
            // e(t) = c1·e^(r1·t) + c2·e^(r2·t), both roots real and negative.
            let s = libm::sqrt(zeta * zeta - 1.0);
            let r1 = -omega * (zeta - s);
            let r2 = -omega * (zeta + s);
            let c1 = (v0 - r2 * e0) / (r1 - r2);
            let c2 = e0 - c1;
            let d1 = libm::exp(r1 * dt);
            let d2 = libm::exp(r2 * dt);
            (c1 * d1 + c2 * d2, r1 * c1 * d1 + r2 * c2 * d2)
        }
    }

    /// Current filtered value.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current velocity (progress units per second).
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Current target.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> SpringPhase {
        self.phase
    }

    /// Returns `true` when resting exactly on the target.
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.phase == SpringPhase::AtRest
    }

    /// Number of integration steps taken so far.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}
