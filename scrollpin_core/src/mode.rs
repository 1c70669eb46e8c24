// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinned vs static layout selection.
//!
//! The decision is a pure function of the viewport width, the user's motion
//! preference and whether the region's scroll range is usable:
//!
//! | condition                         | mode     | profile        |
//! |-----------------------------------|----------|----------------|
//! | range degenerate                  | Static   | preferred      |
//! | viewport narrower than breakpoint | Static   | preferred      |
//! | reduced motion, `DirectSmoothing` | Pinned   | Direct         |
//! | reduced motion, `StaticLayout`    | Static   | Direct         |
//! | otherwise                         | Pinned   | preferred      |

use crate::config::{ReducedMotionPolicy, SmoothingProfile};

/// Layout mode of a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Sticky viewport with a horizontally translating track.
    #[default]
    Pinned,
    /// Plain vertical layout; no translation is produced.
    Static,
}

/// Why a [`ModeDecision`] came out the way it did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModeReason {
    /// Wide viewport, no motion preference.
    Wide,
    /// Viewport narrower than the compact breakpoint.
    Compact,
    /// The user prefers reduced motion.
    ReducedMotion,
    /// The region's scroll range is empty.
    DegenerateRange,
}

/// Inputs to [`ModeSelector::select`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeInputs {
    /// Current viewport width in px.
    pub viewport_width: f64,
    /// Whether the user prefers reduced motion.
    pub reduced_motion: bool,
    /// Whether the scroll anchors are degenerate.
    pub degenerate_range: bool,
}

/// Outcome of mode selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ModeDecision {
    /// Layout mode.
    pub mode: Mode,
    /// Smoothing profile for the motion smoother.
    pub profile: SmoothingProfile,
    /// Deciding condition.
    pub reason: ModeReason,
}

/// Chooses the layout mode and smoothing profile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeSelector {
    /// Viewports narrower than this are compact.
    pub breakpoint: f64,
    /// Reduced-motion handling.
    pub policy: ReducedMotionPolicy,
    /// Profile used without a reduced-motion preference.
    pub preferred: SmoothingProfile,
}

impl ModeSelector {
    /// Creates a selector.
    #[must_use]
    pub const fn new(
        breakpoint: f64,
        policy: ReducedMotionPolicy,
        preferred: SmoothingProfile,
    ) -> Self {
        Self {
            breakpoint,
            policy,
            preferred,
        }
    }

    /// Decides mode and profile for `inputs`.
    #[must_use]
    pub fn select(&self, inputs: ModeInputs) -> ModeDecision {
        let profile = if inputs.reduced_motion {
            SmoothingProfile::Direct
        } else {
            self.preferred
        };
        let (mode, reason) = if inputs.degenerate_range {
            (Mode::Static, ModeReason::DegenerateRange)
        } else if inputs.viewport_width.is_nan() || inputs.viewport_width < self.breakpoint {
            (Mode::Static, ModeReason::Compact)
        } else if inputs.reduced_motion {
            let mode = match self.policy {
                ReducedMotionPolicy::DirectSmoothing => Mode::Pinned,
                ReducedMotionPolicy::StaticLayout => Mode::Static,
            };
            (mode, ModeReason::ReducedMotion)
        } else {
            (Mode::Pinned, ModeReason::Wide)
        };
        ModeDecision {
            mode,
            profile,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> ModeSelector {
        ModeSelector::new(
            768.0,
            ReducedMotionPolicy::DirectSmoothing,
            SmoothingProfile::Smooth,
        )
    }

    fn inputs(width: f64, reduced: bool) -> ModeInputs {
        ModeInputs {
            viewport_width: width,
            reduced_motion: reduced,
            degenerate_range: false,
        }
    }

    #[test]
    fn wide_viewport_pins_with_smooth_profile() {
        let d = selector().select(inputs(1024.0, false));
        assert_eq!(d.mode, Mode::Pinned);
        assert_eq!(d.profile, SmoothingProfile::Smooth);
        assert_eq!(d.reason, ModeReason::Wide);
    }

    #[test]
    fn breakpoint_is_exclusive() {
        assert_eq!(selector().select(inputs(768.0, false)).mode, Mode::Pinned);
        assert_eq!(selector().select(inputs(767.9, false)).mode, Mode::Static);
        assert_eq!(selector().select(inputs(f64::NAN, false)).mode, Mode::Static);
    }

    #[test]
    fn compact_wins_over_reduced_motion() {
        let d = selector().select(inputs(500.0, true));
        assert_eq!(d.mode, Mode::Static);
        assert_eq!(d.reason, ModeReason::Compact);
    }

    #[test]
    fn reduced_motion_keeps_pinning_by_default() {
        let d = selector().select(inputs(1280.0, true));
        assert_eq!(d.mode, Mode::Pinned);
        assert_eq!(d.profile, SmoothingProfile::Direct);
        assert_eq!(d.reason, ModeReason::ReducedMotion);
    }

    #[test]
    fn static_policy_unpins_under_reduced_motion() {
        let mut s = selector();
        s.policy = ReducedMotionPolicy::StaticLayout;
        let d = s.select(inputs(1280.0, true));
        assert_eq!(d.mode, Mode::Static);
        assert_eq!(d.profile, SmoothingProfile::Direct);
    }

    #[test]
    fn degenerate_range_is_static() {
        let d = selector().select(ModeInputs {
            viewport_width: 1280.0,
            reduced_motion: false,
            degenerate_range: true,
        });
        assert_eq!(d.mode, Mode::Static);
        assert_eq!(d.reason, ModeReason::DegenerateRange);
    }

    #[test]
    fn scenario_breakpoints() {
        // 800 px against the default breakpoint still pins.
        assert_eq!(selector().select(inputs(800.0, false)).mode, Mode::Pinned);
        // The same viewport against a 1024 px breakpoint does not.
        let mut s = selector();
        s.breakpoint = 1024.0;
        assert_eq!(s.select(inputs(800.0, false)).mode, Mode::Static);
    }
}
