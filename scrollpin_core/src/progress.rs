// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll position → normalized progress.
//!
//! A pinned region reserves a scroll range `[start, end]` in document
//! coordinates. [`raw_progress`] maps a scroll position into that range and
//! clamps the result to `[0, 1]`.
//!
//! The range itself comes from the region's geometry and a pair of
//! [`ScrollOffsets`], each saying which edge of the region has to meet which
//! edge of the viewport:
//!
//! ```text
//! scroll = region.top + region_edge × region.height − viewport_edge × viewport_height
//! ```
//!
//! [`ProgressTracker`] sits on top of the pure function and coalesces scroll
//! notifications: any number of positions may be reported between two
//! frames, but progress is recomputed at most once per frame.

/// A reserved scroll range in document coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollAnchors {
    /// Scroll position where progress is 0.
    pub start: f64,
    /// Scroll position where progress is 1.
    pub end: f64,
}

impl ScrollAnchors {
    /// Creates an anchor pair.
    #[inline]
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Length of the reserved range (may be zero or negative).
    #[inline]
    #[must_use]
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// Returns `true` if the range cannot produce progress (zero or negative
    /// span, or non-finite endpoints).
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.start.is_finite() && self.end.is_finite() && self.end > self.start)
    }
}

/// Converts a scroll position to progress in `[0, 1]`.
///
/// Degenerate anchors and non-finite positions produce `0`.
#[must_use]
pub fn raw_progress(position: f64, anchors: ScrollAnchors) -> f64 {
    if anchors.is_degenerate() || !position.is_finite() {
        return 0.0;
    }
    ((position - anchors.start) / anchors.span()).clamp(0.0, 1.0)
}

/// Which edge of a box an offset refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Top edge.
    Start,
    /// Vertical midpoint.
    Center,
    /// Bottom edge.
    End,
}

impl Edge {
    /// Position of the edge as a fraction of the box height.
    #[inline]
    #[must_use]
    pub const fn fraction(self) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Center => 0.5,
            Self::End => 1.0,
        }
    }
}

/// One intersection condition: `region` edge meets `viewport` edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Offset {
    /// Edge of the tracked region.
    pub region: Edge,
    /// Edge of the viewport.
    pub viewport: Edge,
}

impl Offset {
    /// Creates an offset.
    #[inline]
    #[must_use]
    pub const fn new(region: Edge, viewport: Edge) -> Self {
        Self { region, viewport }
    }

    /// Scroll position at which this intersection happens.
    #[inline]
    #[must_use]
    pub fn resolve(self, region: RegionGeometry, viewport_height: f64) -> f64 {
        region.top + self.region.fraction() * region.height
            - self.viewport.fraction() * viewport_height
    }
}

/// Start and end intersections that bound progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScrollOffsets {
    /// Intersection where progress is 0.
    pub start: Offset,
    /// Intersection where progress is 1.
    pub end: Offset,
}

impl ScrollOffsets {
    /// Pinned showcase: from region top at viewport top until region bottom
    /// reaches viewport bottom.
    pub const PINNED: Self = Self {
        start: Offset::new(Edge::Start, Edge::Start),
        end: Offset::new(Edge::End, Edge::End),
    };

    /// Exit parallax: from region top at viewport top until the region has
    /// scrolled completely out of the top of the viewport.
    pub const EXIT: Self = Self {
        start: Offset::new(Edge::Start, Edge::Start),
        end: Offset::new(Edge::End, Edge::Start),
    };

    /// Resolves the offsets against a region and viewport height.
    #[must_use]
    pub fn anchors(&self, region: RegionGeometry, viewport_height: f64) -> ScrollAnchors {
        ScrollAnchors::new(
            self.start.resolve(region, viewport_height),
            self.end.resolve(region, viewport_height),
        )
    }
}

/// Vertical placement of a region in document coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct RegionGeometry {
    /// Document y of the region's top edge.
    pub top: f64,
    /// Region height.
    pub height: f64,
}

impl RegionGeometry {
    /// Creates a region.
    #[inline]
    #[must_use]
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }
}

/// Coalescing progress tracker.
///
/// [`notify`](Self::notify) is cheap and only remembers the latest position;
/// [`resolve`](Self::resolve) runs once per frame and recomputes only if
/// something changed since the previous frame.
#[derive(Clone, Debug)]
pub struct ProgressTracker {
    anchors: ScrollAnchors,
    position: f64,
    progress: f64,
    dirty: bool,
    notifications: u64,
    recomputations: u64,
}

impl ProgressTracker {
    /// Creates a tracker at scroll position `position`.
    #[must_use]
    pub fn new(anchors: ScrollAnchors, position: f64) -> Self {
        Self {
            anchors,
            position,
            progress: raw_progress(position, anchors),
            dirty: false,
            notifications: 0,
            recomputations: 0,
        }
    }

    /// Records a scroll notification.
    pub fn notify(&mut self, position: f64) {
        self.notifications += 1;
        if position != self.position {
            self.position = position;
            self.dirty = true;
        }
    }

    /// Replaces the anchors.
    pub fn set_anchors(&mut self, anchors: ScrollAnchors) {
        if anchors != self.anchors {
            self.anchors = anchors;
            self.dirty = true;
        }
    }

    /// Returns the current anchors.
    #[must_use]
    pub fn anchors(&self) -> ScrollAnchors {
        self.anchors
    }

    /// Returns the last reported scroll position.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Returns `true` if a recomputation is pending.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Recomputes progress if needed and returns it.
    pub fn resolve(&mut self) -> f64 {
        if self.dirty {
            self.progress = raw_progress(self.position, self.anchors);
            self.recomputations += 1;
            self.dirty = false;
        }
        self.progress
    }

    /// Progress as of the last [`resolve`](Self::resolve).
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Number of scroll notifications received.
    #[must_use]
    pub fn notifications(&self) -> u64 {
        self.notifications
    }

    /// Number of times progress was actually recomputed.
    #[must_use]
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped() {
        let a = ScrollAnchors::new(0.0, 1000.0);
        assert_eq!(raw_progress(-50.0, a), 0.0);
        assert_eq!(raw_progress(0.0, a), 0.0);
        assert_eq!(raw_progress(500.0, a), 0.5);
        assert_eq!(raw_progress(1000.0, a), 1.0);
        assert_eq!(raw_progress(5000.0, a), 1.0);
    }

    #[test]
    fn progress_stays_in_unit_range_for_many_positions() {
        let a = ScrollAnchors::new(300.0, 1700.0);
        let mut p = -2000.0;
        while p < 4000.0 {
            let v = raw_progress(p, a);
            assert!((0.0..=1.0).contains(&v), "progress {v} at {p}");
            p += 37.5;
        }
    }

    #[test]
    fn degenerate_anchors_yield_zero() {
        assert_eq!(raw_progress(10.0, ScrollAnchors::new(100.0, 100.0)), 0.0);
        assert_eq!(raw_progress(10.0, ScrollAnchors::new(100.0, 50.0)), 0.0);
        assert_eq!(raw_progress(10.0, ScrollAnchors::new(f64::NAN, 50.0)), 0.0);
        assert!(ScrollAnchors::new(0.0, 0.0).is_degenerate());
        assert!(!ScrollAnchors::new(0.0, 1.0).is_degenerate());
    }

    #[test]
    fn non_finite_position_yields_zero() {
        let a = ScrollAnchors::new(0.0, 10.0);
        assert_eq!(raw_progress(f64::NAN, a), 0.0);
        assert_eq!(raw_progress(f64::INFINITY, a), 0.0);
    }

    #[test]
    fn pinned_offsets_span_the_extra_height() {
        // Region is one viewport tall plus 2000px of reserved scroll.
        let region = RegionGeometry::new(400.0, 800.0 + 2000.0);
        let anchors = ScrollOffsets::PINNED.anchors(region, 800.0);
        assert_eq!(anchors, ScrollAnchors::new(400.0, 2400.0));
    }

    #[test]
    fn exit_offsets_span_the_full_region() {
        let region = RegionGeometry::new(0.0, 900.0);
        let anchors = ScrollOffsets::EXIT.anchors(region, 800.0);
        assert_eq!(anchors, ScrollAnchors::new(0.0, 900.0));
    }

    #[test]
    fn center_edge_is_midpoint() {
        let offset = Offset::new(Edge::Center, Edge::Center);
        let region = RegionGeometry::new(1000.0, 200.0);
        assert_eq!(offset.resolve(region, 600.0), 1000.0 + 100.0 - 300.0);
    }

    #[test]
    fn tracker_coalesces_notifications() {
        let mut t = ProgressTracker::new(ScrollAnchors::new(0.0, 1000.0), 0.0);
        for y in [10.0, 50.0, 120.0, 250.0] {
            t.notify(y);
        }
        assert_eq!(t.resolve(), 0.25);
        assert_eq!(t.notifications(), 4);
        assert_eq!(t.recomputations(), 1, "four notifications, one recomputation");

        // Nothing new: no recomputation.
        assert_eq!(t.resolve(), 0.25);
        assert_eq!(t.recomputations(), 1);
    }

    #[test]
    fn tracker_recomputes_on_anchor_change() {
        let mut t = ProgressTracker::new(ScrollAnchors::new(0.0, 1000.0), 500.0);
        assert_eq!(t.progress(), 0.5);
        t.set_anchors(ScrollAnchors::new(0.0, 2000.0));
        assert!(t.is_dirty());
        assert_eq!(t.resolve(), 0.25);
    }
}
