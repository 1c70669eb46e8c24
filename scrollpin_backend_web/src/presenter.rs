// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM style writes.
//!
//! [`DomPresenter`] applies a [`FrameOutput`] to two elements: the track gets
//! a `translate3d` transform and the wrapper gets the reserved height. An
//! optional [`RangeMap`] drives the track's opacity from the same smoothed
//! progress. In static mode every property is removed, so the page falls
//! back to normal document flow. Styles are only written when the value
//! changes.

use alloc::format;
use alloc::string::String;

use kurbo::Vec2;
use scrollpin_core::backend::FrameSink;
use scrollpin_core::mapper::{RangeMap, translate_offset};
use scrollpin_core::session::FrameOutput;
use web_sys::HtmlElement;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Applied {
    Pinned {
        offset: Vec2,
        height: f64,
        opacity: Option<f64>,
    },
    Static,
}

impl Applied {
    fn for_output(output: &FrameOutput, opacity: Option<&RangeMap>) -> Self {
        if output.translate.is_none() {
            return Self::Static;
        }
        Self::Pinned {
            offset: translate_offset(output.smoothed_progress, output.max_translate),
            height: output.reservation_height,
            opacity: opacity.map(|map| map.map(output.smoothed_progress)),
        }
    }
}

/// Presents frames by writing inline styles.
pub struct DomPresenter {
    track: HtmlElement,
    wrapper: HtmlElement,
    opacity: Option<RangeMap>,
    applied: Option<Applied>,
}

impl core::fmt::Debug for DomPresenter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomPresenter")
            .field("track", &"HtmlElement")
            .field("wrapper", &"HtmlElement")
            .field("opacity", &self.opacity)
            .field("applied", &self.applied)
            .finish()
    }
}

impl DomPresenter {
    /// Creates a presenter for a track inside a wrapper.
    #[must_use]
    pub fn new(track: HtmlElement, wrapper: HtmlElement) -> Self {
        Self {
            track,
            wrapper,
            opacity: None,
            applied: None,
        }
    }

    /// Builder: fades the track through `map`, evaluated at smoothed
    /// progress, while pinned.
    #[must_use]
    pub fn with_track_opacity(mut self, map: RangeMap) -> Self {
        self.opacity = Some(map);
        self
    }

    /// Returns the track element.
    #[must_use]
    pub fn track(&self) -> &HtmlElement {
        &self.track
    }

    /// Returns the wrapper element.
    #[must_use]
    pub fn wrapper(&self) -> &HtmlElement {
        &self.wrapper
    }

    fn clear(&self) {
        let _ = self.track.style().remove_property("transform");
        let _ = self.track.style().remove_property("will-change");
        let _ = self.track.style().remove_property("opacity");
        let _ = self.wrapper.style().remove_property("height");
    }
}

impl FrameSink for DomPresenter {
    fn present(&mut self, output: &FrameOutput) {
        let next = Applied::for_output(output, self.opacity.as_ref());
        if self.applied == Some(next) {
            return;
        }

        match (self.applied, next) {
            (_, Applied::Static) => self.clear(),
            (
                prev,
                Applied::Pinned {
                    offset,
                    height,
                    opacity,
                },
            ) => {
                let s = self.track.style();
                if !matches!(prev, Some(Applied::Pinned { .. })) {
                    let _ = s.set_property("will-change", "transform");
                }
                if !matches!(prev, Some(Applied::Pinned { offset: o, .. }) if o == offset) {
                    let _ = s.set_property("transform", &translate_css(offset));
                }
                if let Some(value) = opacity
                    && !matches!(prev, Some(Applied::Pinned { opacity: Some(o), .. }) if o == value)
                {
                    let _ = s.set_property("opacity", &format!("{value}"));
                }
                if !matches!(prev, Some(Applied::Pinned { height: h, .. }) if h == height) {
                    let _ = self
                        .wrapper
                        .style()
                        .set_property("height", &format!("{height}px"));
                }
            }
        }
        self.applied = Some(next);
    }
}

impl Drop for DomPresenter {
    fn drop(&mut self) {
        if matches!(self.applied, Some(Applied::Pinned { .. })) {
            self.clear();
        }
    }
}

/// CSS transform for a track offset.
pub(crate) fn translate_css(offset: Vec2) -> String {
    // `-0` would print as "-0px"; normalise it.
    let norm = |v: f64| if v == 0.0 { 0.0 } else { v };
    format!("translate3d({}px, {}px, 0px)", norm(offset.x), norm(offset.y))
}
