// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout reads against the live DOM.

use kurbo::Size;
use scrollpin_core::measure::LayoutProbe;
use scrollpin_core::progress::RegionGeometry;
use web_sys::{Element, Window};

/// Reads the track's scroll width and the window's inner size.
pub struct DomProbe {
    track: Element,
    window: Window,
}

impl core::fmt::Debug for DomProbe {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomProbe")
            .field("track", &"Element")
            .finish_non_exhaustive()
    }
}

impl DomProbe {
    /// Creates a probe for `track`.
    #[must_use]
    pub fn new(track: Element, window: Window) -> Self {
        Self { track, window }
    }
}

impl LayoutProbe for DomProbe {
    fn track_width(&self) -> Option<f64> {
        if !self.track.is_connected() {
            return None;
        }
        // Zero means the track has not been laid out yet.
        let width = self.track.scroll_width();
        (width > 0).then(|| f64::from(width))
    }

    fn viewport(&self) -> Option<Size> {
        viewport_size(&self.window)
    }
}

/// The window's inner size in CSS pixels.
pub(crate) fn viewport_size(window: &Window) -> Option<Size> {
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some(Size::new(width, height))
}

/// Document-space top of `wrapper`, paired with the given `height`.
pub(crate) fn region_at(wrapper: &Element, scroll_y: f64, height: f64) -> RegionGeometry {
    let rect = wrapper.get_bounding_client_rect();
    RegionGeometry::new(rect.top() + scroll_y, height)
}
