// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for host integrations.
//!
//! Scrollpin splits host-specific work into *backend* crates. Each backend
//! provides the following pieces:
//!
//! - **Time**: `now() -> HostTime` and `timebase() -> Timebase` free
//!   functions that read the host's monotonic clock.
//!
//! - **Frame requests**: A single-shot "call me on the next paint" primitive
//!   (e.g. `requestAnimationFrame`) plus cancellation. The engine decides
//!   *whether* it wants a frame through
//!   [`ScrollSession::wake`](crate::session::ScrollSession::wake); the
//!   backend only delivers it.
//!
//! - **Timers**: A one-shot deadline primitive (e.g. `setTimeout`) armed for
//!   [`Wake::deadline`](crate::session::Wake::deadline).
//!
//! - **Signals**: Scroll, resize and reduced-motion listeners forwarded into
//!   [`HostSignals`](crate::mount::HostSignals).
//!
//! - **Layout**: A [`LayoutProbe`](crate::measure::LayoutProbe) reading the
//!   laid-out track and viewport.
//!
//! - **Presenter**: Implements [`FrameSink`] to write the frame's offset and
//!   reserved height to host-native nodes (e.g. DOM styles).
//!
//! # Crate boundaries
//!
//! `scrollpin_core` owns the state machines, the math and this contract
//! module. Backend crates depend on `scrollpin_core` and provide host glue.
//! Application code depends on both and wires them together through a
//! [`Mount`](crate::mount::Mount).

use crate::session::FrameOutput;

/// Applies a computed frame to the host's presentation tree.
///
/// DOM presenters and test spies both implement this trait.
///
/// # Frame loop pseudocode
///
/// ```rust,ignore
/// fn on_animation_frame(now: HostTime) {
///     if let Some(output) = session.frame(now, &probe) {
///         sink.present(&output);
///     }
///     let wake = session.wake();
///     if wake.frame { request_frame(); }
///     if let Some(deadline) = wake.deadline { arm_timer(deadline); }
/// }
/// ```
pub trait FrameSink {
    /// Presents one frame.
    fn present(&mut self, output: &FrameOutput);
}
