// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic fake host, scenario runner and motion metrics.
//!
//! - [`host::FakeHost`] drives a [`Mount`](scrollpin_core::mount::Mount) from
//!   a manual clock: scripted scroll/resize/preference signals, a fake layout
//!   probe and a spy presenter. Timers fire exactly at their deadlines and
//!   frames run only when the session asks for them.
//! - [`scenario::Scenario`] is a list of host steps that can be replayed
//!   against a fresh host.
//! - [`metrics::MotionTracker`] grades smoothed progress: overshoot, band
//!   excursion and frames to settle.

#![no_std]

extern crate alloc;

pub mod host;
pub mod metrics;
pub mod scenario;
