// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinned, scroll-driven progressive transforms.
//!
//! `scrollpin_core` turns vertical scrolling across a pinned region into a
//! horizontal translation of a content track. It is `no_std` compatible
//! (with `alloc`), owns no global state and never touches a real clock or
//! timer: hosts feed it events and timestamps, and it tells them what to
//! schedule next.
//!
//! # Architecture
//!
//! ```text
//!   HostSignals (scroll, resize, reduced motion)
//!       │
//!       ▼
//!   ScrollSession ──► wake() ──► host schedules rAF / timeout
//!       │
//!       ▼ frame(now, probe)
//!   TimerQueue ──► DimensionMeasurer ──► ScrollOffsets/anchors
//!                                              │
//!                 ┌────────────────────────────┘
//!                 ▼
//!   ProgressTracker ──► MotionSmoother ──► translate_for() ──► FrameOutput
//!                                                                  │
//!                                                                  ▼
//!                                                        FrameSink::present()
//! ```
//!
//! **[`progress`]**: Scroll position to clamped progress, anchor derivation
//! from region geometry and offsets, and per-frame coalescing.
//!
//! **[`spring`]**: Critically/over-damped spring filter with an explicit
//! settling/at-rest state machine.
//!
//! **[`measure`]**: Debounced, deferred measurement of the track bound
//! against a [`LayoutProbe`](measure::LayoutProbe).
//!
//! **[`mapper`]**: Progress to offsets, reserved height and general
//! clamped ranges.
//!
//! **[`mode`]**: Pinned vs static selection from viewport width, motion
//! preference and range validity.
//!
//! **[`timer`]**: Deadline queue with generational handles.
//!
//! **[`session`]**: The per-region state machine tying it all together.
//!
//! **[`events`]** and **[`mount`]**: Owned subscriptions to host signals
//! and the attach/teardown lifecycle.
//!
//! **[`backend`]**: The [`FrameSink`](backend::FrameSink) trait that host
//! presenters implement.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! session instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod config;
pub mod events;
pub mod mapper;
pub mod measure;
pub mod mode;
pub mod mount;
pub mod progress;
pub mod session;
pub mod spring;
pub mod time;
pub mod timer;
pub mod trace;
