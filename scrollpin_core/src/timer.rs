// Copyright 2026 the Scrollpin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deadline queue for debounce and deferred-measurement timers.
//!
//! The engine never calls a platform timer directly. It schedules deadlines
//! in a [`TimerQueue`] and the host (or a test with a fake clock) calls
//! [`TimerQueue::pop_expired`] whenever time advances. The earliest pending
//! deadline is exposed through [`TimerQueue::next_deadline`] so a host can
//! arm exactly one platform timer.
//!
//! Handles are generational: once a timer fires or is cancelled its slot may
//! be reused, and the stale [`TimerId`] no longer matches anything.

use alloc::vec::Vec;
use core::fmt;

use crate::time::HostTime;

/// What a timer is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// End of a resize debounce window.
    ResizeDebounce,
    /// Deferred re-measurement after mount.
    InitialRetry,
}

/// A handle to a scheduled timer.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId {
    idx: u32,
    generation: u32,
}

impl TimerId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimerId({}@gen{})", self.idx, self.generation)
    }
}

/// A timer that reached its deadline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Expired {
    /// Handle the timer was scheduled under.
    pub id: TimerId,
    /// What the timer was for.
    pub kind: TimerKind,
    /// The deadline it was scheduled for.
    pub deadline: HostTime,
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    deadline: HostTime,
    kind: TimerKind,
    seq: u64,
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// A small queue of one-shot deadlines.
#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    slots: Vec<Slot>,
    free: Vec<u32>,
    next_seq: u64,
    live: usize,
}

impl TimerQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a one-shot timer.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "a session holds a handful of timers; slot count never nears u32::MAX"
    )]
    pub fn schedule(&mut self, deadline: HostTime, kind: TimerKind) -> TimerId {
        let entry = Entry {
            deadline,
            kind,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.live += 1;
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.entry = Some(entry);
            TimerId {
                idx,
                generation: slot.generation,
            }
        } else {
            let idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                entry: Some(entry),
            });
            TimerId { idx, generation: 0 }
        }
    }

    /// Cancels a timer and returns its deadline, or `None` if it already
    /// fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> Option<HostTime> {
        if !self.is_pending(id) {
            return None;
        }
        let deadline = self.slots[id.idx as usize].entry.map(|e| e.deadline);
        self.release(id.idx);
        deadline
    }

    /// Returns `true` if `id` refers to a timer that has not fired yet.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.slots
            .get(id.idx as usize)
            .is_some_and(|s| s.generation == id.generation && s.entry.is_some())
    }

    /// Removes and returns the earliest timer whose deadline is `<= now`.
    ///
    /// Call repeatedly to drain all expired timers in deadline order; ties
    /// fire in the order they were scheduled.
    pub fn pop_expired(&mut self, now: HostTime) -> Option<Expired> {
        let (idx, entry) = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.entry.map(|e| (i, e)))
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.seq))?;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "slot indices are created from u32"
        )]
        let idx = idx as u32;
        let id = TimerId {
            idx,
            generation: self.slots[idx as usize].generation,
        };
        self.release(idx);
        Some(Expired {
            id,
            kind: entry.kind,
            deadline: entry.deadline,
        })
    }

    /// Earliest pending deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<HostTime> {
        self.slots
            .iter()
            .filter_map(|s| s.entry.map(|e| e.deadline))
            .min()
    }

    /// Cancels every pending timer and returns how many there were.
    pub fn clear(&mut self) -> usize {
        let cleared = self.live;
        for idx in 0..self.slots.len() {
            if self.slots[idx].entry.is_some() {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "slot indices are created from u32"
                )]
                self.release(idx as u32);
            }
        }
        cleared
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn release(&mut self, idx: u32) {
        let slot = &mut self.slots[idx as usize];
        slot.entry = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(idx);
        self.live -= 1;
    }
}
