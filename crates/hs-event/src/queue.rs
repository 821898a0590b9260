//! `EventQueue` — instant-ordered pending actions.
//!
//! # Ordering
//!
//! Events are keyed by `(instant, seq)` where `seq` is a per-queue
//! submission counter.  Popping the smallest key therefore yields events in
//! non-decreasing instant order and FIFO among equal instants, which keeps
//! replays deterministic.
//!
//! `BTreeMap` gives O(log n) push and pop.

use std::collections::BTreeMap;
use std::fmt;

use hs_core::Instant;

use crate::Event;

/// A min-ordered queue of `(Instant, action)` pairs.
pub struct EventQueue<A> {
    inner:    BTreeMap<(Instant, u64), A>,
    next_seq: u64,
}

impl<A> Default for EventQueue<A> {
    fn default() -> Self {
        Self { inner: BTreeMap::new(), next_seq: 0 }
    }
}

impl<A> EventQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `action` to fire at `at`.  Returns its submission sequence
    /// number.
    pub fn push(&mut self, at: Instant, action: A) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.inner.insert((at, seq), action);
        seq
    }

    /// Remove and return the earliest event if its instant is `<= now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<Event<A>> {
        let entry = self.inner.first_entry()?;
        if entry.key().0 > now {
            return None;
        }
        let ((at, seq), action) = entry.remove_entry();
        Some(Event { at, seq, action })
    }

    /// Pop and execute every event due at or before `now`, in order.
    ///
    /// `execute` receives the queue itself so an action may enqueue
    /// follow-up events; those fire in this same pass if they are due.
    /// Returns the number of events executed.
    ///
    /// # Errors
    /// Stops at the first failing action and returns its error.  That event
    /// has already been consumed; later events stay queued.
    pub fn drain_up_to<E, F>(&mut self, now: Instant, mut execute: F) -> Result<usize, E>
    where
        F: FnMut(&mut Self, Event<A>) -> Result<(), E>,
    {
        let mut fired = 0;
        while let Some(event) = self.pop_due(now) {
            tracing::trace!(at = %event.at, seq = event.seq, "firing event");
            execute(self, event)?;
            fired += 1;
        }
        Ok(fired)
    }

    /// Instant of the earliest pending event, or `None` if empty.
    pub fn next_instant(&self) -> Option<Instant> {
        self.inner.keys().next().map(|&(at, _)| at)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Pending events in firing order.
    pub fn iter(&self) -> impl Iterator<Item = (Instant, &A)> + '_ {
        self.inner.iter().map(|(&(at, _), a)| (at, a))
    }
}

impl<A> fmt::Debug for EventQueue<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventQueue")
            .field("len", &self.inner.len())
            .field("next", &self.next_instant())
            .finish()
    }
}
