//! Simulation observer trait for progress reporting and data collection.

use hs_core::{Instant, TaskId};
use hs_ops::TaskStatus;

/// Callbacks invoked while [`Sim`][crate::Sim] fires events.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: completion counter
///
/// ```rust
/// use hs_core::{Instant, TaskId};
/// use hs_ops::TaskStatus;
/// use hs_sim::SimObserver;
///
/// #[derive(Default)]
/// struct Completed(usize);
///
/// impl SimObserver for Completed {
///     fn on_task_transition(&mut self, _: TaskId, _: TaskStatus, to: TaskStatus, _: Instant) {
///         if to == TaskStatus::NeedsResult {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// `task` moved from `from` to `to` at `at`.
    ///
    /// Changes made during an advance (by events, hooks, or callbacks) are
    /// reported right after the action that made them.  Changes made between
    /// advances (through `Sim::schedule` and friends, or `Sim::ops_mut`) are
    /// reported at the start of the next advance; the clock has not moved
    /// since, so `at` is still the instant they happened.
    fn on_task_transition(
        &mut self,
        _task: TaskId,
        _from: TaskStatus,
        _to:   TaskStatus,
        _at:   Instant,
    ) {}

    /// A start or stop event for `task` fired after the task had left the
    /// state it was queued for, and was skipped.
    fn on_stale_event(&mut self, _task: TaskId, _at: Instant) {}

    /// Called once at the end of every advance, with the number of events
    /// fired during it.
    fn on_advance(&mut self, _now: Instant, _fired: usize) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
