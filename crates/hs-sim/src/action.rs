//! What an event does when it fires, and the sink subscribers use to post
//! events.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use hs_core::{Instant, TaskId};
use hs_event::EventQueue;
use hs_ops::{Booking, OpsResult, Operations};

/// Code run against the kernel at an event's instant.
pub type Callback = Box<dyn FnOnce(&mut Operations, Instant) -> OpsResult<()>>;

/// A daily hook registered with [`Sim::every_day_at`](crate::Sim::every_day_at).
pub type DailyHook = Box<dyn FnMut(&mut Operations, Instant) -> OpsResult<()>>;

/// Index of a daily hook inside its `Sim`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HookId(pub(crate) usize);

/// The action carried by every queued event.
///
/// Start and stop actions are idempotent: if the task is no longer planned
/// (resp. in progress) for the instant the event fires at, the event is
/// skipped.
pub enum SimAction {
    /// Move a planned task to `InProgress` and queue its stop.
    StartTask(TaskId),
    /// Move an in-progress task to `NeedsResult`.
    StopTask(TaskId),
    /// Run a daily hook and re-arm it one day later.
    Daily(HookId),
    Callback(Callback),
}

impl fmt::Debug for SimAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimAction::StartTask(t) => f.debug_tuple("StartTask").field(t).finish(),
            SimAction::StopTask(t) => f.debug_tuple("StopTask").field(t).finish(),
            SimAction::Daily(h) => f.debug_tuple("Daily").field(h).finish(),
            SimAction::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

// ── EventSink ─────────────────────────────────────────────────────────────────

/// A cloneable handle for posting events from places that cannot borrow the
/// `Sim`, typically clock subscribers.
///
/// Posted events are moved into the queue when an advance begins, after
/// subscribers have been notified, and after every fired action.  An event
/// posted for the current instant still fires in the same advance; events
/// posted for an instant already past fire at the current instant instead.
#[derive(Clone, Default)]
pub struct EventSink {
    pending: Rc<RefCell<Vec<(Instant, SimAction)>>>,
}

impl EventSink {
    pub fn post(&self, at: Instant, action: SimAction) {
        self.pending.borrow_mut().push((at, action));
    }

    /// Shorthand for posting a [`SimAction::Callback`].
    pub fn call_at<F>(&self, at: Instant, f: F)
    where
        F: FnOnce(&mut Operations, Instant) -> OpsResult<()> + 'static,
    {
        self.post(at, SimAction::Callback(Box::new(f)));
    }

    /// Queue the start event for a task just planned or re-planned from
    /// inside a callback or hook.
    pub fn queue_start(&self, task: TaskId, booking: &Booking) {
        self.post(booking.interval.begin(), SimAction::StartTask(task));
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    /// The earliest instant posted and not yet moved into the queue.
    pub fn earliest(&self) -> Option<Instant> {
        self.pending.borrow().iter().map(|(at, _)| *at).min()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Move everything posted so far into `queue`, in posting order.
    pub(crate) fn flush_into(&self, queue: &mut EventQueue<SimAction>, now: Instant) -> usize {
        let drained: Vec<_> = self.pending.borrow_mut().drain(..).collect();
        let n = drained.len();
        for (at, action) in drained {
            if at < now {
                tracing::warn!(%at, %now, ?action, "event posted for the past, firing now");
            }
            queue.push(at.max(now), action);
        }
        n
    }
}

impl fmt::Debug for EventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink").field("pending", &self.len()).finish()
    }
}
