//! `Operations` — the lifecycle facade over resources, tasks, and the
//! scheduler.
//!
//! Each method validates the transition first and fails with
//! `IllegalOperation` (state untouched) if the current status does not
//! permit it.  Calendar side effects happen only on `schedule`, `cancel`,
//! and `redo`.

use hs_calendar::Shift;
use hs_core::{Instant, Interval, ResourceId, ResultKind, SiteId, TaskId};

use crate::{
    Booking, OpsError, OpsResult, Operation, ResourceStore, Scheduler, SchedulingRequest, Task,
    TaskCategory, TaskResult, TaskState, TaskStatus, TaskStore, Transition,
};

#[derive(Clone, Debug)]
pub struct Operations {
    pub(crate) resources: ResourceStore,
    tasks:                TaskStore,
    scheduler:            Scheduler,
    /// `Some` once [`record_transitions`](Self::record_transitions) is on.
    journal:              Option<Vec<Transition>>,
}

impl Operations {
    pub fn new(resources: ResourceStore, scheduler: Scheduler) -> Self {
        Self { resources, tasks: TaskStore::new(), scheduler, journal: None }
    }

    pub fn resources(&self) -> &ResourceStore {
        &self.resources
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn task(&self, id: TaskId) -> OpsResult<&Task> {
        self.tasks.get(id)
    }

    pub fn status(&self, id: TaskId) -> OpsResult<TaskStatus> {
        self.tasks.get(id).map(Task::status)
    }

    pub fn tasks_with_status(&self, status: TaskStatus) -> Vec<TaskId> {
        self.tasks.with_status(status)
    }

    pub fn free_windows(&self, resource: ResourceId, within: &Interval) -> OpsResult<Vec<Interval>> {
        self.resources.free_windows(resource, within)
    }

    pub fn add_task(
        &mut self,
        name: impl Into<String>,
        category: TaskCategory,
        expected_result: ResultKind,
    ) -> TaskId {
        self.tasks.add(name, category, expected_result)
    }

    pub fn add_shift(&mut self, resource: ResourceId, site: SiteId, shift: Shift) -> OpsResult<()> {
        self.resources.add_shift(resource, site, shift)
    }

    /// Start keeping a journal of every state change, for a driver to
    /// collect with [`take_transitions`](Self::take_transitions).
    pub fn record_transitions(&mut self) {
        self.journal.get_or_insert_with(Vec::new);
    }

    /// The state changes since the last call, oldest first.  Always empty
    /// unless recording is on.
    pub fn take_transitions(&mut self) -> Vec<Transition> {
        self.journal.as_mut().map(std::mem::take).unwrap_or_default()
    }

    /// Fail with `IllegalOperation` unless `task` may perform `op` now.
    fn require(&self, task: TaskId, op: Operation) -> OpsResult<&Task> {
        let t = self.tasks.get(task)?;
        let status = t.status();
        if status.permits(op) {
            Ok(t)
        } else {
            Err(OpsError::IllegalOperation { task, op, status })
        }
    }

    /// [`require`](Self::require), then the booking the task holds.
    fn booking_for(&self, task: TaskId, op: Operation) -> OpsResult<Booking> {
        let t = self.require(task, op)?;
        t.booking()
            .cloned()
            .ok_or(OpsError::IllegalOperation { task, op, status: t.status() })
    }

    fn set_state(&mut self, task: TaskId, state: TaskState) -> OpsResult<()> {
        let t = self.tasks.get_mut(task)?;
        let from = t.status();
        t.state = state;
        if let Some(journal) = &mut self.journal {
            journal.push(Transition { task, from, to: t.status() });
        }
        Ok(())
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Find the earliest slot for `request` at or after `not_before`, book it
    /// on every resource, and move `task` to `Planned`.
    ///
    /// # Errors
    /// `IllegalOperation` unless `Created`; `Scheduling` if no slot exists
    /// within the horizon.  Nothing is booked on error.
    pub fn schedule(
        &mut self,
        task: TaskId,
        request: &SchedulingRequest,
        not_before: Instant,
    ) -> OpsResult<Booking> {
        self.require(task, Operation::Schedule)?;
        let (interval, resources) = self.scheduler.find_slot(&self.resources, request, not_before)?;
        Scheduler::commit(&mut self.resources, task, interval, &resources)?;
        let booking = Booking { interval, site: request.site, resources };
        self.set_state(task, TaskState::Planned(booking.clone()))?;
        tracing::info!(%task, %interval, site = %request.site, "task planned");
        Ok(booking)
    }

    /// Give up `task`'s booking.  The booking is remembered for [`redo`].
    ///
    /// [`redo`]: Self::redo
    pub fn cancel(&mut self, task: TaskId) -> OpsResult<Booking> {
        let booking = self.booking_for(task, Operation::Cancel)?;
        Scheduler::release(&mut self.resources, task, booking.interval, &booking.resources)?;
        self.set_state(task, TaskState::Cancelled(booking.clone()))?;
        tracing::info!(%task, interval = %booking.interval, "task cancelled");
        Ok(booking)
    }

    /// Try to reclaim a cancelled task's original interval and resources.
    ///
    /// # Errors
    /// `Rescheduling` if the original slot is taken or already began before
    /// `not_before`.  The task is then back in `Created`, unbooked, and can
    /// be scheduled afresh.
    pub fn redo(&mut self, task: TaskId, not_before: Instant) -> OpsResult<Booking> {
        let booking = self.booking_for(task, Operation::Redo)?;

        let outcome = if booking.interval.begin() < not_before {
            Err(format!("slot began before {not_before}"))
        } else {
            Scheduler::commit(&mut self.resources, task, booking.interval, &booking.resources)
                .map_err(|e| e.to_string())
        };

        match outcome {
            Ok(()) => {
                self.set_state(task, TaskState::Planned(booking.clone()))?;
                tracing::info!(%task, interval = %booking.interval, "task re-planned");
                Ok(booking)
            }
            Err(reason) => {
                self.set_state(task, TaskState::Created)?;
                tracing::info!(%task, %reason, "redo failed, task reset");
                Err(OpsError::Rescheduling {
                    task,
                    interval: booking.interval,
                    reason,
                    status: TaskStatus::Created,
                })
            }
        }
    }

    pub fn start(&mut self, task: TaskId) -> OpsResult<()> {
        let booking = self.booking_for(task, Operation::Start)?;
        self.set_state(task, TaskState::InProgress(booking))?;
        tracing::info!(%task, "task started");
        Ok(())
    }

    pub fn stop(&mut self, task: TaskId) -> OpsResult<()> {
        let booking = self.booking_for(task, Operation::Stop)?;
        self.set_state(task, TaskState::NeedsResult(booking))?;
        tracing::info!(%task, "task stopped, awaiting result");
        Ok(())
    }

    /// Attach `result` and finish the task.
    ///
    /// # Errors
    /// `ResultMismatch` if `result.kind` differs from the task's expected
    /// kind; the task stays in `NeedsResult`.
    pub fn set_result(&mut self, task: TaskId, result: TaskResult) -> OpsResult<()> {
        let t = self.require(task, Operation::SetResult)?;
        if result.kind != t.expected_result {
            return Err(OpsError::ResultMismatch {
                task,
                expected: t.expected_result,
                got: result.kind,
            });
        }
        let booking = self.booking_for(task, Operation::SetResult)?;
        self.set_state(task, TaskState::Finished { booking, result })?;
        tracing::info!(%task, "task finished");
        Ok(())
    }
}
