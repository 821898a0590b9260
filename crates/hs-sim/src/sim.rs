//! The `Sim` struct and its advance loop.

use hs_core::{Clock, CoreError, Duration, Instant, SimConfig, SubscriptionId, TaskId};
use hs_event::{Event, EventQueue};
use hs_ops::{Booking, OpsResult, Operations, SchedulingRequest, TaskResult, TaskState};

use crate::action::{DailyHook, EventSink, HookId, SimAction};
use crate::{SimError, SimObserver, SimResult};

/// The simulation driver.
///
/// `Sim` owns the clock, the event queue, and the [`Operations`] kernel.
/// An advance first moves anything already posted to the [`EventSink`] into
/// the queue, then works in passes, one per distinct event instant up to the
/// target:
///
/// 1. **Clock**: move to the pass instant and notify subscribers.
/// 2. **Sink**: move events posted through [`EventSink`]s into the queue.
/// 3. **Drain**: fire every event due at the pass instant, FIFO among ties.
///    Actions may queue follow-ups (a start queues its stop), which fire in
///    the same pass when due.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Configuration the simulation was built from.
    pub config: SimConfig,

    pub(crate) clock:  Clock,
    pub(crate) events: EventQueue<SimAction>,
    pub(crate) ops:    Operations,
    pub(crate) daily:  Vec<DailyHook>,
    pub(crate) sink:   EventSink,
}

impl Sim {
    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn ops(&self) -> &Operations {
        &self.ops
    }

    /// Direct kernel access for setup (adding tasks and shifts).  Lifecycle
    /// calls made here bypass the event queue: nothing is queued for them.
    /// Their transitions reach the observer when the next advance begins.
    pub fn ops_mut(&mut self) -> &mut Operations {
        &mut self.ops
    }

    /// The earliest pending event, including events posted through an
    /// [`EventSink`] that have not reached the queue yet.
    pub fn next_event_instant(&self) -> Option<Instant> {
        let queued = self.events.next_instant();
        let posted = self.sink.earliest().map(|at| at.max(self.now()));
        queued.into_iter().chain(posted).min()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len() + self.sink.len()
    }

    // ── Task operations ───────────────────────────────────────────────────

    /// Schedule `task` no earlier than now and queue its start event.
    pub fn schedule(&mut self, task: TaskId, request: &SchedulingRequest) -> SimResult<Booking> {
        let booking = self.ops.schedule(task, request, self.now())?;
        self.events.push(booking.interval.begin(), SimAction::StartTask(task));
        Ok(booking)
    }

    /// Cancel `task`.  Its queued start event becomes stale.
    pub fn cancel(&mut self, task: TaskId) -> SimResult<Booking> {
        Ok(self.ops.cancel(task)?)
    }

    /// Redo a cancelled task in its original slot and queue its start again.
    /// If the start queued by the original `schedule` is still pending, the
    /// first of the two starts the task and the other is dropped quietly.
    ///
    /// # Errors
    /// `Ops(Rescheduling)` if the slot is taken or has already begun; the task
    /// is then back in `Created`.
    pub fn redo(&mut self, task: TaskId) -> SimResult<Booking> {
        let booking = self.ops.redo(task, self.now())?;
        self.events.push(booking.interval.begin(), SimAction::StartTask(task));
        Ok(booking)
    }

    pub fn set_result(&mut self, task: TaskId, result: TaskResult) -> SimResult<()> {
        Ok(self.ops.set_result(task, result)?)
    }

    // ── Event registration ────────────────────────────────────────────────

    /// Register a clock subscriber.  See [`Clock::subscribe`].
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(Instant) + 'static,
    {
        self.clock.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.clock.unsubscribe(id)
    }

    /// A handle for posting events from clock subscribers.
    pub fn event_sink(&self) -> EventSink {
        self.sink.clone()
    }

    /// Queue `action` at `at`.
    ///
    /// # Errors
    /// `EventInPast` if `at` is before the current time.
    pub fn post(&mut self, at: Instant, action: SimAction) -> SimResult<()> {
        if at < self.now() {
            return Err(SimError::EventInPast { at, now: self.now() });
        }
        self.events.push(at, action);
        Ok(())
    }

    /// Run `f` against the kernel at `at`.
    pub fn call_at<F>(&mut self, at: Instant, f: F) -> SimResult<()>
    where
        F: FnOnce(&mut Operations, Instant) -> OpsResult<()> + 'static,
    {
        self.post(at, SimAction::Callback(Box::new(f)))
    }

    /// Run `hook` every simulated day at `hour:minute`, starting with the
    /// next occurrence (now, if the clock reads exactly that time).
    ///
    /// The next day's run is queued before the hook is called, so a hook
    /// that fails once still runs the following day; the error itself ends
    /// the current advance.
    ///
    /// # Errors
    /// `Core(InvalidArgument)` if `hour`/`minute` are out of range.
    pub fn every_day_at<F>(&mut self, hour: u32, minute: u32, hook: F) -> SimResult<HookId>
    where
        F: FnMut(&mut Operations, Instant) -> OpsResult<()> + 'static,
    {
        let first = self.now().roll_forward_to(hour, minute)?;
        let id = HookId(self.daily.len());
        self.daily.push(Box::new(hook));
        self.events.push(first, SimAction::Daily(id));
        tracing::debug!(hook = id.0, %first, "daily hook registered");
        Ok(id)
    }

    // ── Advancing ─────────────────────────────────────────────────────────

    /// Advance the clock to `target`, firing every event due on the way.
    /// Returns the number of events fired.
    ///
    /// Subscribers are notified at each intermediate event instant and once
    /// at `target`.
    ///
    /// # Errors
    /// `Core(InvalidArgument)` if `target` is in the past.  A failing action
    /// stops the advance at its instant; later events stay queued.
    pub fn advance_to<O: SimObserver>(&mut self, target: Instant, observer: &mut O) -> SimResult<usize> {
        if target < self.now() {
            return Err(CoreError::InvalidArgument(format!(
                "cannot advance from {} back to {target}",
                self.now()
            ))
            .into());
        }
        let now = self.now();
        report(&mut self.ops, observer, now);
        self.sink.flush_into(&mut self.events, now);

        let mut fired = 0;
        while let Some(next) = self.events.next_instant().filter(|&t| t < target) {
            fired += self.pass(next.max(self.now()), observer)?;
        }
        fired += self.pass(target, observer)?;
        observer.on_advance(target, fired);
        tracing::info!(now = %target, fired, pending = self.events.len(), "advanced");
        Ok(fired)
    }

    pub fn advance_by<O: SimObserver>(&mut self, by: Duration, observer: &mut O) -> SimResult<usize> {
        self.advance_to(self.now() + by, observer)
    }

    /// Advance to the next pending event and fire everything due then.
    /// Returns the instant reached, or `None` if the queue is empty.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<Option<Instant>> {
        let Some(next) = self.next_event_instant() else {
            return Ok(None);
        };
        let at = next.max(self.now());
        self.advance_to(at, observer)?;
        Ok(Some(at))
    }

    /// Step until the queue is empty or the next event lies after
    /// `deadline`.  The clock stops at the last event fired, not at
    /// `deadline`.  Returns the number of steps taken.
    ///
    /// Daily hooks keep the queue non-empty, so with hooks registered this
    /// always runs up to `deadline`.
    pub fn run_until<O: SimObserver>(&mut self, deadline: Instant, observer: &mut O) -> SimResult<usize> {
        let mut steps = 0;
        while self.next_event_instant().is_some_and(|t| t <= deadline) {
            self.step(observer)?;
            steps += 1;
        }
        Ok(steps)
    }

    /// One pass: clock, sink, drain at `at`.
    fn pass<O: SimObserver>(&mut self, at: Instant, observer: &mut O) -> SimResult<usize> {
        self.clock.advance_to(at)?;
        let Sim { events, ops, daily, sink, .. } = self;
        sink.flush_into(events, at);
        events.drain_up_to(at, |queue, event| -> SimResult<()> {
            let fired_at = event.at;
            let outcome = execute(queue, ops, daily, observer, event);
            report(ops, observer, fired_at);
            outcome?;
            sink.flush_into(queue, fired_at);
            Ok(())
        })
    }
}

/// Run one event's action.
fn execute<O: SimObserver>(
    queue: &mut EventQueue<SimAction>,
    ops: &mut Operations,
    daily: &mut [DailyHook],
    observer: &mut O,
    event: Event<SimAction>,
) -> SimResult<()> {
    let at = event.at;
    tracing::debug!(%at, action = ?event.action, "event fired");
    match event.action {
        SimAction::StartTask(task) => {
            let end = match ops.task(task)?.state() {
                TaskState::Planned(b) if b.interval.begin() == at => b.interval.end(),
                // A redo queued a second start for the same booking.
                TaskState::InProgress(b) if b.interval.begin() == at => {
                    tracing::debug!(%task, %at, "task already started");
                    return Ok(());
                }
                _ => {
                    skip_stale(task, at, observer);
                    return Ok(());
                }
            };
            ops.start(task)?;
            queue.push(end, SimAction::StopTask(task));
        }
        SimAction::StopTask(task) => {
            match ops.task(task)?.state() {
                TaskState::InProgress(b) if b.interval.end() == at => {}
                _ => {
                    skip_stale(task, at, observer);
                    return Ok(());
                }
            }
            ops.stop(task)?;
        }
        SimAction::Daily(id) => {
            if let Some(hook) = daily.get_mut(id.0) {
                queue.push(at + Duration::DAY, SimAction::Daily(id));
                hook(ops, at)?;
            }
        }
        SimAction::Callback(f) => f(ops, at)?,
    }
    Ok(())
}

/// Hand the state changes recorded since the last call to `observer`.
fn report<O: SimObserver>(ops: &mut Operations, observer: &mut O, at: Instant) {
    for t in ops.take_transitions() {
        observer.on_task_transition(t.task, t.from, t.to, at);
    }
}

fn skip_stale<O: SimObserver>(task: TaskId, at: Instant, observer: &mut O) {
    tracing::warn!(%task, %at, "stale event skipped");
    observer.on_stale_event(task, at);
}
