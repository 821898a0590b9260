//! `hs-sim` — drives task lifecycles from a simulated clock.
//!
//! # Advance loop
//!
//! ```text
//! advance_to(target):
//!   report transitions made since the last advance; move the sink into the queue
//!   for each pending event instant t < target, then t = target:
//!     ① Clock  — clock.advance_to(t); subscribers notified
//!     ② Sink   — events posted through EventSinks move into the queue
//!     ③ Drain  — fire events due at t, instant order then FIFO:
//!                  StartTask  → ops.start, queue StopTask at booking end
//!                  StopTask   → ops.stop
//!                  Daily(h)   → re-queue h one day later, then run it
//!                  Callback   → run it against Operations
//!                after each action: report its transitions, move the sink
//! ```
//!
//! Start and stop events check that the task is still in the state they
//! were queued for; if it was cancelled or re-planned meanwhile, the event
//! is skipped with a warning.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use hs_ops::{ResourceStoreBuilder, SchedulingRequest, TaskCategory};
//! use hs_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(config, store).build()?;
//! let task = sim.ops_mut().add_task("CBC", TaskCategory::Test, BLOOD_PANEL);
//! sim.schedule(task, &SchedulingRequest::new(minutes(30), LAB).needs(NURSE))?;
//! sim.advance_by(Duration::DAY, &mut NoopObserver)?;
//! ```

pub mod action;
pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use action::{EventSink, HookId, SimAction};
pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
