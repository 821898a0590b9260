//! `hs-ops` — resources, tasks, and the operations that move tasks through
//! their lifecycle.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`resource`]   | `Resource`, `ResourceRole`, `ResourceStore`               |
//! | [`builder`]    | `ResourceStoreBuilder`                                    |
//! | [`task`]       | `Task`, `TaskState`, `TaskStatus`, `Booking`, `TaskStore` |
//! | [`lifecycle`]  | `Operation`, `Transition`, the (status, operation) table  |
//! | [`scheduler`]  | `SchedulingRequest`, `Scheduler` (earliest fit, atomic commit) |
//! | [`operations`] | `Operations` facade                                       |
//! | [`error`]      | `OpsError`, `OpsResult<T>`                                |
//!
//! # Booking invariant
//!
//! A task has a `BookedItem` in each of its resources' schedules exactly
//! while its status is `Planned`, `InProgress`, `NeedsResult`, or
//! `Finished`.  Only [`Operations`] changes task state, and it books and
//! unbooks through the scheduler in the same call.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on task and request value types. |

pub mod builder;
pub mod error;
pub mod lifecycle;
pub mod operations;
pub mod resource;
pub mod scheduler;
pub mod task;

#[cfg(test)]
mod tests;

pub use builder::ResourceStoreBuilder;
pub use error::{OpsError, OpsResult};
pub use lifecycle::{Operation, Transition};
pub use operations::Operations;
pub use resource::{Resource, ResourceRole, ResourceStore};
pub use scheduler::{Scheduler, SchedulingRequest};
pub use task::{Booking, Task, TaskCategory, TaskResult, TaskState, TaskStatus, TaskStore};
