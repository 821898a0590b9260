//! Tasks (tests and treatments) and the arena that owns them.

use std::fmt;

use hs_core::{Interval, ResourceId, ResultKind, SiteId, TaskId};

use crate::{OpsError, OpsResult};

/// Tests produce a diagnosis; treatments act on it.  The kernel treats both
/// the same way; the category is carried for planners and reporting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskCategory {
    Test,
    Treatment,
}

/// Where, when, and with whom a task was booked.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Booking {
    pub interval:  Interval,
    pub site:      SiteId,
    /// Specific resources first, then one per required kind, in request
    /// order.
    pub resources: Vec<ResourceId>,
}

/// Outcome attached to a finished task.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskResult {
    pub kind:    ResultKind,
    pub summary: String,
}

impl TaskResult {
    pub fn new(kind: ResultKind, summary: impl Into<String>) -> Self {
        Self { kind, summary: summary.into() }
    }
}

/// Lifecycle state, carrying the booking once there is one.
///
/// `Cancelled` keeps the booking it gave up so `redo` can try to reclaim
/// exactly the same interval and resources.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskState {
    Created,
    Planned(Booking),
    Cancelled(Booking),
    InProgress(Booking),
    NeedsResult(Booking),
    Finished { booking: Booking, result: TaskResult },
}

impl TaskState {
    pub fn status(&self) -> TaskStatus {
        match self {
            TaskState::Created => TaskStatus::Created,
            TaskState::Planned(_) => TaskStatus::Planned,
            TaskState::Cancelled(_) => TaskStatus::Cancelled,
            TaskState::InProgress(_) => TaskStatus::InProgress,
            TaskState::NeedsResult(_) => TaskStatus::NeedsResult,
            TaskState::Finished { .. } => TaskStatus::Finished,
        }
    }

    /// The current or most recent booking, if any.
    pub fn booking(&self) -> Option<&Booking> {
        match self {
            TaskState::Created => None,
            TaskState::Planned(b)
            | TaskState::Cancelled(b)
            | TaskState::InProgress(b)
            | TaskState::NeedsResult(b)
            | TaskState::Finished { booking: b, .. } => Some(b),
        }
    }
}

/// [`TaskState`] without its payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskStatus {
    Created,
    Planned,
    Cancelled,
    InProgress,
    NeedsResult,
    Finished,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::Created,
        TaskStatus::Planned,
        TaskStatus::Cancelled,
        TaskStatus::InProgress,
        TaskStatus::NeedsResult,
        TaskStatus::Finished,
    ];

    /// `true` while the task holds bookings in its resources' schedules.
    pub fn is_booked(self) -> bool {
        matches!(
            self,
            TaskStatus::Planned
                | TaskStatus::InProgress
                | TaskStatus::NeedsResult
                | TaskStatus::Finished
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Created => "created",
            TaskStatus::Planned => "planned",
            TaskStatus::Cancelled => "cancelled",
            TaskStatus::InProgress => "in progress",
            TaskStatus::NeedsResult => "awaiting a result",
            TaskStatus::Finished => "finished",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug)]
pub struct Task {
    pub id:              TaskId,
    pub name:            String,
    pub category:        TaskCategory,
    /// Only a result of this kind can finish the task.
    pub expected_result: ResultKind,
    pub(crate) state:    TaskState,
}

impl Task {
    pub fn state(&self) -> &TaskState {
        &self.state
    }

    #[inline]
    pub fn status(&self) -> TaskStatus {
        self.state.status()
    }

    pub fn booking(&self) -> Option<&Booking> {
        self.state.booking()
    }

    pub fn result(&self) -> Option<&TaskResult> {
        match &self.state {
            TaskState::Finished { result, .. } => Some(result),
            _ => None,
        }
    }
}

// ── TaskStore ─────────────────────────────────────────────────────────────────

/// Arena of all tasks, indexed by [`TaskId`].  Tasks are never removed.
#[derive(Clone, Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new task in state `Created`.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        category: TaskCategory,
        expected_result: ResultKind,
    ) -> TaskId {
        let id = TaskId(self.tasks.len() as u32);
        self.tasks.push(Task {
            id,
            name: name.into(),
            category,
            expected_result,
            state: TaskState::Created,
        });
        id
    }

    pub fn get(&self, id: TaskId) -> OpsResult<&Task> {
        self.tasks.get(id.index()).ok_or(OpsError::UnknownTask(id))
    }

    pub(crate) fn get_mut(&mut self, id: TaskId) -> OpsResult<&mut Task> {
        self.tasks.get_mut(id.index()).ok_or(OpsError::UnknownTask(id))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter()
    }

    /// Ids of tasks currently in `status`, ascending.
    pub fn with_status(&self, status: TaskStatus) -> Vec<TaskId> {
        self.tasks
            .iter()
            .filter(|t| t.status() == status)
            .map(|t| t.id)
            .collect()
    }
}
