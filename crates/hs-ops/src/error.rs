use hs_calendar::CalendarError;
use hs_core::{CoreError, Interval, ResourceId, ResultKind, TaskId};
use thiserror::Error;

use crate::{Operation, TaskStatus};

/// Errors raised by scheduling and lifecycle operations.
///
/// | Variant            | Nature                                      |
/// |--------------------|---------------------------------------------|
/// | `IllegalOperation` | caller bug: transition not allowed          |
/// | `Scheduling`       | expected: no feasible slot, retry differently |
/// | `Rescheduling`     | expected: redo lost its slot, task is back at `status` |
/// | `ResultMismatch`   | caller bug: wrong result kind               |
/// | `InvalidArgument`  | caller bug: malformed request               |
#[derive(Debug, Error)]
pub enum OpsError {
    #[error("cannot {op} {task} while it is {status}")]
    IllegalOperation {
        task:   TaskId,
        op:     Operation,
        status: TaskStatus,
    },

    #[error("cannot schedule: {0}")]
    Scheduling(String),

    #[error("cannot redo {task} at {interval}: {reason}; task reset to {status}")]
    Rescheduling {
        task:     TaskId,
        interval: Interval,
        reason:   String,
        /// The state the task was left in (always `Created`).
        status:   TaskStatus,
    },

    #[error("{task} expects a {expected} result, got {got}")]
    ResultMismatch {
        task:     TaskId,
        expected: ResultKind,
        got:      ResultKind,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0} does not exist")]
    UnknownTask(TaskId),

    #[error("{0} does not exist")]
    UnknownResource(ResourceId),

    #[error("{0} has no shift table")]
    NotStaff(ResourceId),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

pub type OpsResult<T> = Result<T, OpsError>;
