use hs_core::{CoreError, Interval, TaskId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("invalid shift {interval}: {reason}")]
    InvalidShift {
        interval: Interval,
        reason:   &'static str,
    },

    #[error("booking {interval} for {task} interferes with {existing}")]
    Conflict {
        task:     TaskId,
        interval: Interval,
        existing: TaskId,
    },

    #[error("{task} is already booked at {interval}")]
    AlreadyBooked {
        task:     TaskId,
        interval: Interval,
    },

    #[error("shift table parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CalendarResult<T> = Result<T, CalendarError>;
