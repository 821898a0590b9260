//! The task state machine.
//!
//! ```text
//!            schedule          start            stop               set_result
//! Created ───────────▶ Planned ──────▶ InProgress ─────▶ NeedsResult ──────────▶ Finished
//!    ▲                  │   ▲
//!    │           cancel │   │ redo (slot still free)
//!    │                  ▼   │
//!    └──────────────── Cancelled
//!      redo (slot taken or past; reported as `Rescheduling`)
//! ```
//!
//! Every other (status, operation) pair is illegal.

use std::fmt;

use hs_core::TaskId;

use crate::TaskStatus;

/// A request to move a task through its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    Schedule,
    Cancel,
    Redo,
    Start,
    Stop,
    SetResult,
}

/// One state change, as recorded by [`Operations::take_transitions`].
///
/// [`Operations::take_transitions`]: crate::Operations::take_transitions
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    pub task: TaskId,
    pub from: TaskStatus,
    pub to:   TaskStatus,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Schedule,
        Operation::Cancel,
        Operation::Redo,
        Operation::Start,
        Operation::Stop,
        Operation::SetResult,
    ];
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::Schedule => "schedule",
            Operation::Cancel => "cancel",
            Operation::Redo => "redo",
            Operation::Start => "start",
            Operation::Stop => "stop",
            Operation::SetResult => "set the result of",
        };
        f.write_str(s)
    }
}

impl TaskStatus {
    /// Where `op` takes a task in this status when it succeeds, or `None`
    /// if `op` is illegal here.
    ///
    /// A redo that loses its slot ends in `Created` instead; that fallback
    /// is an error path and not listed.
    pub fn after(self, op: Operation) -> Option<TaskStatus> {
        use Operation as Op;
        use TaskStatus as S;
        match (self, op) {
            (S::Created, Op::Schedule) => Some(S::Planned),
            (S::Planned, Op::Cancel) => Some(S::Cancelled),
            (S::Planned, Op::Start) => Some(S::InProgress),
            (S::Cancelled, Op::Redo) => Some(S::Planned),
            (S::InProgress, Op::Stop) => Some(S::NeedsResult),
            (S::NeedsResult, Op::SetResult) => Some(S::Finished),
            (S::Created | S::Planned | S::Cancelled | S::InProgress | S::NeedsResult | S::Finished, _) => None,
        }
    }

    #[inline]
    pub fn permits(self, op: Operation) -> bool {
        self.after(op).is_some()
    }
}
