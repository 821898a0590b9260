use hs_core::{CoreError, Instant};
use hs_ops::OpsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Ops(#[from] OpsError),

    #[error("cannot post an event at {at}: the clock already reads {now}")]
    EventInPast {
        at:  Instant,
        now: Instant,
    },
}

pub type SimResult<T> = Result<T, SimError>;
