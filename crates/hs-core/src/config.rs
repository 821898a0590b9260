//! Top-level simulation configuration.

use crate::{Clock, CoreError, CoreResult, Duration, Instant};

/// Simulation configuration.
///
/// Typically loaded from a JSON file by the application crate (enable the
/// `serde` feature) and passed to the simulation builder.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Instant the clock reads when the simulation starts.
    pub start: Instant,

    /// How far past the requested start the scheduler searches for a free
    /// slot before giving up.  Default: 30 days.
    pub scheduling_horizon_days: u32,

    /// Master RNG seed for planners.  The kernel itself is deterministic and
    /// never draws random numbers.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { start: Instant::EPOCH, scheduling_horizon_days: 30, seed: 0 }
    }
}

impl SimConfig {
    /// Reject configurations the kernel cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.scheduling_horizon_days == 0 {
            return Err(CoreError::Config(
                "scheduling_horizon_days must be at least 1".into(),
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn scheduling_horizon(&self) -> Duration {
        Duration::from_days(self.scheduling_horizon_days as u64)
    }

    /// Construct a `Clock` reading `start`.
    pub fn make_clock(&self) -> Clock {
        Clock::new(self.start)
    }
}
