//! Seeded RNG for planners sitting on top of the kernel.
//!
//! The kernel itself never draws random numbers; slot search and lifecycles
//! are deterministic.  Planners that generate demand (orders, no-shows,
//! cancellations) draw from a `SimRng` so a run replays exactly from
//! `SimConfig::seed`.
//!
//! Independent planners take separate streams:
//!
//!   stream_seed = seed XOR (stream * MIXING_CONSTANT)
//!
//! so tuning one planner's draws never shifts another's.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Stream number `stream` of the run seeded with `seed`.  Stream 0 is
    /// the same as [`SimRng::new`].
    pub fn stream(seed: u64, stream: u64) -> Self {
        SimRng::new(seed ^ stream.wrapping_mul(MIXING_CONSTANT))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p`; out-of-range `p` is clamped.
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.0)
    }
}

impl std::fmt::Debug for SimRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SimRng(..)")
    }
}
