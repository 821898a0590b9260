//! `hs-core` — foundational types for the `hs` hospital simulation kernel.
//!
//! This crate is a dependency of every other `hs-*` crate.  It has no `hs-*`
//! dependencies and few external ones (`rand`, `thiserror`, `tracing`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `ResourceId`, `SiteId`, `TaskId`, `KindId`, `ResultKind` |
//! | [`time`]        | `Instant`, `Duration`, `Interval`                     |
//! | [`clock`]       | `Clock` (monotonic, with subscribers)                 |
//! | [`config`]      | `SimConfig`                                           |
//! | [`rng`]         | `SimRng` (seeded, for planners and demos)             |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod clock;
pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use clock::{Clock, SubscriptionId};
pub use config::SimConfig;
pub use error::{CoreError, CoreResult};
pub use ids::{KindId, ResourceId, ResultKind, SiteId, TaskId};
pub use rng::SimRng;
pub use time::{Duration, Instant, Interval};
