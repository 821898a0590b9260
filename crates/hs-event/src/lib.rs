//! `hs-event` — the discrete-event queue driving the hs kernel.
//!
//! | Module    | Contents                                        |
//! |-----------|-------------------------------------------------|
//! | [`event`] | `Event<A>` — `(instant, seq, action)`            |
//! | [`queue`] | `EventQueue<A>` (`BTreeMap<(Instant, u64), A>`)   |
//!
//! The queue is generic over the action type; `hs-sim` instantiates it with
//! its own action enum and executes actions in `drain_up_to`.

pub mod event;
pub mod queue;


pub use event::Event;
pub use queue::EventQueue;
