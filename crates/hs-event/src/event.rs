use hs_core::Instant;

/// A pending action and the instant it must fire at.
///
/// Owned by the [`EventQueue`][crate::EventQueue] until popped; each event is
/// handed out exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event<A> {
    pub at:     Instant,
    /// Submission order within the owning queue; breaks ties between equal
    /// instants.
    pub seq:    u64,
    pub action: A,
}
