//! The simulated clock.
//!
//! `Clock` holds the current `Instant` and an explicit list of subscribers.
//! Time only moves forward; every successful advance synchronously calls each
//! subscriber with the new instant.  Subscribers must not rely on being called
//! in any particular order relative to each other.

use std::fmt;

use crate::{CoreError, CoreResult, Duration, Instant};

/// Handle returned by [`Clock::subscribe`], used to unsubscribe later.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(Instant)>;

/// A monotonic simulated clock with time-advance subscribers.
pub struct Clock {
    now:         Instant,
    next_id:     u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

impl Clock {
    /// A clock reading `start`, with no subscribers.
    pub fn new(start: Instant) -> Self {
        Self { now: start, next_id: 0, subscribers: Vec::new() }
    }

    #[inline]
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Register `callback` to be told the new time after every advance.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(Instant) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber.  Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Move the clock to `instant` and notify every subscriber.
    ///
    /// Advancing to the current time is allowed and still notifies.
    ///
    /// # Errors
    /// `InvalidArgument` if `instant` is before the current time; the clock
    /// and subscribers are left untouched.
    pub fn advance_to(&mut self, instant: Instant) -> CoreResult<()> {
        if instant < self.now {
            return Err(CoreError::InvalidArgument(format!(
                "clock cannot move backward from {} to {instant}",
                self.now
            )));
        }
        self.now = instant;
        tracing::trace!(now = %instant, subscribers = self.subscribers.len(), "clock advanced");
        for (_, subscriber) in &mut self.subscribers {
            subscriber(instant);
        }
        Ok(())
    }

    /// Shorthand for `advance_to(now + by)`.
    pub fn advance_by(&mut self, by: Duration) -> CoreResult<()> {
        self.advance_to(self.now + by)
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clock")
            .field("now", &self.now)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.now)
    }
}
