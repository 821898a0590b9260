//! Per-resource booking calendar.
//!
//! # Invariant
//!
//! No two `BookedItem`s in one `Schedule` have interfering intervals.
//! [`Schedule::add`] refuses any booking that would break this.
//!
//! # Lookup cost
//!
//! Items are keyed by `(begin, task)` in a `BTreeMap`.  Because non-empty
//! items never overlap, their ends are sorted too, so a conflict query walks
//! backward from the query's end and stops at the first non-empty item that
//! ends at or before the query's begin: O(log n + k).

use std::collections::BTreeMap;

use hs_core::{Instant, Interval, TaskId};

use crate::{CalendarError, CalendarResult};

/// One booking: `interval` reserved for `task`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BookedItem {
    pub interval: Interval,
    pub task:     TaskId,
}

impl BookedItem {
    pub fn new(interval: Interval, task: TaskId) -> Self {
        Self { interval, task }
    }
}

/// Ordered, conflict-free set of bookings owned by one resource.
#[derive(Clone, Debug, Default)]
pub struct Schedule {
    items: BTreeMap<(Instant, TaskId), Interval>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All bookings ordered by begin, then task id.
    pub fn booked_items(&self) -> impl Iterator<Item = BookedItem> + '_ {
        self.items
            .iter()
            .map(|(&(_, task), &interval)| BookedItem { interval, task })
    }

    /// Bookings that interfere with `interval`, in ascending order.
    pub fn conflicts(&self, interval: &Interval) -> Vec<BookedItem> {
        if interval.is_empty() {
            return Vec::new();
        }
        let mut found = Vec::new();
        // Keys strictly below (end, TaskId(0)) are exactly items with begin < end.
        for (&(_, task), booked) in self.items.range(..(interval.end(), TaskId(0))).rev() {
            if booked.is_empty() {
                continue;
            }
            if booked.end() <= interval.begin() {
                break;
            }
            found.push(BookedItem { interval: *booked, task });
        }
        found.reverse();
        found
    }

    /// `true` if any booking interferes with `interval`.
    pub fn interferes(&self, interval: &Interval) -> bool {
        !self.conflicts(interval).is_empty()
    }

    /// The bookings held by `task` (normally zero or one).
    pub fn bookings_of(&self, task: TaskId) -> Vec<BookedItem> {
        self.booked_items().filter(|b| b.task == task).collect()
    }

    pub fn contains(&self, item: &BookedItem) -> bool {
        self.items.get(&(item.interval.begin(), item.task)) == Some(&item.interval)
    }

    /// Insert `item`.
    ///
    /// # Errors
    /// `Conflict` if it interferes with an existing booking, `AlreadyBooked`
    /// if the same task already holds a booking with the same begin.  The
    /// schedule is unchanged on error.
    pub fn add(&mut self, item: BookedItem) -> CalendarResult<()> {
        if let Some(existing) = self.conflicts(&item.interval).first() {
            return Err(CalendarError::Conflict {
                task:     item.task,
                interval: item.interval,
                existing: existing.task,
            });
        }
        let key = (item.interval.begin(), item.task);
        if self.items.contains_key(&key) {
            return Err(CalendarError::AlreadyBooked { task: item.task, interval: item.interval });
        }
        self.items.insert(key, item.interval);
        Ok(())
    }

    /// Remove exactly `item`.  Returns `false` if it was not booked.
    pub fn remove(&mut self, item: &BookedItem) -> bool {
        let key = (item.interval.begin(), item.task);
        match self.items.get(&key) {
            Some(iv) if *iv == item.interval => {
                self.items.remove(&key);
                true
            }
            _ => false,
        }
    }

    /// Unbooked gaps inside `within`, in ascending order.
    pub fn free_windows(&self, within: &Interval) -> Vec<Interval> {
        let mut gaps = Vec::new();
        let mut cursor = within.begin();
        for item in self.conflicts(within) {
            if item.interval.begin() > cursor {
                gaps.push(Interval::starting_at(
                    cursor,
                    item.interval.begin().saturating_since(cursor),
                ));
            }
            cursor = cursor.max(item.interval.end());
        }
        if cursor < within.end() {
            gaps.push(Interval::starting_at(cursor, within.end().saturating_since(cursor)));
        }
        gaps
    }
}
