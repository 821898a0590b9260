//! Simulated time primitives.
//!
//! # Design
//!
//! Time is an integer count of milliseconds since the simulation epoch
//! (day 0, 00:00).  Days are always 24 h long; there is no calendar, time
//! zone or DST.  Using integer milliseconds means repeated additions never
//! drift and comparisons are O(1).
//!
//! | Type       | Meaning                                    |
//! |------------|--------------------------------------------|
//! | `Instant`  | a point in simulated time (`i64` ms)        |
//! | `Duration` | a non-negative span (`u64` ms)              |
//! | `Interval` | a half-open range `[begin, end)`            |

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};

use crate::{CoreError, CoreResult};

pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR:   i64 = 60 * MS_PER_MINUTE;
pub const MS_PER_DAY:    i64 = 24 * MS_PER_HOUR;

// ── Instant ──────────────────────────────────────────────────────────────────

/// A point in simulated time, in milliseconds since the epoch.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instant(pub i64);

impl Instant {
    pub const EPOCH: Instant = Instant(0);

    /// The instant at `hour:minute` on `day`.
    ///
    /// # Errors
    /// `InvalidArgument` if `hour > 23` or `minute > 59`.
    pub fn from_dhm(day: i64, hour: u32, minute: u32) -> CoreResult<Instant> {
        check_clock_fields(hour, minute)?;
        Ok(Instant(
            day * MS_PER_DAY + hour as i64 * MS_PER_HOUR + minute as i64 * MS_PER_MINUTE,
        ))
    }

    /// Day index (day 0 starts at the epoch; negative before it).
    #[inline]
    pub fn day(self) -> i64 {
        self.0.div_euclid(MS_PER_DAY)
    }

    /// Midnight at the start of this instant's day.
    #[inline]
    pub fn start_of_day(self) -> Instant {
        Instant(self.day() * MS_PER_DAY)
    }

    /// Time elapsed since midnight.
    #[inline]
    pub fn time_of_day(self) -> Duration {
        Duration(self.0.rem_euclid(MS_PER_DAY) as u64)
    }

    pub fn hour(self) -> u32 {
        (self.0.rem_euclid(MS_PER_DAY) / MS_PER_HOUR) as u32
    }

    pub fn minute(self) -> u32 {
        (self.0.rem_euclid(MS_PER_HOUR) / MS_PER_MINUTE) as u32
    }

    /// The next instant whose wall-clock reads `hour:minute`.
    ///
    /// Same day if that clock time has not passed yet (an instant exactly at
    /// `hour:minute` returns itself), otherwise the following day.
    ///
    /// # Errors
    /// `InvalidArgument` if `hour > 23` or `minute > 59`.
    pub fn roll_forward_to(self, hour: u32, minute: u32) -> CoreResult<Instant> {
        let same_day = Instant::from_dhm(self.day(), hour, minute)?;
        if same_day >= self {
            Ok(same_day)
        } else {
            Ok(same_day + Duration::DAY)
        }
    }

    /// Time from `earlier` to `self`, clamped at zero.
    #[inline]
    pub fn saturating_since(self, earlier: Instant) -> Duration {
        Duration(self.0.saturating_sub(earlier.0).max(0) as u64)
    }
}

fn check_clock_fields(hour: u32, minute: u32) -> CoreResult<()> {
    if hour > 23 || minute > 59 {
        return Err(CoreError::InvalidArgument(format!(
            "clock time {hour:02}:{minute:02} is out of range"
        )));
    }
    Ok(())
}

impl Add<Duration> for Instant {
    type Output = Instant;
    #[inline]
    fn add(self, rhs: Duration) -> Instant {
        Instant(self.0 + rhs.0 as i64)
    }
}

impl AddAssign<Duration> for Instant {
    #[inline]
    fn add_assign(&mut self, rhs: Duration) {
        self.0 += rhs.0 as i64;
    }
}

impl Sub<Duration> for Instant {
    type Output = Instant;
    #[inline]
    fn sub(self, rhs: Duration) -> Instant {
        Instant(self.0 - rhs.0 as i64)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{} {:02}:{:02}", self.day(), self.hour(), self.minute())?;
        let sub_minute = self.0.rem_euclid(MS_PER_MINUTE);
        if sub_minute != 0 {
            write!(
                f,
                ":{:02}.{:03}",
                sub_minute / MS_PER_SECOND,
                sub_minute % MS_PER_SECOND
            )?;
        }
        Ok(())
    }
}

// ── Duration ─────────────────────────────────────────────────────────────────

/// A non-negative span of simulated time, in milliseconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Duration(pub u64);

impl Duration {
    pub const ZERO:   Duration = Duration(0);
    pub const MINUTE: Duration = Duration(MS_PER_MINUTE as u64);
    pub const HOUR:   Duration = Duration(MS_PER_HOUR as u64);
    pub const DAY:    Duration = Duration(MS_PER_DAY as u64);

    #[inline]
    pub const fn from_millis(ms: u64) -> Duration {
        Duration(ms)
    }

    #[inline]
    pub const fn from_secs(secs: u64) -> Duration {
        Duration(secs * MS_PER_SECOND as u64)
    }

    #[inline]
    pub const fn from_minutes(minutes: u64) -> Duration {
        Duration(minutes * MS_PER_MINUTE as u64)
    }

    #[inline]
    pub const fn from_hours(hours: u64) -> Duration {
        Duration(hours * MS_PER_HOUR as u64)
    }

    #[inline]
    pub const fn from_days(days: u64) -> Duration {
        Duration(days * MS_PER_DAY as u64)
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Whole minutes (truncated).
    #[inline]
    pub fn as_minutes(self) -> u64 {
        self.0 / MS_PER_MINUTE as u64
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn saturating_sub(self, rhs: Duration) -> Duration {
        Duration(self.0.saturating_sub(rhs.0))
    }
}

impl Add for Duration {
    type Output = Duration;
    #[inline]
    fn add(self, rhs: Duration) -> Duration {
        Duration(self.0 + rhs.0)
    }
}

impl AddAssign for Duration {
    #[inline]
    fn add_assign(&mut self, rhs: Duration) {
        self.0 += rhs.0;
    }
}

impl Mul<u64> for Duration {
    type Output = Duration;
    #[inline]
    fn mul(self, rhs: u64) -> Duration {
        Duration(self.0 * rhs)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.0;
        let hours = ms / MS_PER_HOUR as u64;
        let minutes = (ms % MS_PER_HOUR as u64) / MS_PER_MINUTE as u64;
        let rest_ms = ms % MS_PER_MINUTE as u64;
        if hours > 0 {
            write!(f, "{hours}h")?;
        }
        if minutes > 0 || (hours == 0 && rest_ms == 0) {
            write!(f, "{minutes}m")?;
        }
        if rest_ms > 0 {
            write!(f, "{}ms", rest_ms)?;
        }
        Ok(())
    }
}

// ── Interval ─────────────────────────────────────────────────────────────────

/// A half-open span of simulated time `[begin, end)` with `begin <= end`.
///
/// Fields are private so the ordering invariant cannot be broken after
/// construction.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    begin: Instant,
    end:   Instant,
}

impl Interval {
    /// # Errors
    /// `InvalidArgument` if `end < begin`.
    pub fn new(begin: Instant, end: Instant) -> CoreResult<Interval> {
        if end < begin {
            return Err(CoreError::InvalidArgument(format!(
                "interval end {end} is before its begin {begin}"
            )));
        }
        Ok(Interval { begin, end })
    }

    /// The interval of length `duration` starting at `begin`.
    #[inline]
    pub fn starting_at(begin: Instant, duration: Duration) -> Interval {
        Interval { begin, end: begin + duration }
    }

    #[inline]
    pub fn begin(&self) -> Instant {
        self.begin
    }

    #[inline]
    pub fn end(&self) -> Instant {
        self.end
    }

    #[inline]
    pub fn duration(&self) -> Duration {
        self.end.saturating_since(self.begin)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// `true` if `t` lies in `[begin, end)`.
    #[inline]
    pub fn contains(&self, t: Instant) -> bool {
        self.begin <= t && t < self.end
    }

    /// Half-open overlap test.  Intervals that merely touch do not interfere,
    /// and an empty interval interferes with nothing.
    #[inline]
    pub fn interferes(&self, other: &Interval) -> bool {
        self.begin < other.end && other.begin < self.end
    }

    /// The common part of both intervals, or `None` if it would be empty.
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        let begin = self.begin.max(other.begin);
        let end = self.end.min(other.end);
        (begin < end).then_some(Interval { begin, end })
    }

    /// `true` if `other` lies entirely inside `self`.
    #[inline]
    pub fn encapsulates(&self, other: &Interval) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }

    /// `true` if this interval lasts strictly longer than `duration`.
    #[inline]
    pub fn longer_than(&self, duration: Duration) -> bool {
        self.duration() > duration
    }

    /// Same clock time and length, moved onto the calendar day of `date`.
    pub fn shifted_onto(&self, date: Instant) -> Interval {
        Interval::starting_at(
            date.start_of_day() + self.begin.time_of_day(),
            self.duration(),
        )
    }

    /// The same interval moved later by `by`.
    #[inline]
    pub fn delayed_by(&self, by: Duration) -> Interval {
        Interval { begin: self.begin + by, end: self.end + by }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}
