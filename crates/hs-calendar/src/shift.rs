//! Recurring staff availability: `Shift` and `ShiftTable`.
//!
//! # Recurrence model
//!
//! A `Shift` is stored as a concrete `Interval` on some anchor day, but only
//! its clock time matters: the shift repeats every day.  To ask "does this
//! shift host slot S?" the shift is projected onto S's calendar day:
//!
//! ```text
//! shift_on_day(S) = shift.interval.shifted_onto(S.begin)
//! hosts(S)        = shift_on_day(S).encapsulates(S)
//! ```
//!
//! Shifts never cross midnight (they may end exactly at the next midnight),
//! so a slot that crosses midnight is never hosted.

use std::collections::BTreeMap;

use hs_core::{Duration, Instant, Interval, SiteId};

use crate::{CalendarError, CalendarResult};

// ── Shift ─────────────────────────────────────────────────────────────────────

/// A daily recurring availability window.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shift {
    interval: Interval,
}

impl Shift {
    /// Wrap `interval` as a shift.
    ///
    /// # Errors
    /// `InvalidShift` if the interval is empty or spans more than one
    /// calendar day.
    pub fn new(interval: Interval) -> CalendarResult<Shift> {
        if interval.is_empty() {
            return Err(CalendarError::InvalidShift { interval, reason: "shift is empty" });
        }
        // Last covered millisecond must fall on the starting day.
        let last = interval.end() - Duration::from_millis(1);
        if last.day() != interval.begin().day() {
            return Err(CalendarError::InvalidShift {
                interval,
                reason: "shift crosses midnight",
            });
        }
        Ok(Shift { interval })
    }

    /// A shift from `begin` to `end` given as `(hour, minute)` clock times.
    /// `(24, 0)` is accepted as an end meaning "until midnight".
    pub fn daily(begin: (u32, u32), end: (u32, u32)) -> CalendarResult<Shift> {
        let begin = Instant::from_dhm(0, begin.0, begin.1)?;
        let end = match end {
            (24, 0) => Instant::from_dhm(1, 0, 0)?,
            (h, m) => Instant::from_dhm(0, h, m)?,
        };
        Shift::new(Interval::new(begin, end)?)
    }

    /// The anchor interval this shift was created from.
    #[inline]
    pub fn interval(&self) -> Interval {
        self.interval
    }

    #[inline]
    pub fn duration(&self) -> Duration {
        self.interval.duration()
    }

    /// This shift's occurrence on the calendar day of `date`.
    #[inline]
    pub fn on_day(&self, date: Instant) -> Interval {
        self.interval.shifted_onto(date)
    }

    /// `true` if `slot` fits inside this shift on the slot's own day.
    #[inline]
    pub fn hosts(&self, slot: &Interval) -> bool {
        self.on_day(slot.begin()).encapsulates(slot)
    }

    /// Earliest start `>= from` at which a slot of length `len` fits in some
    /// occurrence of this shift, or `None` if the shift is too short.
    fn earliest_start(&self, from: Instant, len: Duration) -> Option<Instant> {
        if self.duration() < len {
            return None;
        }
        let today = self.on_day(from);
        if from <= today.begin() {
            Some(today.begin())
        } else if from + len <= today.end() {
            Some(from)
        } else {
            Some(today.begin() + Duration::DAY)
        }
    }

    /// The daily overlap of two shifts, anchored on `self`'s day.
    pub fn intersect(&self, other: &Shift) -> Option<Shift> {
        let theirs = other.on_day(self.interval.begin());
        self.interval
            .intersect(&theirs)
            .map(|interval| Shift { interval })
    }
}

// ── ShiftTable ────────────────────────────────────────────────────────────────

/// Per-site shift lists for one staff member.
///
/// Each site's list is kept sorted by clock time of the shift start.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShiftTable {
    sites: BTreeMap<SiteId, Vec<Shift>>,
}

impl ShiftTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `shift` at `site`.  Tables only ever grow.
    pub fn add(&mut self, site: SiteId, shift: Shift) {
        let list = self.sites.entry(site).or_default();
        let key = shift.interval.begin().time_of_day();
        let at = list.partition_point(|s| s.interval.begin().time_of_day() <= key);
        list.insert(at, shift);
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, site: SiteId, shift: Shift) -> Self {
        self.add(site, shift);
        self
    }

    /// Shifts at `site` (empty if the resource never works there).
    pub fn shifts(&self, site: SiteId) -> &[Shift] {
        self.sites.get(&site).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sites with at least one shift, ascending.
    pub fn sites(&self) -> impl Iterator<Item = SiteId> + '_ {
        self.sites.keys().copied()
    }

    pub fn works_at(&self, site: SiteId) -> bool {
        !self.shifts(site).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// `true` iff some shift at `site` hosts `interval` on its day.
    pub fn is_working(&self, interval: &Interval, site: SiteId) -> bool {
        self.shifts(site).iter().any(|s| s.hosts(interval))
    }

    /// The earliest interval as long as `interval`, starting at or after
    /// `interval.begin()`, that some shift at `site` can host.
    ///
    /// Returns `None` if there is no shift at `site` or every shift there is
    /// shorter than `interval`.
    pub fn first_available(&self, interval: &Interval, site: SiteId) -> Option<Interval> {
        let len = interval.duration();
        self.shifts(site)
            .iter()
            .filter_map(|s| s.earliest_start(interval.begin(), len))
            .min()
            .map(|begin| Interval::starting_at(begin, len))
    }

    /// Times at which both tables' owners are on shift at the same site.
    ///
    /// Sites missing from either table are dropped, as are sites whose
    /// pairwise intersections are all empty.
    pub fn intersect(&self, other: &ShiftTable) -> ShiftTable {
        let mut out = ShiftTable::new();
        for (site, mine) in &self.sites {
            let Some(theirs) = other.sites.get(site) else {
                continue;
            };
            for a in mine {
                for b in theirs {
                    if let Some(common) = a.intersect(b) {
                        out.add(*site, common);
                    }
                }
            }
        }
        out
    }
}
