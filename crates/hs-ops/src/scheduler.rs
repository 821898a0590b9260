//! Earliest-fit multi-resource scheduler.
//!
//! # Algorithm
//!
//! 1. Every required kind gets a pool of candidates usable at the site, in
//!    declaration order, minus the specifically requested resources.
//! 2. Combinations assign one distinct candidate per kind slot.  Repeated
//!    kinds take strictly increasing pool positions, so `{nurse, nurse}`
//!    yields each pair once.  They are generated one at a time during the
//!    search, never collected.
//! 3. For one combination, the staff shift tables are intersected and the
//!    search alternates two moves until both agree:
//!    - `first_available` pushes the window into the next shared shift;
//!    - a booking conflict pushes it to the end of the latest conflicting
//!      booking over all resources in the combination.
//!    The window only ever moves forward, and gives up once its begin passes
//!    the deadline.
//! 4. The winner is the strictly earliest begin; each later combination only
//!    searches up to just before the current best, so ties keep the earlier
//!    combination.
//!
//! Booking is a separate step ([`Scheduler::commit`]) that either books every
//! resource or none.

use std::ops::ControlFlow;

use hs_calendar::{BookedItem, CalendarError, ShiftTable};
use hs_core::{Duration, Instant, Interval, KindId, ResourceId, SimConfig, SiteId, TaskId};
use rustc_hash::FxHashMap;

use crate::{OpsError, OpsResult, ResourceStore};

// ── SchedulingRequest ─────────────────────────────────────────────────────────

/// What a task needs: how long, where, and with which resources.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchedulingRequest {
    pub duration: Duration,
    pub site:     SiteId,
    /// One entry per required resource; repeat a kind to need several.
    pub kinds:    Vec<KindId>,
    pub specific: Vec<ResourceId>,
}

impl SchedulingRequest {
    pub fn new(duration: Duration, site: SiteId) -> Self {
        Self { duration, site, kinds: Vec::new(), specific: Vec::new() }
    }

    /// Require one more resource of `kind`.
    pub fn needs(mut self, kind: KindId) -> Self {
        self.kinds.push(kind);
        self
    }

    /// Require exactly `resource`.
    pub fn with(mut self, resource: ResourceId) -> Self {
        self.specific.push(resource);
        self
    }

    /// Reject requests that can never be satisfied for structural reasons.
    pub fn validate(&self) -> OpsResult<()> {
        if self.duration.is_zero() {
            return Err(OpsError::InvalidArgument("task duration must be positive".into()));
        }
        if self.kinds.is_empty() && self.specific.is_empty() {
            return Err(OpsError::InvalidArgument("request names no resources".into()));
        }
        for (i, r) in self.specific.iter().enumerate() {
            if self.specific[..i].contains(r) {
                return Err(OpsError::InvalidArgument(format!("{r} requested twice")));
            }
        }
        Ok(())
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// Finds slots and books them.  Holds no state besides its search horizon.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Scheduler {
    horizon: Duration,
}

impl Scheduler {
    /// A scheduler that looks at most `horizon` past the requested start.
    pub fn new(horizon: Duration) -> Self {
        Self { horizon }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.scheduling_horizon())
    }

    #[inline]
    pub fn horizon(&self) -> Duration {
        self.horizon
    }

    /// The earliest interval at or after `not_before` that satisfies
    /// `request`, with the resources to book (specific resources first, then
    /// one per kind slot).  Nothing is booked.
    ///
    /// # Errors
    /// - `InvalidArgument` / `UnknownResource` for malformed requests;
    /// - `Scheduling` if no combination has room within the horizon.
    pub fn find_slot(
        &self,
        store: &ResourceStore,
        request: &SchedulingRequest,
        not_before: Instant,
    ) -> OpsResult<(Interval, Vec<ResourceId>)> {
        request.validate()?;
        let site = request.site;

        for &id in &request.specific {
            if !store.get(id)?.available_at(site) {
                return Err(OpsError::Scheduling(format!("{id} is not available at {site}")));
            }
        }

        let mut pools = Vec::with_capacity(request.kinds.len());
        for &kind in &request.kinds {
            let pool: Vec<ResourceId> = store
                .candidates(kind, site)
                .into_iter()
                .filter(|id| !request.specific.contains(id))
                .collect();
            if pool.is_empty() {
                return Err(OpsError::Scheduling(format!("no {kind} available at {site}")));
            }
            pools.push(pool);
        }

        let mut deadline = not_before + self.horizon;
        let mut best: Option<(Interval, Vec<ResourceId>)> = None;
        let mut resources: Vec<ResourceId> = Vec::with_capacity(request.specific.len() + request.kinds.len());
        let mut visited = 0usize;
        let mut visit = |combo: &[ResourceId]| -> OpsResult<ControlFlow<()>> {
            visited += 1;
            resources.clear();
            resources.extend_from_slice(&request.specific);
            resources.extend_from_slice(combo);
            let Some(slot) =
                earliest_fit(store, &resources, site, request.duration, not_before, deadline)?
            else {
                return Ok(ControlFlow::Continue(()));
            };
            tracing::trace!(%slot, ?resources, "candidate combination");
            deadline = slot.begin() - Duration::from_millis(1);
            best = Some((slot, resources.clone()));
            Ok(if slot.begin() == not_before {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            })
        };
        for_each_combination(&request.kinds, &pools, &mut visit)?;

        if visited == 0 {
            return Err(OpsError::Scheduling(format!(
                "not enough distinct resources at {site} for {} kind slots",
                request.kinds.len()
            )));
        }

        best.ok_or_else(|| {
            OpsError::Scheduling(format!(
                "no free {} slot at {site} within {} of {not_before}",
                request.duration, self.horizon
            ))
        })
    }

    /// Book `interval` for `task` in every schedule of `resources`.
    ///
    /// All schedules are checked before any is touched; if one still refuses
    /// the booking, the ones already written are rolled back.
    pub(crate) fn commit(
        store: &mut ResourceStore,
        task: TaskId,
        interval: Interval,
        resources: &[ResourceId],
    ) -> OpsResult<()> {
        let item = BookedItem::new(interval, task);
        for &id in resources {
            if let Some(existing) = store.schedule(id)?.conflicts(&interval).first() {
                return Err(CalendarError::Conflict {
                    task,
                    interval,
                    existing: existing.task,
                }
                .into());
            }
        }
        for (i, &id) in resources.iter().enumerate() {
            if let Err(e) = store.schedule_mut(id).and_then(|s| Ok(s.add(item)?)) {
                for &done in &resources[..i] {
                    if let Ok(s) = store.schedule_mut(done) {
                        s.remove(&item);
                    }
                }
                return Err(e);
            }
            tracing::debug!(resource = %id, %task, %interval, "booked");
        }
        Ok(())
    }

    /// Remove `task`'s booking of `interval` from every schedule of
    /// `resources`.  Returns how many bookings were removed.
    pub(crate) fn release(
        store: &mut ResourceStore,
        task: TaskId,
        interval: Interval,
        resources: &[ResourceId],
    ) -> OpsResult<usize> {
        let item = BookedItem::new(interval, task);
        let mut removed = 0;
        for &id in resources {
            if store.schedule_mut(id)?.remove(&item) {
                tracing::debug!(resource = %id, %task, %interval, "unbooked");
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// Hand every assignment of one pool member per kind slot to `visit`, in
/// declaration order, one at a time.  Stops as soon as `visit` breaks or
/// fails.
fn for_each_combination<F>(
    kinds: &[KindId],
    pools: &[Vec<ResourceId>],
    visit: &mut F,
) -> OpsResult<()>
where
    F: FnMut(&[ResourceId]) -> OpsResult<ControlFlow<()>>,
{
    fn walk<F>(
        slot: usize,
        kinds: &[KindId],
        pools: &[Vec<ResourceId>],
        last_pos: &mut FxHashMap<KindId, usize>,
        current: &mut Vec<ResourceId>,
        visit: &mut F,
    ) -> OpsResult<ControlFlow<()>>
    where
        F: FnMut(&[ResourceId]) -> OpsResult<ControlFlow<()>>,
    {
        if slot == kinds.len() {
            return visit(current.as_slice());
        }
        let kind = kinds[slot];
        let prev = last_pos.get(&kind).copied();
        let start = prev.map_or(0, |p| p + 1);
        let mut flow = ControlFlow::Continue(());
        for pos in start..pools[slot].len() {
            let candidate = pools[slot][pos];
            if current.contains(&candidate) {
                continue;
            }
            last_pos.insert(kind, pos);
            current.push(candidate);
            flow = walk(slot + 1, kinds, pools, last_pos, current, visit)?;
            current.pop();
            if flow.is_break() {
                break;
            }
        }
        match prev {
            Some(p) => last_pos.insert(kind, p),
            None => last_pos.remove(&kind),
        };
        Ok(flow)
    }

    let mut current = Vec::with_capacity(kinds.len());
    walk(0, kinds, pools, &mut FxHashMap::default(), &mut current, visit)?;
    Ok(())
}

/// Earliest slot of `duration` starting in `[not_before, deadline]` where
/// every resource in `resources` is on shift (staff) and unbooked.
fn earliest_fit(
    store: &ResourceStore,
    resources: &[ResourceId],
    site: SiteId,
    duration: Duration,
    not_before: Instant,
    deadline: Instant,
) -> OpsResult<Option<Interval>> {
    let mut shared: Option<ShiftTable> = None;
    for &id in resources {
        if let Some(table) = store.get(id)?.shifts() {
            shared = Some(match shared {
                None => table.clone(),
                Some(acc) => acc.intersect(table),
            });
        }
    }

    let mut from = not_before;
    loop {
        let window = Interval::starting_at(from, duration);
        let slot = match &shared {
            Some(table) => match table.first_available(&window, site) {
                Some(slot) => slot,
                None => return Ok(None),
            },
            None => window,
        };
        if slot.begin() > deadline {
            return Ok(None);
        }

        let mut blocked_until: Option<Instant> = None;
        for &id in resources {
            for conflict in store.schedule(id)?.conflicts(&slot) {
                let end = conflict.interval.end();
                blocked_until = Some(blocked_until.map_or(end, |b| b.max(end)));
            }
        }
        match blocked_until {
            None => return Ok(Some(slot)),
            Some(next) => from = next,
        }
    }
}
