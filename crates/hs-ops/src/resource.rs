//! Bookable resources and the arena that owns them.
//!
//! Every resource owns exactly one [`Schedule`].  Staff members additionally
//! own a [`ShiftTable`]; equipment is pinned to one site; patients are
//! available wherever the task takes place.
//!
//! `ResourceStore` hands out shared references only.  The single mutation
//! path for a `Schedule` is [`ResourceStore::schedule_mut`], which is
//! crate-private and used by the scheduler's commit and release functions.

use hs_calendar::{Schedule, Shift, ShiftTable};
use hs_core::{Interval, KindId, ResourceId, SiteId};
use rustc_hash::FxHashMap;

use crate::{OpsError, OpsResult};

// ── Resource ──────────────────────────────────────────────────────────────────

/// What kind of availability rules a resource follows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceRole {
    /// Works the shifts in its table, per site.
    Staff(ShiftTable),
    /// Fixed at one site, usable around the clock.
    Equipment(SiteId),
    /// Goes wherever it is booked.
    Patient,
}

#[derive(Clone, Debug)]
pub struct Resource {
    pub(crate) id:       ResourceId,
    pub(crate) name:     String,
    pub(crate) kind:     KindId,
    pub(crate) role:     ResourceRole,
    pub(crate) schedule: Schedule,
}

impl Resource {
    pub(crate) fn new(id: ResourceId, name: String, kind: KindId, role: ResourceRole) -> Self {
        Self { id, name, kind, role, schedule: Schedule::new() }
    }

    #[inline]
    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> KindId {
        self.kind
    }

    pub fn role(&self) -> &ResourceRole {
        &self.role
    }

    /// The shift table, for staff only.
    pub fn shifts(&self) -> Option<&ShiftTable> {
        match &self.role {
            ResourceRole::Staff(table) => Some(table),
            _ => None,
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self.role, ResourceRole::Staff(_))
    }

    /// `true` if this resource can take part in a task at `site` at all.
    pub fn available_at(&self, site: SiteId) -> bool {
        match &self.role {
            ResourceRole::Staff(table) => table.works_at(site),
            ResourceRole::Equipment(at) => *at == site,
            ResourceRole::Patient => true,
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }
}

// ── ResourceStore ─────────────────────────────────────────────────────────────

/// Arena of all resources, indexed by [`ResourceId`].
///
/// Ids are assigned densely in declaration order, and that order is the
/// tie-break the scheduler uses between equally early combinations.
#[derive(Clone, Debug, Default)]
pub struct ResourceStore {
    resources: Vec<Resource>,
    by_kind:   FxHashMap<KindId, Vec<ResourceId>>,
}

impl ResourceStore {
    pub(crate) fn from_resources(resources: Vec<Resource>) -> Self {
        let mut by_kind: FxHashMap<KindId, Vec<ResourceId>> = FxHashMap::default();
        for r in &resources {
            by_kind.entry(r.kind).or_default().push(r.id);
        }
        Self { resources, by_kind }
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> + '_ {
        self.resources.iter()
    }

    pub fn get(&self, id: ResourceId) -> OpsResult<&Resource> {
        self.resources.get(id.index()).ok_or(OpsError::UnknownResource(id))
    }

    /// Read-only view of `id`'s bookings.
    pub fn schedule(&self, id: ResourceId) -> OpsResult<&Schedule> {
        self.get(id).map(Resource::schedule)
    }

    pub(crate) fn schedule_mut(&mut self, id: ResourceId) -> OpsResult<&mut Schedule> {
        self.resources
            .get_mut(id.index())
            .map(|r| &mut r.schedule)
            .ok_or(OpsError::UnknownResource(id))
    }

    /// Resources of `kind` usable at `site`, in declaration order.
    pub fn candidates(&self, kind: KindId, site: SiteId) -> Vec<ResourceId> {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .copied()
            .filter(|&id| self.resources[id.index()].available_at(site))
            .collect()
    }

    /// Give staff member `id` an extra shift at `site`.
    ///
    /// # Errors
    /// `NotStaff` for equipment and patients.
    pub fn add_shift(&mut self, id: ResourceId, site: SiteId, shift: Shift) -> OpsResult<()> {
        let resource = self
            .resources
            .get_mut(id.index())
            .ok_or(OpsError::UnknownResource(id))?;
        match &mut resource.role {
            ResourceRole::Staff(table) => {
                table.add(site, shift);
                Ok(())
            }
            _ => Err(OpsError::NotStaff(id)),
        }
    }

    /// Unbooked gaps of `id` inside `within`.  Shifts are not consulted.
    pub fn free_windows(&self, id: ResourceId, within: &Interval) -> OpsResult<Vec<Interval>> {
        Ok(self.schedule(id)?.free_windows(within))
    }
}
