//! Builder for [`ResourceStore`].
//!
//! # Usage
//!
//! ```rust
//! use hs_calendar::{Shift, ShiftTable};
//! use hs_core::{KindId, SiteId};
//! use hs_ops::ResourceStoreBuilder;
//!
//! const NURSE: KindId = KindId(0);
//! const ANALYZER: KindId = KindId(1);
//! const LAB: SiteId = SiteId(0);
//!
//! let mut builder = ResourceStoreBuilder::new();
//! let shifts = ShiftTable::new().with(LAB, Shift::daily((13, 0), (18, 0)).unwrap());
//! let nurse = builder.add_staff("Ines", NURSE, shifts);
//! let analyzer = builder.add_equipment("Analyzer A", ANALYZER, LAB);
//! let store = builder.build();
//!
//! assert_eq!(store.candidates(NURSE, LAB), vec![nurse]);
//! assert_eq!(store.candidates(ANALYZER, LAB), vec![analyzer]);
//! ```

use std::collections::BTreeMap;

use hs_calendar::ShiftTable;
use hs_core::{KindId, ResourceId, SiteId};

use crate::resource::{Resource, ResourceRole};
use crate::{OpsError, OpsResult, ResourceStore};

/// Collects resource declarations; ids are assigned in call order.
#[derive(Debug, Default)]
pub struct ResourceStoreBuilder {
    resources: Vec<Resource>,
}

impl ResourceStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, name: impl Into<String>, kind: KindId, role: ResourceRole) -> ResourceId {
        let id = ResourceId(self.resources.len() as u32);
        self.resources.push(Resource::new(id, name.into(), kind, role));
        id
    }

    /// Declare a staff member working `shifts`.
    pub fn add_staff(&mut self, name: impl Into<String>, kind: KindId, shifts: ShiftTable) -> ResourceId {
        self.push(name, kind, ResourceRole::Staff(shifts))
    }

    /// Declare a machine or room located at `site`.
    pub fn add_equipment(&mut self, name: impl Into<String>, kind: KindId, site: SiteId) -> ResourceId {
        self.push(name, kind, ResourceRole::Equipment(site))
    }

    pub fn add_patient(&mut self, name: impl Into<String>, kind: KindId) -> ResourceId {
        self.push(name, kind, ResourceRole::Patient)
    }

    /// Merge loaded shift tables (e.g. from
    /// [`load_shifts_csv`](hs_calendar::load_shifts_csv)) into the declared
    /// staff.
    ///
    /// # Errors
    /// `UnknownResource` for ids never declared, `NotStaff` for ids that are
    /// not staff.  Tables applied before the failing id stay applied.
    pub fn apply_shift_tables(&mut self, tables: &BTreeMap<ResourceId, ShiftTable>) -> OpsResult<()> {
        for (&id, loaded) in tables {
            let resource = self
                .resources
                .get_mut(id.index())
                .ok_or(OpsError::UnknownResource(id))?;
            let ResourceRole::Staff(table) = &mut resource.role else {
                return Err(OpsError::NotStaff(id));
            };
            for site in loaded.sites() {
                for shift in loaded.shifts(site) {
                    table.add(site, *shift);
                }
            }
        }
        Ok(())
    }

    pub fn build(self) -> ResourceStore {
        ResourceStore::from_resources(self.resources)
    }
}
