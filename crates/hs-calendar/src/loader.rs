//! CSV shift-table loader.
//!
//! # CSV format
//!
//! One row per shift.  Clock times are `HH:MM`; `24:00` is accepted as an end
//! meaning "until midnight".
//!
//! ```csv
//! resource_id,site_id,begin,end
//! 0,0,09:00,17:00
//! 0,1,18:00,22:00
//! 1,0,13:00,18:00
//! ```
//!
//! Resources absent from the CSV get no entry in the returned map; the caller
//! decides whether that means "not staff" or "never on shift".

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use hs_core::{ResourceId, SiteId};

use crate::{CalendarError, Shift, ShiftTable};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ShiftRecord {
    resource_id: u32,
    site_id:     u16,
    begin:       String,
    end:         String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load per-resource `ShiftTable`s from a CSV file.
pub fn load_shifts_csv(path: &Path) -> Result<BTreeMap<ResourceId, ShiftTable>, CalendarError> {
    let file = std::fs::File::open(path).map_err(CalendarError::Io)?;
    load_shifts_reader(file)
}

/// Like [`load_shifts_csv`] but accepts any `Read` source.
pub fn load_shifts_reader<R: Read>(
    reader: R,
) -> Result<BTreeMap<ResourceId, ShiftTable>, CalendarError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut tables: BTreeMap<ResourceId, ShiftTable> = BTreeMap::new();
    let mut rows = 0usize;

    for result in csv_reader.deserialize::<ShiftRecord>() {
        let row = result.map_err(|e| CalendarError::Parse(e.to_string()))?;
        let shift = Shift::daily(parse_clock(&row.begin)?, parse_clock(&row.end)?)?;
        tables
            .entry(ResourceId(row.resource_id))
            .or_default()
            .add(SiteId(row.site_id), shift);
        rows += 1;
    }

    tracing::debug!(rows, resources = tables.len(), "loaded shift tables");
    Ok(tables)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_clock(s: &str) -> Result<(u32, u32), CalendarError> {
    let bad = || CalendarError::Parse(format!("invalid clock time {s:?}: expected HH:MM"));
    let (h, m) = s.trim().split_once(':').ok_or_else(bad)?;
    let hour = h.parse::<u32>().map_err(|_| bad())?;
    let minute = m.parse::<u32>().map_err(|_| bad())?;
    Ok((hour, minute))
}
