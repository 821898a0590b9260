//! clinic — a two-site outpatient clinic run on the hs kernel.
//!
//! Four staff members work the shifts in `SHIFTS_CSV`, three machines sit at
//! fixed sites, and eight patients receive blood panels, x-rays, and
//! infusions ordered every morning.  Pass a JSON config path as the first
//! argument to override `clinic.json`.
//!
//! Logging goes through `tracing`; set `RUST_LOG=debug` to see every booking.

mod orders;

use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use hs_calendar::{ShiftTable, load_shifts_reader};
use hs_core::{Duration, Instant, SimConfig, TaskId};
use hs_ops::{ResourceStoreBuilder, TaskStatus};
use hs_sim::{SimBuilder, SimObserver};

use orders::{
    ANALYZER, ANNEX, MAIN, NURSE, OrderBook, PATIENT, RADIOGRAPHER, XRAY_UNIT,
};

// ── Constants ─────────────────────────────────────────────────────────────────

const SIM_DAYS:      u64   = 7;
const PATIENT_COUNT: usize = 8;

const DEFAULT_CONFIG: &str = include_str!("../clinic.json");

// resource ids follow declaration order in `main`: 0–3 are staff.
const SHIFTS_CSV: &str = "\
resource_id,site_id,begin,end
0,0,08:00,16:00
1,0,12:00,20:00
1,1,07:00,11:00
2,1,08:00,14:00
3,1,13:00,19:00
";

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct ClinicObserver {
    started:   usize,
    completed: usize,
    cancelled: usize,
    stale:     usize,
    last_day:  Option<i64>,
}

impl SimObserver for ClinicObserver {
    fn on_task_transition(&mut self, task: TaskId, _from: TaskStatus, to: TaskStatus, at: Instant) {
        match to {
            TaskStatus::Cancelled => self.cancelled += 1,
            TaskStatus::NeedsResult => self.completed += 1,
            TaskStatus::InProgress => {
                self.started += 1;
                if self.last_day != Some(at.day()) {
                    self.last_day = Some(at.day());
                    tracing::info!(day = at.day(), "first procedure of the day: {task} at {at}");
                }
            }
            _ => {}
        }
    }

    fn on_stale_event(&mut self, _task: TaskId, _at: Instant) {
        self.stale += 1;
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // 1. Config.
    let config: SimConfig = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?
        }
        None => serde_json::from_str(DEFAULT_CONFIG)?,
    };
    println!("=== clinic — hs kernel demo ===");
    println!(
        "Start: {}  |  Days: {SIM_DAYS}  |  Horizon: {} days  |  Seed: {}",
        config.start, config.scheduling_horizon_days, config.seed
    );
    println!();

    // 2. Resources.  Staff start with empty tables; shifts come from CSV.
    let mut builder = ResourceStoreBuilder::new();
    builder.add_staff("Ines (nurse)", NURSE, ShiftTable::new());
    builder.add_staff("Tomas (nurse)", NURSE, ShiftTable::new());
    builder.add_staff("Aiko (radiographer)", RADIOGRAPHER, ShiftTable::new());
    builder.add_staff("Sam (radiographer)", RADIOGRAPHER, ShiftTable::new());
    builder.add_equipment("Analyzer A", ANALYZER, MAIN);
    builder.add_equipment("Analyzer B", ANALYZER, MAIN);
    builder.add_equipment("X-ray 1", XRAY_UNIT, ANNEX);
    let patients: Vec<_> = (0..PATIENT_COUNT)
        .map(|i| builder.add_patient(format!("P-{:03}", i + 1), PATIENT))
        .collect();

    let shifts = load_shifts_reader(Cursor::new(SHIFTS_CSV))?;
    builder.apply_shift_tables(&shifts)?;
    let store = builder.build();
    println!("Resources: {} ({} patients)", store.len(), patients.len());

    // 3. Sim and daily planner hooks.
    let mut sim = SimBuilder::new(config.clone(), store).build()?;
    let book = Rc::new(RefCell::new(OrderBook::new(
        config.seed,
        patients,
        sim.event_sink(),
    )));

    let b = Rc::clone(&book);
    sim.every_day_at(7, 0, move |ops, now| b.borrow_mut().morning_round(ops, now))?;
    let b = Rc::clone(&book);
    sim.every_day_at(12, 0, move |ops, now| b.borrow_mut().midday_cancellations(ops, now))?;
    let b = Rc::clone(&book);
    sim.every_day_at(18, 30, move |ops, now| b.borrow_mut().evening_results(ops, now))?;

    // 4. Run.
    let mut obs = ClinicObserver::default();
    let t0 = std::time::Instant::now();
    let fired = sim.advance_by(Duration::from_days(SIM_DAYS), &mut obs)?;
    let elapsed = t0.elapsed();

    // 5. Summary.
    println!("Simulation complete in {:.3} s, {fired} events fired", elapsed.as_secs_f64());
    println!(
        "  started {}  |  completed {}  |  cancelled {}  |  stale events {}  |  unplaceable orders {}",
        obs.started,
        obs.completed,
        obs.cancelled,
        obs.stale,
        book.borrow().unplaceable
    );
    println!();

    println!("{:<14} {:>6}", "Status", "Tasks");
    println!("{}", "-".repeat(21));
    for status in TaskStatus::ALL {
        println!("{:<14} {:>6}", status.to_string(), sim.ops().tasks_with_status(status).len());
    }
    println!();

    println!("{:<22} {:>8} {:>10}", "Resource", "Bookings", "Booked");
    println!("{}", "-".repeat(42));
    for r in sim.ops().resources().iter() {
        let booked = r
            .schedule()
            .booked_items()
            .fold(Duration::ZERO, |acc, b| acc + b.interval.duration());
        println!("{:<22} {:>8} {:>10}", r.name(), r.schedule().len(), booked.to_string());
    }

    Ok(())
}
