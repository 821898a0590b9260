//! Synthetic order book: what the clinic is asked to do each day.
//!
//! The kernel decides *when* and *with whom*; this planner decides *what*.
//! It runs from three daily hooks:
//!
//! | Time  | Round                  | Effect                                      |
//! |-------|------------------------|---------------------------------------------|
//! | 07:00 | `morning_round`        | redo cancelled tasks, then place new orders |
//! | 12:00 | `midday_cancellations` | patients cancel some future appointments    |
//! | 18:30 | `evening_results`      | results arrive for finished work            |

use std::collections::HashMap;

use hs_core::{Duration, Instant, KindId, ResourceId, ResultKind, SimRng, SiteId, TaskId};
use hs_ops::{
    OpsError, OpsResult, Operations, SchedulingRequest, TaskCategory, TaskResult, TaskStatus,
};
use hs_sim::EventSink;

// ── Vocabulary ────────────────────────────────────────────────────────────────

pub const MAIN:  SiteId = SiteId(0);
pub const ANNEX: SiteId = SiteId(1);

pub const NURSE:        KindId = KindId(0);
pub const RADIOGRAPHER: KindId = KindId(1);
pub const ANALYZER:     KindId = KindId(2);
pub const XRAY_UNIT:    KindId = KindId(3);
pub const PATIENT:      KindId = KindId(4);

pub const BLOOD_PANEL:     ResultKind = ResultKind(0);
pub const XRAY_IMAGE:      ResultKind = ResultKind(1);
pub const INFUSION_REPORT: ResultKind = ResultKind(2);

/// One orderable procedure.
pub struct Procedure {
    pub name:     &'static str,
    pub category: TaskCategory,
    pub minutes:  u64,
    pub site:     SiteId,
    pub kinds:    &'static [KindId],
    pub result:   ResultKind,
}

pub static CATALOG: [Procedure; 3] = [
    Procedure {
        name:     "blood panel",
        category: TaskCategory::Test,
        minutes:  30,
        site:     MAIN,
        kinds:    &[NURSE, ANALYZER],
        result:   BLOOD_PANEL,
    },
    Procedure {
        name:     "chest x-ray",
        category: TaskCategory::Test,
        minutes:  20,
        site:     ANNEX,
        kinds:    &[RADIOGRAPHER, XRAY_UNIT],
        result:   XRAY_IMAGE,
    },
    Procedure {
        name:     "iron infusion",
        category: TaskCategory::Treatment,
        minutes:  90,
        site:     MAIN,
        kinds:    &[NURSE],
        result:   INFUSION_REPORT,
    },
];

// ── OrderBook ─────────────────────────────────────────────────────────────────

/// RNG stream numbers, one per randomised round.
const ORDER_STREAM:  u64 = 1;
const CANCEL_STREAM: u64 = 2;

pub struct OrderBook {
    orders:   SimRng,
    cancels:  SimRng,
    patients: Vec<ResourceId>,
    sink:     EventSink,
    /// Every order ever placed, for re-planning after a lost redo.
    requests: HashMap<TaskId, SchedulingRequest>,
    pub unplaceable: usize,
}

impl OrderBook {
    pub fn new(seed: u64, patients: Vec<ResourceId>, sink: EventSink) -> Self {
        Self {
            orders: SimRng::stream(seed, ORDER_STREAM),
            cancels: SimRng::stream(seed, CANCEL_STREAM),
            patients,
            sink,
            requests: HashMap::new(),
            unplaceable: 0,
        }
    }

    pub fn morning_round(&mut self, ops: &mut Operations, now: Instant) -> OpsResult<()> {
        for task in ops.tasks_with_status(TaskStatus::Cancelled) {
            match ops.redo(task, now) {
                Ok(booking) => self.sink.queue_start(task, &booking),
                Err(OpsError::Rescheduling { reason, .. }) => {
                    tracing::info!(%task, %reason, "redo lost its slot, planning afresh");
                    self.plan(ops, task, now)?;
                }
                Err(e) => return Err(e),
            }
        }

        let count = self.orders.gen_range(3..=6usize);
        for _ in 0..count {
            let procedure = &CATALOG[self.orders.gen_range(0..CATALOG.len())];
            let Some(&patient) = self.orders.choose(&self.patients) else {
                break;
            };
            let mut request =
                SchedulingRequest::new(Duration::from_minutes(procedure.minutes), procedure.site)
                    .with(patient);
            for &kind in procedure.kinds {
                request = request.needs(kind);
            }
            let task = ops.add_task(procedure.name, procedure.category, procedure.result);
            self.requests.insert(task, request);
            self.plan(ops, task, now)?;
        }
        Ok(())
    }

    fn plan(&mut self, ops: &mut Operations, task: TaskId, now: Instant) -> OpsResult<()> {
        let Some(request) = self.requests.get(&task) else {
            return Ok(());
        };
        match ops.schedule(task, request, now) {
            Ok(booking) => self.sink.queue_start(task, &booking),
            Err(OpsError::Scheduling(reason)) => {
                tracing::warn!(%task, %reason, "order could not be placed");
                self.unplaceable += 1;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Each appointment that has not begun yet is cancelled with small
    /// probability.
    pub fn midday_cancellations(&mut self, ops: &mut Operations, now: Instant) -> OpsResult<()> {
        for task in ops.tasks_with_status(TaskStatus::Planned) {
            let begins = ops.task(task)?.booking().map(|b| b.interval.begin());
            if begins.is_some_and(|b| b > now) && self.cancels.gen_bool(0.1) {
                ops.cancel(task)?;
            }
        }
        Ok(())
    }

    pub fn evening_results(&mut self, ops: &mut Operations, _now: Instant) -> OpsResult<()> {
        for task in ops.tasks_with_status(TaskStatus::NeedsResult) {
            let t = ops.task(task)?;
            let result = TaskResult::new(t.expected_result, format!("{} reviewed", t.name));
            ops.set_result(task, result)?;
        }
        Ok(())
    }
}
