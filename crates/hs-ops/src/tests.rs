//! Unit and property tests for hs-ops.

use hs_calendar::{BookedItem, Shift, ShiftTable};
use hs_core::{Duration, Instant, Interval, KindId, ResourceId, ResultKind, SiteId, TaskId};

use crate::{
    OpsError, Operation, Operations, ResourceStoreBuilder, Scheduler, SchedulingRequest,
    TaskCategory, TaskResult, TaskStatus, Transition,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const NURSE: KindId = KindId(0);
const ANALYZER: KindId = KindId(1);
const PATIENT: KindId = KindId(2);

const BLOOD_PANEL: ResultKind = ResultKind(0);
const XRAY: ResultKind = ResultKind(1);

const LAB: SiteId = SiteId(0);
const WARD: SiteId = SiteId(1);

fn at(day: i64, hour: u32, minute: u32) -> Instant {
    Instant::from_dhm(day, hour, minute).unwrap()
}

fn iv(begin: Instant, end: Instant) -> Interval {
    Interval::new(begin, end).unwrap()
}

fn mins(m: u64) -> Duration {
    Duration::from_minutes(m)
}

fn shifts(site: SiteId, begin: (u32, u32), end: (u32, u32)) -> ShiftTable {
    ShiftTable::new().with(site, Shift::daily(begin, end).unwrap())
}

fn ops_with(builder: ResourceStoreBuilder) -> Operations {
    Operations::new(builder.build(), Scheduler::new(Duration::from_days(30)))
}

fn blood_test(ops: &mut Operations) -> TaskId {
    ops.add_task("blood test", TaskCategory::Test, BLOOD_PANEL)
}

fn bookings(ops: &Operations, id: ResourceId) -> Vec<BookedItem> {
    ops.resources().schedule(id).unwrap().booked_items().collect()
}

/// Nurse on shift 13:00–18:00 at the lab, one analyzer there, one patient.
struct Lab {
    ops:      Operations,
    nurse:    ResourceId,
    analyzer: ResourceId,
    patient:  ResourceId,
}

fn lab() -> Lab {
    let mut b = ResourceStoreBuilder::new();
    let nurse = b.add_staff("Ines", NURSE, shifts(LAB, (13, 0), (18, 0)));
    let analyzer = b.add_equipment("Analyzer A", ANALYZER, LAB);
    let patient = b.add_patient("P-001", PATIENT);
    Lab { ops: ops_with(b), nurse, analyzer, patient }
}

// ── Resources ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod resources {
    use std::collections::BTreeMap;
    use std::io::Cursor;

    use super::*;
    use crate::ResourceRole;

    #[test]
    fn candidates_follow_declaration_order_and_site() {
        let mut b = ResourceStoreBuilder::new();
        let n0 = b.add_staff("A", NURSE, shifts(LAB, (8, 0), (16, 0)));
        let n1 = b.add_staff("B", NURSE, shifts(WARD, (8, 0), (16, 0)));
        let n2 = b.add_staff("C", NURSE, shifts(LAB, (16, 0), (24, 0)));
        let m = b.add_equipment("M", ANALYZER, WARD);
        let store = b.build();
        assert_eq!(store.candidates(NURSE, LAB), vec![n0, n2]);
        assert_eq!(store.candidates(NURSE, WARD), vec![n1]);
        assert_eq!(store.candidates(ANALYZER, LAB), vec![]);
        assert_eq!(store.candidates(ANALYZER, WARD), vec![m]);
        assert_eq!(store.candidates(KindId(99), LAB), vec![]);
    }

    #[test]
    fn patients_are_available_everywhere() {
        let l = lab();
        let patient = l.ops.resources().get(l.patient).unwrap();
        assert!(patient.available_at(LAB));
        assert!(patient.available_at(SiteId(42)));
        assert_eq!(patient.role(), &ResourceRole::Patient);
        assert!(patient.shifts().is_none());
    }

    #[test]
    fn add_shift_only_for_staff() {
        let mut l = lab();
        let evening = Shift::daily((18, 0), (22, 0)).unwrap();
        l.ops.add_shift(l.nurse, WARD, evening).unwrap();
        assert!(l.ops.resources().get(l.nurse).unwrap().available_at(WARD));
        assert!(matches!(
            l.ops.add_shift(l.analyzer, WARD, evening),
            Err(OpsError::NotStaff(id)) if id == l.analyzer
        ));
        assert!(matches!(
            l.ops.add_shift(ResourceId(77), WARD, evening),
            Err(OpsError::UnknownResource(_))
        ));
    }

    #[test]
    fn apply_loaded_shift_tables() {
        let mut b = ResourceStoreBuilder::new();
        let nurse = b.add_staff("Ines", NURSE, ShiftTable::new());
        let analyzer = b.add_equipment("Analyzer A", ANALYZER, LAB);
        let csv = "resource_id,site_id,begin,end\n0,1,07:00,15:00\n";
        let tables = hs_calendar::load_shifts_reader(Cursor::new(csv)).unwrap();
        b.apply_shift_tables(&tables).unwrap();

        let mut bad = BTreeMap::new();
        bad.insert(analyzer, shifts(LAB, (7, 0), (15, 0)));
        assert!(matches!(b.apply_shift_tables(&bad), Err(OpsError::NotStaff(_))));

        let store = b.build();
        assert_eq!(store.candidates(NURSE, WARD), vec![nurse]);
        assert!(store.candidates(NURSE, LAB).is_empty());
    }

    #[test]
    fn free_windows_reflect_bookings() {
        let mut l = lab();
        let t = blood_test(&mut l.ops);
        let req = SchedulingRequest::new(mins(60), LAB).needs(ANALYZER);
        l.ops.schedule(t, &req, at(0, 10, 0)).unwrap();
        let day = iv(at(0, 8, 0), at(0, 12, 0));
        assert_eq!(
            l.ops.free_windows(l.analyzer, &day).unwrap(),
            vec![iv(at(0, 8, 0), at(0, 10, 0)), iv(at(0, 11, 0), at(0, 12, 0))]
        );
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler {
    use super::*;

    #[test]
    fn waits_for_shift_start() {
        let mut b = ResourceStoreBuilder::new();
        b.add_staff("Ines", NURSE, shifts(LAB, (9, 0), (17, 0)));
        let mut ops = ops_with(b);
        let t = blood_test(&mut ops);
        let req = SchedulingRequest::new(mins(30), LAB).needs(NURSE);
        let booking = ops.schedule(t, &req, at(0, 8, 50)).unwrap();
        assert_eq!(booking.interval, iv(at(0, 9, 0), at(0, 9, 30)));
    }

    #[test]
    fn skips_past_equipment_booking_inside_shift() {
        let mut l = lab();
        let hold = blood_test(&mut l.ops);
        let req = SchedulingRequest::new(mins(60), LAB).needs(ANALYZER);
        l.ops.schedule(hold, &req, at(0, 13, 0)).unwrap();

        let t = blood_test(&mut l.ops);
        let req = SchedulingRequest::new(mins(45), LAB).needs(NURSE).needs(ANALYZER);
        let booking = l.ops.schedule(t, &req, at(0, 0, 0)).unwrap();
        assert_eq!(booking.interval, iv(at(0, 14, 0), at(0, 14, 45)));
        assert_eq!(booking.resources, vec![l.nurse, l.analyzer]);
        assert_eq!(booking.site, LAB);
    }

    #[test]
    fn rolls_over_to_next_day() {
        let mut b = ResourceStoreBuilder::new();
        let nurse = b.add_staff("Ines", NURSE, shifts(LAB, (9, 0), (10, 0)));
        let mut ops = ops_with(b);
        let first = blood_test(&mut ops);
        ops.schedule(first, &SchedulingRequest::new(mins(30), LAB).with(nurse), at(0, 9, 0))
            .unwrap();
        let second = blood_test(&mut ops);
        let booking = ops
            .schedule(second, &SchedulingRequest::new(mins(45), LAB).with(nurse), at(0, 9, 0))
            .unwrap();
        assert_eq!(booking.interval, iv(at(1, 9, 0), at(1, 9, 45)));
    }

    #[test]
    fn staff_must_share_a_shift() {
        let mut b = ResourceStoreBuilder::new();
        let a = b.add_staff("A", NURSE, shifts(LAB, (9, 0), (13, 0)));
        let c = b.add_staff("C", NURSE, shifts(LAB, (11, 0), (17, 0)));
        let mut ops = ops_with(b);
        let t = blood_test(&mut ops);
        let req = SchedulingRequest::new(mins(60), LAB).needs(NURSE).needs(NURSE);
        let booking = ops.schedule(t, &req, at(0, 8, 0)).unwrap();
        assert_eq!(booking.interval, iv(at(0, 11, 0), at(0, 12, 0)));
        assert_eq!(booking.resources, vec![a, c]);
    }

    #[test]
    fn earliest_combination_wins_ties_go_to_declaration_order() {
        let mut b = ResourceStoreBuilder::new();
        let first = b.add_equipment("A", ANALYZER, LAB);
        let second = b.add_equipment("B", ANALYZER, LAB);
        let mut ops = ops_with(b);
        let req = SchedulingRequest::new(mins(60), LAB).needs(ANALYZER);

        let t1 = blood_test(&mut ops);
        assert_eq!(ops.schedule(t1, &req, at(0, 13, 0)).unwrap().resources, vec![first]);
        // `first` is busy until 14:00, `second` is free now.
        let t2 = blood_test(&mut ops);
        let b2 = ops.schedule(t2, &req, at(0, 13, 0)).unwrap();
        assert_eq!(b2.resources, vec![second]);
        assert_eq!(b2.interval.begin(), at(0, 13, 0));
        // Both free again from 14:00.
        let t3 = blood_test(&mut ops);
        let b3 = ops.schedule(t3, &req, at(0, 13, 0)).unwrap();
        assert_eq!(b3.resources, vec![first]);
        assert_eq!(b3.interval.begin(), at(0, 14, 0));
    }

    #[test]
    fn specific_resources_are_not_reused_for_kind_slots() {
        let mut b = ResourceStoreBuilder::new();
        let n0 = b.add_staff("A", NURSE, shifts(LAB, (8, 0), (16, 0)));
        let n1 = b.add_staff("B", NURSE, shifts(LAB, (8, 0), (16, 0)));
        let mut ops = ops_with(b);
        let t = blood_test(&mut ops);
        let req = SchedulingRequest::new(mins(30), LAB).with(n0).needs(NURSE);
        assert_eq!(ops.schedule(t, &req, at(0, 8, 0)).unwrap().resources, vec![n0, n1]);
    }

    #[test]
    fn repeated_kind_needs_distinct_resources() {
        let mut l = lab();
        let t = blood_test(&mut l.ops);
        let req = SchedulingRequest::new(mins(30), LAB).needs(NURSE).needs(NURSE);
        assert!(matches!(l.ops.schedule(t, &req, at(0, 0, 0)), Err(OpsError::Scheduling(_))));
        assert_eq!(l.ops.status(t).unwrap(), TaskStatus::Created);
    }

    #[test]
    fn missing_kind_at_site_fails_without_booking() {
        let mut l = lab();
        let t = blood_test(&mut l.ops);
        let req = SchedulingRequest::new(mins(30), WARD).with(l.patient).needs(NURSE);
        assert!(matches!(l.ops.schedule(t, &req, at(0, 0, 0)), Err(OpsError::Scheduling(_))));
        assert!(bookings(&l.ops, l.patient).is_empty());
    }

    #[test]
    fn specific_resource_elsewhere_is_unschedulable() {
        let mut l = lab();
        let t = blood_test(&mut l.ops);
        let req = SchedulingRequest::new(mins(30), WARD).with(l.analyzer);
        assert!(matches!(l.ops.schedule(t, &req, at(0, 0, 0)), Err(OpsError::Scheduling(_))));
    }

    #[test]
    fn malformed_requests() {
        let mut l = lab();
        let t = blood_test(&mut l.ops);
        let zero = SchedulingRequest::new(Duration::ZERO, LAB).needs(ANALYZER);
        assert!(matches!(l.ops.schedule(t, &zero, at(0, 0, 0)), Err(OpsError::InvalidArgument(_))));
        let twice = SchedulingRequest::new(mins(5), LAB).with(l.analyzer).with(l.analyzer);
        assert!(matches!(l.ops.schedule(t, &twice, at(0, 0, 0)), Err(OpsError::InvalidArgument(_))));
        let empty = SchedulingRequest::new(mins(5), LAB);
        assert!(matches!(l.ops.schedule(t, &empty, at(0, 0, 0)), Err(OpsError::InvalidArgument(_))));
        let ghost = SchedulingRequest::new(mins(5), LAB).with(ResourceId(99));
        assert!(matches!(l.ops.schedule(t, &ghost, at(0, 0, 0)), Err(OpsError::UnknownResource(_))));
        assert!(matches!(
            l.ops.schedule(TaskId(42), &SchedulingRequest::new(mins(5), LAB).needs(ANALYZER), at(0, 0, 0)),
            Err(OpsError::UnknownTask(_))
        ));
    }

    #[test]
    fn search_is_bounded_by_horizon() {
        let mut b = ResourceStoreBuilder::new();
        b.add_equipment("A", ANALYZER, LAB);
        let store = b.build();
        let mut short = Operations::new(store.clone(), Scheduler::new(Duration::from_days(1)));
        let mut long = Operations::new(store, Scheduler::new(Duration::from_days(30)));
        for ops in [&mut short, &mut long] {
            let hold = blood_test(ops);
            let three_days = SchedulingRequest::new(Duration::from_days(3), LAB).needs(ANALYZER);
            ops.schedule(hold, &three_days, at(0, 0, 0)).unwrap();
        }
        let req = SchedulingRequest::new(mins(30), LAB).needs(ANALYZER);
        let t = blood_test(&mut short);
        assert!(matches!(short.schedule(t, &req, at(0, 0, 0)), Err(OpsError::Scheduling(_))));
        let t = blood_test(&mut long);
        assert_eq!(long.schedule(t, &req, at(0, 0, 0)).unwrap().interval.begin(), at(3, 0, 0));
    }

    #[test]
    fn wide_pools_find_the_one_free_trio() {
        let kinds = [KindId(10), KindId(11), KindId(12)];
        let mut b = ResourceStoreBuilder::new();
        let pools: Vec<Vec<ResourceId>> = kinds
            .iter()
            .map(|&k| (0..40).map(|i| b.add_equipment(format!("{k}-{i}"), k, LAB)).collect())
            .collect();
        let mut ops = ops_with(b);

        // Everything but the last member of each pool is busy for the first hour.
        let busy = iv(at(0, 0, 0), at(0, 1, 0));
        for pool in &pools {
            for &id in &pool[..pool.len() - 1] {
                Scheduler::commit(&mut ops.resources, TaskId(999), busy, &[id]).unwrap();
            }
        }

        let t = blood_test(&mut ops);
        let req = SchedulingRequest::new(mins(30), LAB)
            .needs(kinds[0])
            .needs(kinds[1])
            .needs(kinds[2]);
        let booking = ops.schedule(t, &req, at(0, 0, 0)).unwrap();
        assert_eq!(booking.interval.begin(), at(0, 0, 0));
        assert_eq!(booking.resources, vec![pools[0][39], pools[1][39], pools[2][39]]);
    }

    #[test]
    fn commit_is_all_or_nothing() {
        let mut l = lab();
        let hold = blood_test(&mut l.ops);
        l.ops
            .schedule(hold, &SchedulingRequest::new(mins(60), LAB).with(l.nurse), at(0, 13, 0))
            .unwrap();
        let before = bookings(&l.ops, l.analyzer);
        let slot = iv(at(0, 13, 30), at(0, 14, 0));
        let err = Scheduler::commit(&mut l.ops.resources, TaskId(9), slot, &[l.analyzer, l.nurse])
            .unwrap_err();
        assert!(matches!(err, OpsError::Calendar(_)));
        assert_eq!(bookings(&l.ops, l.analyzer), before);
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use super::*;
    use crate::TaskState;

    fn analyzer_request() -> SchedulingRequest {
        SchedulingRequest::new(mins(30), LAB).needs(ANALYZER)
    }

    /// Drive a fresh task into `status` through legal operations.
    fn task_in(ops: &mut Operations, status: TaskStatus) -> TaskId {
        let t = blood_test(ops);
        let path: &[Operation] = match status {
            TaskStatus::Created => &[],
            TaskStatus::Planned => &[Operation::Schedule],
            TaskStatus::Cancelled => &[Operation::Schedule, Operation::Cancel],
            TaskStatus::InProgress => &[Operation::Schedule, Operation::Start],
            TaskStatus::NeedsResult => &[Operation::Schedule, Operation::Start, Operation::Stop],
            TaskStatus::Finished => &[
                Operation::Schedule,
                Operation::Start,
                Operation::Stop,
                Operation::SetResult,
            ],
        };
        for &op in path {
            apply(ops, t, op).unwrap();
        }
        assert_eq!(ops.status(t).unwrap(), status);
        t
    }

    fn apply(ops: &mut Operations, t: TaskId, op: Operation) -> Result<(), OpsError> {
        match op {
            Operation::Schedule => ops.schedule(t, &analyzer_request(), at(0, 0, 0)).map(drop),
            Operation::Cancel => ops.cancel(t).map(drop),
            Operation::Redo => ops.redo(t, at(0, 0, 0)).map(drop),
            Operation::Start => ops.start(t),
            Operation::Stop => ops.stop(t),
            Operation::SetResult => ops.set_result(t, TaskResult::new(BLOOD_PANEL, "normal")),
        }
    }

    #[test]
    fn transition_table() {
        let legal: Vec<(TaskStatus, Operation)> = TaskStatus::ALL
            .iter()
            .flat_map(|&s| Operation::ALL.iter().map(move |&op| (s, op)))
            .filter(|&(s, op)| s.permits(op))
            .collect();
        assert_eq!(
            legal,
            vec![
                (TaskStatus::Created, Operation::Schedule),
                (TaskStatus::Planned, Operation::Cancel),
                (TaskStatus::Planned, Operation::Start),
                (TaskStatus::Cancelled, Operation::Redo),
                (TaskStatus::InProgress, Operation::Stop),
                (TaskStatus::NeedsResult, Operation::SetResult),
            ]
        );
        assert_eq!(TaskStatus::Cancelled.after(Operation::Redo), Some(TaskStatus::Planned));
    }

    #[test]
    fn illegal_operations_change_nothing() {
        let mut ops = lab().ops;
        let analyzer = ResourceId(1);
        for status in TaskStatus::ALL {
            for op in Operation::ALL {
                if status.permits(op) {
                    continue;
                }
                let t = task_in(&mut ops, status);
                let state = ops.task(t).unwrap().state().clone();
                let booked = bookings(&ops, analyzer);
                let err = apply(&mut ops, t, op).unwrap_err();
                assert!(
                    matches!(err, OpsError::IllegalOperation { task, op: o, status: s }
                        if task == t && o == op && s == status),
                    "{status} / {op}: {err}"
                );
                assert_eq!(ops.task(t).unwrap().state(), &state);
                assert_eq!(bookings(&ops, analyzer), booked);
            }
        }
    }

    #[test]
    fn booked_exactly_while_booked_status() {
        let mut ops = lab().ops;
        let analyzer = ResourceId(1);
        for status in TaskStatus::ALL {
            let t = task_in(&mut ops, status);
            let held = bookings(&ops, analyzer).iter().any(|b| b.task == t);
            assert_eq!(held, status.is_booked(), "{status}");
        }
    }

    #[test]
    fn cancel_then_redo_restores_booking() {
        let mut l = lab();
        let t = blood_test(&mut l.ops);
        let req = SchedulingRequest::new(mins(45), LAB).needs(NURSE).needs(ANALYZER);
        let planned = l.ops.schedule(t, &req, at(0, 0, 0)).unwrap();
        let nurse_before = bookings(&l.ops, l.nurse);
        let analyzer_before = bookings(&l.ops, l.analyzer);

        let cancelled = l.ops.cancel(t).unwrap();
        assert_eq!(cancelled, planned);
        assert!(bookings(&l.ops, l.nurse).is_empty());
        assert!(bookings(&l.ops, l.analyzer).is_empty());
        assert_eq!(l.ops.tasks_with_status(TaskStatus::Cancelled), vec![t]);

        let replanned = l.ops.redo(t, at(0, 12, 0)).unwrap();
        assert_eq!(replanned, planned);
        assert_eq!(l.ops.task(t).unwrap().state(), &TaskState::Planned(planned));
        assert_eq!(bookings(&l.ops, l.nurse), nurse_before);
        assert_eq!(bookings(&l.ops, l.analyzer), analyzer_before);
    }

    #[test]
    fn journal_records_changes_only_when_on() {
        let mut l = lab();
        let req = SchedulingRequest::new(mins(30), LAB).needs(ANALYZER);
        let quiet = blood_test(&mut l.ops);
        l.ops.schedule(quiet, &req, at(0, 13, 0)).unwrap();
        assert!(l.ops.take_transitions().is_empty());

        l.ops.record_transitions();
        let t = blood_test(&mut l.ops);
        l.ops.schedule(t, &req, at(0, 13, 0)).unwrap();
        l.ops.cancel(t).unwrap();
        // Illegal: nothing recorded.
        assert!(l.ops.stop(t).is_err());
        assert_eq!(
            l.ops.take_transitions(),
            vec![
                Transition { task: t, from: TaskStatus::Created, to: TaskStatus::Planned },
                Transition { task: t, from: TaskStatus::Planned, to: TaskStatus::Cancelled },
            ]
        );
        assert!(l.ops.take_transitions().is_empty());
    }

    #[test]
    fn redo_into_taken_slot_resets_to_created() {
        let mut l = lab();
        let req = SchedulingRequest::new(mins(60), LAB).needs(ANALYZER);
        let t1 = blood_test(&mut l.ops);
        let original = l.ops.schedule(t1, &req, at(0, 13, 0)).unwrap();
        l.ops.cancel(t1).unwrap();
        let t2 = blood_test(&mut l.ops);
        assert_eq!(l.ops.schedule(t2, &req, at(0, 13, 0)).unwrap().interval, original.interval);

        let err = l.ops.redo(t1, at(0, 0, 0)).unwrap_err();
        assert!(matches!(
            err,
            OpsError::Rescheduling { task, interval, status: TaskStatus::Created, .. }
                if task == t1 && interval == original.interval
        ));
        assert_eq!(l.ops.status(t1).unwrap(), TaskStatus::Created);
        assert!(bookings(&l.ops, l.analyzer).iter().all(|b| b.task == t2));

        // A reset task can be planned afresh.
        let again = l.ops.schedule(t1, &req, at(0, 13, 0)).unwrap();
        assert_eq!(again.interval.begin(), at(0, 14, 0));
    }

    #[test]
    fn redo_after_slot_began_is_rescheduling() {
        let mut l = lab();
        let req = SchedulingRequest::new(mins(60), LAB).needs(ANALYZER);
        let t = blood_test(&mut l.ops);
        l.ops.schedule(t, &req, at(0, 13, 0)).unwrap();
        l.ops.cancel(t).unwrap();
        assert!(matches!(
            l.ops.redo(t, at(0, 13, 30)),
            Err(OpsError::Rescheduling { status: TaskStatus::Created, .. })
        ));
        assert_eq!(l.ops.status(t).unwrap(), TaskStatus::Created);
        assert!(bookings(&l.ops, l.analyzer).is_empty());
    }

    #[test]
    fn wrong_result_kind_keeps_needs_result() {
        let mut l = lab();
        let t = blood_test(&mut l.ops);
        let req = SchedulingRequest::new(mins(30), LAB).with(l.patient).needs(ANALYZER);
        l.ops.schedule(t, &req, at(0, 9, 0)).unwrap();
        l.ops.start(t).unwrap();
        l.ops.stop(t).unwrap();

        let err = l.ops.set_result(t, TaskResult::new(XRAY, "chest")).unwrap_err();
        assert!(matches!(
            err,
            OpsError::ResultMismatch { expected: BLOOD_PANEL, got: XRAY, .. }
        ));
        assert_eq!(l.ops.status(t).unwrap(), TaskStatus::NeedsResult);
        assert!(l.ops.task(t).unwrap().result().is_none());

        l.ops.set_result(t, TaskResult::new(BLOOD_PANEL, "normal")).unwrap();
        let task = l.ops.task(t).unwrap();
        assert_eq!(task.status(), TaskStatus::Finished);
        assert_eq!(task.result().map(|r| r.summary.as_str()), Some("normal"));
        assert_eq!(bookings(&l.ops, l.patient).len(), 1);
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;

    /// Two nurses with overlapping shifts, two analyzers, two patients.
    fn busy_lab() -> (Operations, Vec<ResourceId>) {
        let mut b = ResourceStoreBuilder::new();
        let ids = vec![
            b.add_staff("A", NURSE, shifts(LAB, (8, 0), (14, 0))),
            b.add_staff("B", NURSE, shifts(LAB, (12, 0), (20, 0))),
            b.add_equipment("M1", ANALYZER, LAB),
            b.add_equipment("M2", ANALYZER, LAB),
            b.add_patient("P1", PATIENT),
            b.add_patient("P2", PATIENT),
        ];
        (Operations::new(b.build(), Scheduler::new(Duration::from_days(3))), ids)
    }

    #[derive(Debug, Clone)]
    struct Step {
        minutes:    u64,
        nurses:     usize,
        analyzer:   bool,
        patient:    Option<usize>,
        not_before: i64,
        cancel:     bool,
        redo:       bool,
    }

    fn step() -> impl Strategy<Value = Step> {
        (
            1u64..=8,
            0usize..=2,
            any::<bool>(),
            prop::option::of(0usize..2),
            0i64..(3 * 24 * 4),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(|(q, nurses, analyzer, patient, nb, cancel, redo)| Step {
                minutes: q * 15,
                nurses,
                analyzer,
                patient,
                not_before: nb * 15,
                cancel,
                redo,
            })
    }

    proptest! {
        /// After any mix of schedule / cancel / redo:
        /// - no schedule holds interfering bookings;
        /// - a task is in a schedule iff its status is booked, and then in
        ///   exactly the schedules of its booking's resources.
        #[test]
        fn no_double_booking_and_all_or_nothing(steps in prop::collection::vec(step(), 1..40)) {
            let (mut ops, ids) = busy_lab();
            for s in &steps {
                let mut req = SchedulingRequest::new(mins(s.minutes), LAB);
                for _ in 0..s.nurses {
                    req = req.needs(NURSE);
                }
                if s.analyzer {
                    req = req.needs(ANALYZER);
                }
                if let Some(p) = s.patient {
                    req = req.with(ids[4 + p]);
                }
                let t = blood_test(&mut ops);
                let now = Instant(s.not_before * 60_000);
                match ops.schedule(t, &req, now) {
                    Ok(b) => prop_assert!(b.interval.begin() >= now),
                    Err(OpsError::Scheduling(_) | OpsError::InvalidArgument(_)) => continue,
                    Err(e) => prop_assert!(false, "unexpected error: {e}"),
                }
                if s.cancel {
                    ops.cancel(t).unwrap();
                    if s.redo {
                        match ops.redo(t, now) {
                            Ok(_) | Err(OpsError::Rescheduling { .. }) => {}
                            Err(e) => prop_assert!(false, "unexpected error: {e}"),
                        }
                    }
                }
            }

            for &id in &ids {
                let items = bookings(&ops, id);
                for pair in items.windows(2) {
                    prop_assert!(!pair[0].interval.interferes(&pair[1].interval),
                        "{id}: {} overlaps {}", pair[0].interval, pair[1].interval);
                }
            }
            for task in ops.tasks().iter() {
                let holders: Vec<ResourceId> = ids
                    .iter()
                    .copied()
                    .filter(|&id| bookings(&ops, id).iter().any(|b| b.task == task.id))
                    .collect();
                if task.status().is_booked() {
                    let mut expected = task.booking().unwrap().resources.clone();
                    expected.sort();
                    prop_assert_eq!(holders, expected);
                } else {
                    prop_assert!(holders.is_empty());
                }
            }
        }
    }
}
