//! Generation gate, instance generator, and the per-pattern cycle driver.
//!
//! `should_generate` and `generate_instance` are pure; the only mutation in
//! this module is `run_generation_cycle`, which performs the one atomic unit
//! the engine requires of its caller: gate, compute, materialize, advance
//! tracking. The caller saves the database once afterwards, so the new
//! instance and the advanced tracking fields land together or not at all.
//!
//! Catch-up is deliberate: however long a pattern sat dormant, one cycle
//! advances one occurrence. A pattern that missed five periods catches up
//! over five cycles, never by producing a backlog in one.

use chrono::{Duration, NaiveDate};

use crate::db::Database;
use crate::fields::{PatternStatus, TaskState};
use crate::instance::{Instance, InstanceTask, SubItem};
use crate::pattern::Pattern;
use crate::recurrence::next_occurrence;

/// Reference date the gate evaluates from: the last generated occurrence,
/// or one day before `today` so a brand-new pattern can match same-day.
pub fn gate_reference(pattern: &Pattern, today: NaiveDate) -> NaiveDate {
    pattern
        .last_generated
        .unwrap_or_else(|| today - Duration::days(1))
}

/// Decide whether one instance should be generated now.
///
/// True iff the calculator yields an occurrence from the reference point
/// and that occurrence is due (not after `today`). Side-effect free and
/// idempotent; tracking state is advanced only by `run_generation_cycle`.
pub fn should_generate(pattern: &Pattern, today: NaiveDate) -> bool {
    if pattern.status == PatternStatus::Paused || pattern.count_exhausted() {
        return false;
    }
    match next_occurrence(pattern, gate_reference(pattern, today)) {
        Some(due) => due <= today,
        None => false,
    }
}

/// Materialize one dated obligation from a pattern.
///
/// Deterministic: the id, due date, and timestamp all come from the caller.
/// The checklist is deep-copied by value; every task starts `NotStarted`
/// with all sub-items not completed, whatever the template history.
pub fn generate_instance(pattern: &Pattern, due: NaiveDate, id: u64, now_utc: i64) -> Instance {
    let tasks = pattern
        .checklist
        .iter()
        .map(|t| InstanceTask {
            title: t.title.clone(),
            scope: t.scope.clone(),
            order: t.order,
            state: TaskState::NotStarted,
            subitems: t
                .subitems
                .iter()
                .map(|s| SubItem { text: s.clone(), completed: false })
                .collect(),
        })
        .collect();

    Instance {
        id,
        title: pattern.title.clone(),
        stakeholder: pattern.stakeholder.clone(),
        goal: pattern.goal.clone(),
        due,
        time_of_day: pattern.time_of_day,
        timezone: pattern.timezone.clone(),
        notes: pattern.notes.clone(),
        pattern_id: Some(pattern.id),
        done: false,
        tasks,
        created_at_utc: now_utc,
    }
}

/// Run one gate → compute → generate → advance-tracking cycle for a single
/// pattern. Returns the new instance's id, or `None` when nothing was due.
///
/// Mutates the in-memory database only; persisting the result in one write
/// is the caller's job.
pub fn run_generation_cycle(
    db: &mut Database,
    pattern_id: u64,
    today: NaiveDate,
    now_utc: i64,
) -> Option<u64> {
    let pattern = db.get_pattern(pattern_id)?;
    if !should_generate(pattern, today) {
        return None;
    }
    let due = next_occurrence(pattern, gate_reference(pattern, today))?;
    let instance_id = db.next_instance_id();
    let instance = generate_instance(pattern, due, instance_id, now_utc);
    db.instances.push(instance);

    let pattern = db.get_pattern_mut(pattern_id)?;
    pattern.last_generated = Some(due);
    pattern.generated_count += 1;
    pattern.updated_at_utc = now_utc;
    Some(instance_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{sample_pattern, EndCondition, MonthTarget, RecurrenceRule, TaskTemplate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn db_with(pattern: Pattern) -> Database {
        let mut db = Database::default();
        db.patterns.push(pattern);
        db
    }

    #[test]
    fn test_gate_daily_scenario() {
        let mut p = sample_pattern(RecurrenceRule::Daily { interval: 1 });
        p.last_generated = Some(date(2025, 12, 16));
        assert!(should_generate(&p, date(2025, 12, 17)));
        assert!(!should_generate(&p, date(2025, 12, 16)));
    }

    #[test]
    fn test_gate_never_generated_catches_same_day() {
        // Reference falls back to today - 1, so a weekly pattern whose
        // selected day is today fires on its first check.
        let p = sample_pattern(RecurrenceRule::Weekly {
            interval: 1,
            weekdays: vec![0],
        });
        // 2025-12-15 is a Monday.
        assert!(should_generate(&p, date(2025, 12, 15)));
        assert!(!should_generate(&p, date(2025, 12, 16)));
    }

    #[test]
    fn test_gate_false_when_paused_or_exhausted() {
        let mut p = sample_pattern(RecurrenceRule::Daily { interval: 1 });
        p.last_generated = Some(date(2025, 12, 1));
        p.status = PatternStatus::Paused;
        assert!(!should_generate(&p, date(2025, 12, 17)));

        let mut p = sample_pattern(RecurrenceRule::Daily { interval: 1 });
        p.last_generated = Some(date(2025, 12, 1));
        p.end = EndCondition::AfterCount { count: 4 };
        p.generated_count = 4;
        assert!(!should_generate(&p, date(2025, 12, 17)));
    }

    #[test]
    fn test_gate_is_idempotent() {
        let mut p = sample_pattern(RecurrenceRule::Daily { interval: 3 });
        p.last_generated = Some(date(2025, 12, 10));
        let today = date(2025, 12, 17);
        let first = should_generate(&p, today);
        for _ in 0..5 {
            assert_eq!(should_generate(&p, today), first);
        }
    }

    #[test]
    fn test_generate_copies_template_fields() {
        let mut p = sample_pattern(RecurrenceRule::Daily { interval: 1 });
        p.stakeholder = Some("Finance".into());
        p.goal = Some("Q4 close".into());
        p.timezone = Some("Australia/Sydney".into());
        p.notes = Some("include variance commentary".into());
        let inst = generate_instance(&p, date(2025, 12, 17), 42, 1000);
        assert_eq!(inst.id, 42);
        assert_eq!(inst.title, p.title);
        assert_eq!(inst.stakeholder.as_deref(), Some("Finance"));
        assert_eq!(inst.goal.as_deref(), Some("Q4 close"));
        assert_eq!(inst.timezone.as_deref(), Some("Australia/Sydney"));
        assert_eq!(inst.due, date(2025, 12, 17));
        assert_eq!(inst.pattern_id, Some(p.id));
        assert!(!inst.done);
    }

    #[test]
    fn test_generate_hydrates_checklist_fresh() {
        let mut p = sample_pattern(RecurrenceRule::Daily { interval: 1 });
        p.checklist = vec![
            TaskTemplate {
                title: "Draft".into(),
                scope: Some("report".into()),
                order: 2,
                subitems: vec!["numbers".into(), "commentary".into()],
            },
            TaskTemplate {
                title: "Review".into(),
                scope: None,
                order: 1,
                subitems: vec![],
            },
        ];
        let inst = generate_instance(&p, date(2025, 12, 17), 1, 0);
        assert_eq!(inst.tasks.len(), 2);
        // Authored order values pass through unchanged.
        assert_eq!(inst.tasks[0].order, 2);
        assert_eq!(inst.tasks[1].order, 1);
        for task in &inst.tasks {
            assert_eq!(task.state, TaskState::NotStarted);
            for sub in &task.subitems {
                assert!(!sub.completed);
            }
        }
        assert_eq!(inst.tasks[0].subitems.len(), 2);
        assert_eq!(inst.tasks[0].subitems[0].text, "numbers");
    }

    #[test]
    fn test_cycle_advances_tracking_once() {
        let mut p = sample_pattern(RecurrenceRule::Daily { interval: 1 });
        p.last_generated = Some(date(2025, 12, 16));
        let mut db = db_with(p);

        let id = run_generation_cycle(&mut db, 1, date(2025, 12, 17), 99);
        assert!(id.is_some());
        let p = db.get_pattern(1).unwrap();
        assert_eq!(p.last_generated, Some(date(2025, 12, 17)));
        assert_eq!(p.generated_count, 1);
        assert_eq!(db.instances.len(), 1);
        assert_eq!(db.instances[0].due, date(2025, 12, 17));

        // Caught up: a second cycle on the same day produces nothing.
        assert_eq!(run_generation_cycle(&mut db, 1, date(2025, 12, 17), 99), None);
        assert_eq!(db.instances.len(), 1);
    }

    #[test]
    fn test_catch_up_one_occurrence_per_cycle() {
        // Dormant for five days: each cycle moves last_generated forward by
        // exactly one day until caught up.
        let mut p = sample_pattern(RecurrenceRule::Daily { interval: 1 });
        p.last_generated = Some(date(2025, 12, 10));
        let mut db = db_with(p);
        let today = date(2025, 12, 15);

        let mut generated = Vec::new();
        while let Some(id) = run_generation_cycle(&mut db, 1, today, 0) {
            generated.push(id);
        }
        assert_eq!(generated.len(), 5);
        let dues: Vec<NaiveDate> = db.instances.iter().map(|i| i.due).collect();
        assert_eq!(
            dues,
            vec![
                date(2025, 12, 11),
                date(2025, 12, 12),
                date(2025, 12, 13),
                date(2025, 12, 14),
                date(2025, 12, 15),
            ]
        );
        assert_eq!(db.get_pattern(1).unwrap().generated_count, 5);
    }

    #[test]
    fn test_cycle_stops_at_end_count() {
        let mut p = sample_pattern(RecurrenceRule::Daily { interval: 1 });
        p.last_generated = Some(date(2025, 12, 1));
        p.end = EndCondition::AfterCount { count: 2 };
        let mut db = db_with(p);
        let today = date(2025, 12, 31);

        let mut cycles = 0;
        while run_generation_cycle(&mut db, 1, today, 0).is_some() {
            cycles += 1;
        }
        assert_eq!(cycles, 2);
        assert!(db.get_pattern(1).unwrap().count_exhausted());
        // Permanently inert, even far in the future.
        assert!(!should_generate(db.get_pattern(1).unwrap(), date(2030, 1, 1)));
    }

    #[test]
    fn test_cycle_respects_cutoff_date() {
        let mut p = sample_pattern(RecurrenceRule::Monthly {
            interval: 1,
            day: MonthTarget::Fixed(15),
        });
        p.last_generated = Some(date(2025, 11, 15));
        p.end = EndCondition::ByDate { date: date(2025, 11, 30) };
        let mut db = db_with(p);
        // December 15th would be next, but it lies past the cutoff.
        assert_eq!(run_generation_cycle(&mut db, 1, date(2025, 12, 20), 0), None);
        assert!(db.instances.is_empty());
    }
}
