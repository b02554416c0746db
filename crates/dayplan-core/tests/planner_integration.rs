//! Integration tests for the full planning workflow.
//!
//! These tests drive the planner end to end over real stores: task list
//! in, proposed agenda out, snapshot persisted, feedback folded back into
//! the learned policy.

use chrono::{DateTime, TimeZone, Utc};
use dayplan_core::storage::schedule::{load_plan, schedule_key};
use dayplan_core::storage::tasks;
use dayplan_core::{
    BreakAgent, BusyInterval, Config, Feedback, MemoryStore, PlanMode, Planner, SqliteStore, Task,
};

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, hour, min, 0).unwrap()
}

fn store_with(list: &[Task]) -> MemoryStore {
    let mut store = MemoryStore::new();
    tasks::save_tasks(&mut store, list).unwrap();
    store
}

#[test]
fn test_full_day_with_meetings_and_mixed_tasks() {
    let store = store_with(&[
        Task::new("Inbox sweep", 30, false).unwrap(),
        Task::new("Project work", 130, true).unwrap(),
        Task::new("One-pager", 45, false).unwrap(),
    ]);
    let mut planner = Planner::new(store, Config::default());

    let busy = [
        BusyInterval::new(at(9, 0), at(10, 0)).unwrap(),
        BusyInterval::new(at(12, 0), at(13, 0)).unwrap(),
    ];
    let plan = planner.plan(at(8, 0), &busy, Some(PlanMode::Normal)).unwrap();

    // Everything fits in a day with this much open time.
    assert!(plan.unscheduled.is_empty());

    // Nothing overlaps the meetings.
    for item in &plan.scheduled {
        assert!(item.end <= at(9, 0) || item.start >= at(10, 0) || item.start >= at(13, 0));
        assert!(item.end <= at(12, 0) || item.start >= at(13, 0));
    }

    // All 205 task minutes are placed.
    let placed: i64 = plan.scheduled.iter().map(|i| i.minutes).sum();
    assert_eq!(placed, 205);
}

#[test]
fn test_pomodoro_day_interleaves_breaks() {
    let store = store_with(&[Task::new("Thesis writing", 130, true).unwrap()]);
    let mut planner = Planner::new(store, Config::default());

    let plan = planner.plan(at(8, 0), &[], Some(PlanMode::Pomodoro)).unwrap();

    let work: Vec<i64> = plan
        .scheduled
        .iter()
        .filter(|i| !i.is_break)
        .map(|i| i.minutes)
        .collect();
    let rests: Vec<i64> = plan
        .scheduled
        .iter()
        .filter(|i| i.is_break)
        .map(|i| i.minutes)
        .collect();

    assert_eq!(work, vec![25, 25, 25, 25, 25, 5]);
    assert_eq!(rests, vec![5, 5, 5, 15]);
}

#[test]
fn test_snapshot_readable_after_planning() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dayplan.db");
    let now = at(9, 30);

    let plan = {
        let mut store = SqliteStore::open_at(&path).unwrap();
        tasks::save_tasks(&mut store, &[Task::new("Report", 30, false).unwrap()]).unwrap();
        let mut planner = Planner::new(store, Config::default());
        planner.plan(now, &[], Some(PlanMode::Normal)).unwrap()
    };

    // The snapshot under schedule_2025-03-10_09:30 matches the output.
    assert_eq!(schedule_key(now), "schedule_2025-03-10_09:30");
    let store = SqliteStore::open_at(&path).unwrap();
    let snapshot = load_plan(&store, now).unwrap().unwrap();
    assert_eq!(snapshot.scheduled, plan.scheduled);
    assert_eq!(snapshot.unscheduled, plan.unscheduled);
}

#[test]
fn test_learning_loop_over_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dayplan.db");

    {
        let mut store = SqliteStore::open_at(&path).unwrap();
        tasks::save_tasks(
            &mut store,
            &[
                Task::new("Deep work", 90, true).unwrap(),
                Task::new("Review", 30, false).unwrap(),
            ],
        )
        .unwrap();

        let mut planner = Planner::new(store, Config::default()).with_seed(7);
        let plan = planner.plan(at(8, 0), &[], Some(PlanMode::Adaptive)).unwrap();
        assert!(plan.decision.is_some());

        let report = planner
            .record_feedback(at(20, 0), &[], Feedback::Good, 2, Some(PlanMode::Adaptive))
            .unwrap();
        assert_eq!(report.episodes, 1);
    }

    // The learned table survives the session.
    let store = SqliteStore::open_at(&path).unwrap();
    let agent = BreakAgent::load(&store, None).unwrap();
    assert_eq!(agent.episodes(), 1);
    assert!(agent.table_len() >= 1);
}

#[test]
fn test_repeated_episodes_decay_exploration() {
    let store = store_with(&[Task::new("Routine", 60, true).unwrap()]);
    let mut planner = Planner::new(store, Config::default()).with_seed(3);

    let mut last_rate = f64::INFINITY;
    for _ in 0..5 {
        planner.plan(at(8, 0), &[], Some(PlanMode::Adaptive)).unwrap();
        let report = planner
            .record_feedback(at(20, 0), &[], Feedback::Okay, 1, Some(PlanMode::Adaptive))
            .unwrap();
        assert!(report.exploration_rate <= last_rate);
        last_rate = report.exploration_rate;
    }
}

#[test]
fn test_replay_from_equal_inputs_is_identical() {
    let mut store = MemoryStore::new();
    tasks::save_tasks(&mut store, &[Task::new("Report", 30, false).unwrap()]).unwrap();

    let mut planner = Planner::new(store.clone(), Config::default());
    let plan = planner.plan(at(8, 0), &[], Some(PlanMode::Normal)).unwrap();
    assert_eq!(plan.scheduled.len(), 1);

    // A fresh planner over equal backing data replans identically.
    let mut second = Planner::new(store, Config::default());
    let replay = second.plan(at(8, 0), &[], Some(PlanMode::Normal)).unwrap();
    assert_eq!(replay.scheduled, plan.scheduled);
}
