//! End-to-end flow: generate a plan, run the timer against real storage,
//! verify the persisted record and statistics.

use studyflow_core::storage::Database;
use studyflow_core::{generate_plan, BlockKind, SessionTimer, TimerState};

#[test]
fn full_session_run_is_persisted_and_counted() {
    let db = Database::open_memory().unwrap();

    let plan = generate_plan("2", "Data Structures", 150);
    let kinds: Vec<BlockKind> = plan.blocks.iter().map(|b| b.kind).collect();
    assert_eq!(
        kinds,
        vec![BlockKind::Focus, BlockKind::LongBreak, BlockKind::Focus]
    );
    let total_ticks: u64 = plan.blocks.iter().map(|b| b.duration_secs()).sum();

    let mut timer = SessionTimer::new(plan, &db);
    let session_id = timer.session_id().expect("record created up front");

    // Created, not yet finalized.
    let record = db.get_session(session_id).unwrap().unwrap();
    assert_eq!(record.planned_minutes, 150);
    assert!(!record.completed);

    timer.start();
    let mut transitions = 0;
    for _ in 0..total_ticks {
        if let Some(studyflow_core::Event::BlockStarted { .. }) = timer.tick(&db) {
            transitions += 1;
        }
    }
    assert_eq!(timer.state(), TimerState::Completed);
    assert_eq!(transitions, 2);

    let record = db.get_session(session_id).unwrap().unwrap();
    assert!(record.completed);
    assert!(record.end_time.is_some());

    let week = db.stats_week().unwrap();
    assert_eq!(week.sessions_completed, 1);
    let all = db.stats_all().unwrap();
    assert_eq!(all.total_sessions, 1);
    assert_eq!(all.completed_sessions, 1);
}

#[test]
fn cancelled_run_leaves_an_unfinalized_record() {
    let db = Database::open_memory().unwrap();

    let mut timer = SessionTimer::new(generate_plan("4", "Calculus 2", 60), &db);
    let session_id = timer.session_id().unwrap();

    timer.start();
    for _ in 0..120 {
        timer.tick(&db);
    }
    timer.cancel();

    // The record stays exactly as created and is excluded from weekly stats.
    let record = db.get_session(session_id).unwrap().unwrap();
    assert!(!record.completed);
    assert!(record.end_time.is_none());
    assert_eq!(db.stats_week().unwrap().sessions_completed, 0);
    assert_eq!(db.stats_all().unwrap().total_sessions, 1);

    // Cancelled runs remain visible in the session history.
    let listed = db.list_sessions(5).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, session_id);
}

#[test]
fn degenerate_budget_runs_no_session() {
    let db = Database::open_memory().unwrap();
    let plan = generate_plan("1", "Project Management", 0);
    assert!(plan.blocks.is_empty());

    let mut timer = SessionTimer::new(plan, &db);
    assert_eq!(timer.session_id(), None);
    assert!(timer.start().is_none());
    assert!(timer.tick(&db).is_none());
    assert_eq!(db.stats_all().unwrap().total_sessions, 0);
}
