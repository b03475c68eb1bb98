//! Integration tests for persisting a session through SQLite.

use chrono::{Duration, TimeZone, Utc};
use steadfast_core::{
    Clock, Config, Database, DocumentStore, FixedClock, Level, Session, StateStore, TimerSetup,
    TimerStatus,
};

#[test]
fn test_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("steadfast.db");
    let t0 = Utc.with_ymd_and_hms(2026, 10, 2, 9, 0, 0).unwrap();

    {
        let store = DocumentStore::new(Database::open_at(&path).unwrap(), "me");
        let mut s = Session::open(store, FixedClock::new(t0), Config::default()).unwrap();
        s.add_routine("Journal").unwrap();
        s.add_goal("Ship v1").unwrap();
        s.start_level(Level::One).unwrap();
        s.complete_day(Level::One, 1).unwrap();
        s.start_timer(&TimerSetup {
            hours: 1,
            deliverable: "Release notes".into(),
            ..Default::default()
        })
        .unwrap();
    }

    // Reopened "process" three hours later: the timer reads from wall clock.
    let store = DocumentStore::new(Database::open_at(&path).unwrap(), "me");
    let later = FixedClock::new(t0 + Duration::hours(3));
    let mut s = Session::open(store, later, Config::default()).unwrap();

    assert_eq!(s.state().routines.len(), 1);
    assert_eq!(s.state().goals.len(), 1);
    assert_eq!(s.state().evolution.level(Level::One).completed_count(), 1);
    assert_eq!(s.state().timer.status(), TimerStatus::Running);
    assert_eq!(s.state().timer.remaining_secs(s.clock().now()), 0);

    assert!(s.tick_timer().unwrap().is_some());
    assert_eq!(
        s.store().load_timer().unwrap().status(),
        TimerStatus::Finished
    );
}

#[test]
fn test_users_do_not_share_documents() {
    let db_dir = tempfile::tempdir().unwrap();
    let path = db_dir.path().join("steadfast.db");
    let now = Utc.with_ymd_and_hms(2026, 10, 2, 9, 0, 0).unwrap();

    let store = DocumentStore::new(Database::open_at(&path).unwrap(), "alice");
    let mut alice = Session::open(store, FixedClock::new(now), Config::default()).unwrap();
    alice.add_goal("Alice's goal").unwrap();

    let store = DocumentStore::new(Database::open_at(&path).unwrap(), "bob");
    let bob = Session::open(store, FixedClock::new(now), Config::default()).unwrap();
    assert!(bob.state().goals.is_empty());
}
