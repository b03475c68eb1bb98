//! Integration tests for day logs, validity and streaks.

use chrono::{Days, NaiveDate, TimeZone, Utc};
use steadfast_core::{Config, DayMode, DocumentStore, FixedClock, MemoryBackend, Session};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn new_session(config: Config) -> Session<DocumentStore<MemoryBackend>, FixedClock> {
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap())
        .with_today(today());
    Session::open(DocumentStore::new(MemoryBackend::new(), "t"), clock, config).unwrap()
}

#[test]
fn test_streak_over_checked_off_days() {
    let mut s = new_session(Config::default());
    let ids: Vec<String> = ["Wake 5am", "Workout", "Read"]
        .iter()
        .map(|t| s.add_routine(t).unwrap().id)
        .collect();

    // Three of three on days 1..=4 back, one of three on day 5 back.
    for back in 1..=4u64 {
        let day = today() - Days::new(back);
        for id in &ids {
            s.toggle_routine(id, Some(day)).unwrap();
        }
    }
    s.toggle_routine(&ids[0], Some(today() - Days::new(5))).unwrap();

    // Today pending: streak counts yesterday backwards.
    assert_eq!(s.streak(), 4);

    // Two of three is below 0.7.
    s.toggle_routine(&ids[0], None).unwrap();
    s.toggle_routine(&ids[1], None).unwrap();
    assert_eq!(s.streak(), 4);

    s.toggle_routine(&ids[2], None).unwrap();
    assert_eq!(s.streak(), 5);

    let stats = s.day_stats();
    assert_eq!(stats.current_streak, 5);
    assert_eq!(stats.longest_streak, 5);
    assert_eq!(stats.total_days, 6);
    assert!(stats.today_valid);
}

#[test]
fn test_threshold_comes_from_config() {
    let mut config = Config::default();
    config.apply("tracking.valid_threshold", "0.5").unwrap();
    let mut s = new_session(config);
    let a = s.add_routine("A").unwrap().id;
    s.add_routine("B").unwrap();

    s.toggle_routine(&a, None).unwrap();
    assert!(s.day_log(None).unwrap().is_valid);
}

#[test]
fn test_day_mode_is_recorded() {
    let mut s = new_session(Config::default());
    assert!(s.set_day_mode(DayMode::Heavy, None).unwrap().is_some());
    assert!(s.set_day_mode(DayMode::Heavy, None).unwrap().is_none());
    assert_eq!(s.day_log(None).unwrap().mode, DayMode::Heavy);
    assert!(!s.day_log(None).unwrap().is_valid);
}
