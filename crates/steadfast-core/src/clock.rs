//! Injectable time source.
//!
//! Every time-dependent transition (ladder unlocks, streak "today", timer
//! countdown) takes its notion of "now" from a [`Clock`] so the logic can be
//! exercised without the wall clock.

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

pub trait Clock {
    /// Current absolute time.
    fn now(&self) -> DateTime<Utc>;

    /// Calendar day used as the key for day logs.
    ///
    /// Defaults to the local calendar date of [`Clock::now`].
    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&Local).date_naive()
    }
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a fixed instant; advanced manually in tests and
/// simulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: DateTime<Utc>,
    today: Option<NaiveDate>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now, today: None }
    }

    /// Pin the calendar day independently of the instant, so day-log tests
    /// do not depend on the host time zone.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    pub fn set(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| self.now.with_timezone(&Local).date_naive())
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_advances() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let mut clock = FixedClock::new(t0);
        clock.advance(Duration::hours(25));
        assert_eq!(clock.now(), t0 + Duration::hours(25));
    }

    #[test]
    fn pinned_today_ignores_instant() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 23, 30, 0).unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();
        let clock = FixedClock::new(t0).with_today(day);
        assert_eq!(clock.today(), day);
    }
}
