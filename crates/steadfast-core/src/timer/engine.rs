//! Execution timer.
//!
//! A wall-clock countdown. It never decrements a counter: remaining time is
//! always `duration - (now - start_time)`, so a suspended process reads the
//! right value the moment it wakes up. The caller drives it with `tick()`.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Finished -> Idle
//!           |                     ^
//!           +------ give_up ------+
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Finished,
}

/// What the operator enters before starting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSetup {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    /// What will exist when the timer ends.
    pub deliverable: String,
}

impl TimerSetup {
    pub fn duration_secs(&self) -> u64 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }

    /// Returns the duration in seconds.
    ///
    /// # Errors
    /// [`ValidationError::ZeroDuration`] or [`ValidationError::EmptyField`]
    /// for a blank deliverable.
    pub fn validate(&self) -> Result<u64, ValidationError> {
        let duration = self.duration_secs();
        if duration == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        if self.deliverable.trim().is_empty() {
            return Err(ValidationError::EmptyField("deliverable".into()));
        }
        Ok(duration)
    }
}

/// A finished run that the operator dismissed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub deliverable: String,
    pub duration_secs: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Single execution timer per user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionTimer {
    status: TimerStatus,
    duration_secs: u64,
    #[serde(default)]
    start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    deliverable: String,
}

impl ExecutionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub fn deliverable(&self) -> &str {
        &self.deliverable
    }

    /// Seconds since start, never negative.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        self.start_time
            .map(|start| u64::try_from((now - start).num_seconds()).unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn remaining_secs(&self, now: DateTime<Utc>) -> u64 {
        match self.status {
            TimerStatus::Idle => self.duration_secs,
            TimerStatus::Running => self.duration_secs.saturating_sub(self.elapsed_secs(now)),
            TimerStatus::Finished => 0,
        }
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        Event::TimerSnapshot {
            status: self.status,
            deliverable: self.deliverable.clone(),
            duration_secs: self.duration_secs,
            remaining_secs: self.remaining_secs(now),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Leave Idle with a validated setup. Starting a timer that is already
    /// running or finished does nothing.
    ///
    /// # Errors
    /// Validation failures leave the timer Idle and untouched.
    pub fn start(
        &mut self,
        setup: &TimerSetup,
        now: DateTime<Utc>,
    ) -> Result<Option<Event>, ValidationError> {
        if self.status != TimerStatus::Idle {
            return Ok(None);
        }
        let duration_secs = setup.validate()?;

        self.status = TimerStatus::Running;
        self.duration_secs = duration_secs;
        self.start_time = Some(now);
        self.deliverable = setup.deliverable.trim().to_string();
        tracing::info!(duration_secs, deliverable = %self.deliverable, "execution timer started");

        Ok(Some(Event::TimerStarted {
            deliverable: self.deliverable.clone(),
            duration_secs,
            at: now,
        }))
    }

    /// Call periodically. Returns `Some(Event::TimerFinished)` once, when the
    /// countdown reaches zero.
    pub fn tick(&mut self, now: DateTime<Utc>, beeps: u32) -> Option<Event> {
        if self.status != TimerStatus::Running || self.remaining_secs(now) > 0 {
            return None;
        }
        self.status = TimerStatus::Finished;
        tracing::info!(deliverable = %self.deliverable, "execution timer finished");
        Some(Event::TimerFinished {
            deliverable: self.deliverable.clone(),
            duration_secs: self.duration_secs,
            beeps,
            at: now,
        })
    }

    /// Abandon a running or finished timer and return to Idle.
    pub fn give_up(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.status == TimerStatus::Idle {
            return None;
        }
        let remaining_secs = self.remaining_secs(now);
        let deliverable = std::mem::take(&mut self.deliverable);
        *self = Self::new();
        Some(Event::TimerAbandoned {
            deliverable,
            remaining_secs,
            at: now,
        })
    }

    /// Close out a finished timer, returning the run for the execution log.
    pub fn dismiss(&mut self, now: DateTime<Utc>) -> Option<ExecutionRecord> {
        if self.status != TimerStatus::Finished {
            return None;
        }
        let started_at = self.start_time?;
        let record = ExecutionRecord {
            deliverable: std::mem::take(&mut self.deliverable),
            duration_secs: self.duration_secs,
            started_at,
            finished_at: now,
        };
        *self = Self::new();
        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 1, 10, 0, 0).unwrap()
    }

    fn setup(minutes: u64, deliverable: &str) -> TimerSetup {
        TimerSetup {
            minutes,
            deliverable: deliverable.into(),
            ..Default::default()
        }
    }

    #[test]
    fn zero_duration_stays_idle() {
        let mut timer = ExecutionTimer::new();
        let err = timer.start(&setup(0, "Draft"), t0()).unwrap_err();
        assert_eq!(err, ValidationError::ZeroDuration);
        assert_eq!(timer, ExecutionTimer::new());
    }

    #[test]
    fn blank_deliverable_stays_idle() {
        let mut timer = ExecutionTimer::new();
        let err = timer.start(&setup(25, "   "), t0()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyField("deliverable".into()));
        assert_eq!(timer.status(), TimerStatus::Idle);
    }

    #[test]
    fn duration_combines_units() {
        let s = TimerSetup {
            hours: 1,
            minutes: 2,
            seconds: 3,
            deliverable: "x".into(),
        };
        assert_eq!(s.duration_secs(), 3723);
    }

    #[test]
    fn remaining_is_derived_from_wall_clock() {
        let mut timer = ExecutionTimer::new();
        timer.start(&setup(30, "Report"), t0()).unwrap();
        assert_eq!(timer.remaining_secs(t0()), 1800);
        assert_eq!(timer.remaining_secs(t0() + Duration::minutes(10)), 1200);
        // Evaluated long after a suspension.
        assert_eq!(timer.remaining_secs(t0() + Duration::days(3)), 0);
        // A clock that reads before start never exceeds the full duration.
        assert_eq!(timer.remaining_secs(t0() - Duration::minutes(5)), 1800);
    }

    #[test]
    fn second_start_is_ignored() {
        let mut timer = ExecutionTimer::new();
        assert!(timer.start(&setup(5, "A"), t0()).unwrap().is_some());
        assert!(timer
            .start(&setup(9, "B"), t0() + Duration::minutes(1))
            .unwrap()
            .is_none());
        assert_eq!(timer.deliverable(), "A");
    }

    #[test]
    fn tick_finishes_once() {
        let mut timer = ExecutionTimer::new();
        timer.start(&setup(1, "Email"), t0()).unwrap();
        assert!(timer.tick(t0() + Duration::seconds(59), 3).is_none());

        let event = timer.tick(t0() + Duration::seconds(60), 3);
        assert!(matches!(event, Some(Event::TimerFinished { beeps: 3, .. })));
        assert_eq!(timer.status(), TimerStatus::Finished);
        assert!(timer.tick(t0() + Duration::seconds(61), 3).is_none());
    }

    #[test]
    fn give_up_discards_state() {
        let mut timer = ExecutionTimer::new();
        timer.start(&setup(10, "Slides"), t0()).unwrap();
        let event = timer.give_up(t0() + Duration::minutes(4)).unwrap();
        assert_eq!(
            event,
            Event::TimerAbandoned {
                deliverable: "Slides".into(),
                remaining_secs: 360,
                at: t0() + Duration::minutes(4),
            }
        );
        assert_eq!(timer, ExecutionTimer::new());
        assert!(timer.give_up(t0()).is_none());
    }

    #[test]
    fn dismiss_yields_record() {
        let mut timer = ExecutionTimer::new();
        timer.start(&setup(1, "Commit"), t0()).unwrap();
        assert!(timer.dismiss(t0()).is_none());

        let end = t0() + Duration::minutes(2);
        timer.tick(end, 1);
        let record = timer.dismiss(end).unwrap();
        assert_eq!(record.deliverable, "Commit");
        assert_eq!(record.duration_secs, 60);
        assert_eq!(record.started_at, t0());
        assert_eq!(timer.status(), TimerStatus::Idle);
    }
}
