use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::evolution::Level;
use crate::timer::TimerStatus;
use crate::tracking::DayMode;

/// Every accepted state change produces an Event.
/// The CLI prints them; a GUI would turn them into notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    RoutineToggled {
        date: NaiveDate,
        routine_id: String,
        completed: bool,
        completed_count: usize,
        total_routines: usize,
        is_valid: bool,
    },
    DayModeChanged {
        date: NaiveDate,
        mode: DayMode,
    },
    LevelStarted {
        level: Level,
        at: DateTime<Utc>,
    },
    DayCompleted {
        level: Level,
        day: u8,
        /// True when this completion filled the 40th slot.
        level_complete: bool,
        at: DateTime<Utc>,
    },
    DayUndone {
        level: Level,
        day: u8,
        at: DateTime<Utc>,
    },
    ChecklistConfirmed {
        day: u8,
        execution: bool,
        reflection: bool,
    },
    /// Day 40 of level 3: the terminal event of the whole ladder.
    ProofOfExecution {
        at: DateTime<Utc>,
    },
    TimerStarted {
        deliverable: String,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerFinished {
        deliverable: String,
        duration_secs: u64,
        beeps: u32,
        at: DateTime<Utc>,
    },
    TimerAbandoned {
        deliverable: String,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerDismissed {
        deliverable: String,
        at: DateTime<Utc>,
    },
    TimerSnapshot {
        status: TimerStatus,
        deliverable: String,
        duration_secs: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
}
