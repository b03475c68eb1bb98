use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::ladder::EvolutionMap;
use super::level::Checklist;
use super::{Level, LEVEL_DAYS};

/// How a single day node should be presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DayStatus {
    Completed,
    /// Sequential-next and time-unlocked.
    Available,
    /// Sequential-next but the time gate has not opened yet.
    Waiting {
        unlock_at: DateTime<Utc>,
        remaining_secs: i64,
        remaining: String,
    },
    /// Future day, or the level is not entered/started.
    Locked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayNode {
    pub day: u8,
    #[serde(flatten)]
    pub status: DayStatus,
}

/// Read model of one level for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderView {
    pub level: Level,
    pub entered: bool,
    pub started: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub completed_count: usize,
    pub complete: bool,
    pub next_day: Option<u8>,
    pub time_allowed_day: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checklist: Option<Checklist>,
    pub days: Vec<DayNode>,
}

impl LadderView {
    pub(super) fn build(map: &EvolutionMap, level: Level, now: DateTime<Utc>) -> Self {
        let entered = map.can_enter(level);
        let state = map.level(level);
        let next_day = state.next_day();

        let days = (1..=LEVEL_DAYS)
            .map(|day| {
                let status = if !entered || !state.is_started() {
                    DayStatus::Locked
                } else if state.is_completed(day) {
                    DayStatus::Completed
                } else if next_day != Some(day) {
                    DayStatus::Locked
                } else {
                    match state.unlock_time(day) {
                        Some(at) if now < at => {
                            let remaining = at - now;
                            DayStatus::Waiting {
                                unlock_at: at,
                                remaining_secs: remaining.num_seconds(),
                                remaining: format_remaining(remaining),
                            }
                        }
                        _ => DayStatus::Available,
                    }
                };
                DayNode { day, status }
            })
            .collect();

        Self {
            level,
            entered,
            started: state.is_started(),
            start_date: state.start_date(),
            completed_count: state.completed_count(),
            complete: state.is_complete(),
            next_day,
            time_allowed_day: state.time_allowed_day(now),
            checklist: state.checklist().copied(),
            days,
        }
    }

    pub fn status_of(&self, day: u8) -> Option<&DayStatus> {
        self.days.iter().find(|n| n.day == day).map(|n| &n.status)
    }
}

/// `"{h}h {m}m"`, rounding partial minutes up so a pending unlock never
/// reads as `0h 0m`.
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.num_seconds().max(0);
    let minutes = (secs + 59) / 60;
    format!("{}h {}m", minutes / 60, minutes % 60)
}
