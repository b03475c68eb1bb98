use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{unlock_interval, LEVEL_DAYS};

/// The two sub-tasks a level-3 day needs before it can be marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecklistItem {
    /// The day's committed work was carried out.
    Execution,
    /// The day was reviewed and written down.
    Reflection,
}

/// Checklist progress for one level-3 day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    pub day: u8,
    pub execution: bool,
    pub reflection: bool,
}

impl Checklist {
    pub fn new(day: u8) -> Self {
        Self {
            day,
            execution: false,
            reflection: false,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.execution && self.reflection
    }

    pub(super) fn set(&mut self, item: ChecklistItem, checked: bool) {
        match item {
            ChecklistItem::Execution => self.execution = checked,
            ChecklistItem::Reflection => self.reflection = checked,
        }
    }

    pub fn get(&self, item: ChecklistItem) -> bool {
        match item {
            ChecklistItem::Execution => self.execution,
            ChecklistItem::Reflection => self.reflection,
        }
    }
}

/// Progress through one 40-day level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelState {
    /// Set once by the start action; never reset.
    #[serde(default)]
    pub(super) start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(super) completed_days: BTreeSet<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) last_completion_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) checklist: Option<Checklist>,
}

impl LevelState {
    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    pub fn is_started(&self) -> bool {
        self.start_date.is_some()
    }

    pub fn completed_days(&self) -> &BTreeSet<u8> {
        &self.completed_days
    }

    pub fn completed_count(&self) -> usize {
        self.completed_days.len()
    }

    pub fn is_complete(&self) -> bool {
        self.completed_days.len() >= usize::from(LEVEL_DAYS)
    }

    pub fn last_completion_date(&self) -> Option<DateTime<Utc>> {
        self.last_completion_date
    }

    pub fn checklist(&self) -> Option<&Checklist> {
        self.checklist.as_ref()
    }

    pub fn is_completed(&self, day: u8) -> bool {
        self.completed_days.contains(&day)
    }

    /// Highest completed day, 0 when none.
    pub fn max_completed(&self) -> u8 {
        self.completed_days.last().copied().unwrap_or(0)
    }

    /// The single day the sequential gate lets through, if any remain.
    pub fn next_day(&self) -> Option<u8> {
        let next = self.max_completed().saturating_add(1);
        (next <= LEVEL_DAYS).then_some(next)
    }

    /// `floor((now - start) / 24h) + 1`; 0 before the level starts.
    pub fn time_allowed_day(&self, now: DateTime<Utc>) -> u32 {
        let Some(start) = self.start_date else {
            return 0;
        };
        let elapsed = (now - start).num_seconds();
        if elapsed < 0 {
            return 0;
        }
        let periods = elapsed / unlock_interval().num_seconds();
        u32::try_from(periods + 1).unwrap_or(u32::MAX)
    }

    /// When `day` opens: `start + (day - 1) * 24h`.
    pub fn unlock_time(&self, day: u8) -> Option<DateTime<Utc>> {
        let start = self.start_date?;
        let offset = unlock_interval() * i32::from(day.saturating_sub(1));
        Some(start + offset)
    }

    pub fn is_time_unlocked(&self, day: u8, now: DateTime<Utc>) -> bool {
        self.unlock_time(day).is_some_and(|at| now >= at)
    }

    /// Both gates pass for `day`. Level entry and the level-3 checklist are
    /// checked by the ladder.
    pub fn passes_gates(&self, day: u8, now: DateTime<Utc>) -> bool {
        self.is_started() && self.next_day() == Some(day) && self.is_time_unlocked(day, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 7, 0, 0).unwrap()
    }

    fn started() -> LevelState {
        LevelState {
            start_date: Some(t0()),
            ..Default::default()
        }
    }

    #[test]
    fn unstarted_level_has_no_time_allowance() {
        let level = LevelState::default();
        assert_eq!(level.time_allowed_day(t0()), 0);
        assert_eq!(level.unlock_time(1), None);
        assert!(!level.passes_gates(1, t0()));
    }

    #[test]
    fn time_allowed_day_steps_every_24h() {
        let level = started();
        assert_eq!(level.time_allowed_day(t0()), 1);
        assert_eq!(level.time_allowed_day(t0() + Duration::hours(23)), 1);
        assert_eq!(level.time_allowed_day(t0() + Duration::hours(24)), 2);
        assert_eq!(level.time_allowed_day(t0() + Duration::hours(49)), 3);
        assert_eq!(level.time_allowed_day(t0() - Duration::minutes(1)), 0);
    }

    #[test]
    fn unlock_time_is_offset_from_start() {
        let level = started();
        assert_eq!(level.unlock_time(1), Some(t0()));
        assert_eq!(level.unlock_time(40), Some(t0() + Duration::hours(39 * 24)));
    }

    #[test]
    fn next_day_follows_max_completed() {
        let mut level = started();
        assert_eq!(level.next_day(), Some(1));
        level.completed_days.extend(1..=39);
        assert_eq!(level.next_day(), Some(40));
        level.completed_days.insert(40);
        assert!(level.is_complete());
        assert_eq!(level.next_day(), None);
    }

    #[test]
    fn out_of_range_days_from_storage_close_the_level() {
        let level: LevelState = serde_json::from_value(serde_json::json!({
            "start_date": t0(),
            "completed_days": [1, 255],
        }))
        .unwrap();
        assert_eq!(level.max_completed(), 255);
        assert_eq!(level.next_day(), None);
        assert!(!level.passes_gates(2, t0() + Duration::days(5)));
    }

    #[test]
    fn checklist_needs_both_items() {
        let mut checklist = Checklist::new(3);
        checklist.set(ChecklistItem::Execution, true);
        assert!(!checklist.is_satisfied());
        checklist.set(ChecklistItem::Reflection, true);
        assert!(checklist.is_satisfied());
        assert!(checklist.get(ChecklistItem::Reflection));
    }
}
