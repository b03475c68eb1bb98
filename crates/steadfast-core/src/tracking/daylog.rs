use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::routine::RoutineList;
use crate::error::ValidationError;
use crate::events::Event;

/// Share of routines that must be completed for a day to count.
pub const DEFAULT_VALID_THRESHOLD: f64 = 0.7;

/// How demanding the user declared the day to be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DayMode {
    #[default]
    Normal,
    Heavy,
    Critical,
}

/// `completed / total >= threshold`, with an empty routine list never valid.
pub fn meets_threshold(completed: usize, total: usize, threshold: f64) -> bool {
    if total == 0 {
        return false;
    }
    completed as f64 / total as f64 >= threshold
}

/// One calendar day of routine check-offs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLog {
    pub date: NaiveDate,
    #[serde(default)]
    pub completed_routine_ids: BTreeSet<String>,
    #[serde(default)]
    pub mode: DayMode,
    /// Derived; refreshed by [`DayLog::recompute`] whenever membership changes.
    #[serde(default)]
    pub is_valid: bool,
}

impl DayLog {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            completed_routine_ids: BTreeSet::new(),
            mode: DayMode::Normal,
            is_valid: false,
        }
    }

    /// Completed ids that still name a defined routine.
    pub fn completed_count(&self, routines: &RoutineList) -> usize {
        self.completed_routine_ids
            .iter()
            .filter(|id| routines.contains(id))
            .count()
    }

    pub fn recompute(&mut self, routines: &RoutineList, threshold: f64) {
        self.is_valid = meets_threshold(self.completed_count(routines), routines.len(), threshold);
    }

    /// Flip membership of `routine_id`. Returns whether it is now completed.
    fn toggle(&mut self, routine_id: &str) -> bool {
        if self.completed_routine_ids.remove(routine_id) {
            false
        } else {
            self.completed_routine_ids.insert(routine_id.to_string());
            true
        }
    }
}

/// Day logs keyed by calendar day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayLogBook {
    logs: BTreeMap<NaiveDate, DayLog>,
}

impl DayLogBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayLog> {
        self.logs.get(&date)
    }

    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.logs.get(&date).is_some_and(|log| log.is_valid)
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// Logs in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = &DayLog> {
        self.logs.values()
    }

    /// Store a log as-is, replacing any log for the same day.
    pub fn insert(&mut self, log: DayLog) {
        self.logs.insert(log.date, log);
    }

    /// Re-derive validity of an existing log against the current routine
    /// list and threshold. Returns whether the flag changed.
    pub fn recompute(&mut self, date: NaiveDate, routines: &RoutineList, threshold: f64) -> bool {
        let Some(log) = self.logs.get_mut(&date) else {
            return false;
        };
        let before = log.is_valid;
        log.recompute(routines, threshold);
        before != log.is_valid
    }

    /// Check or uncheck a routine for `date`, creating the day's log on first
    /// touch, and recompute validity.
    ///
    /// # Errors
    /// Returns [`ValidationError::UnknownId`] if `routine_id` is not a defined
    /// routine; nothing is mutated in that case.
    pub fn toggle_routine(
        &mut self,
        date: NaiveDate,
        routine_id: &str,
        routines: &RoutineList,
        threshold: f64,
    ) -> Result<Event, ValidationError> {
        if !routines.contains(routine_id) {
            return Err(ValidationError::UnknownId {
                kind: "routine".into(),
                id: routine_id.to_string(),
            });
        }

        let log = self.logs.entry(date).or_insert_with(|| DayLog::new(date));
        let completed = log.toggle(routine_id);
        log.recompute(routines, threshold);
        tracing::debug!(%date, routine_id, completed, is_valid = log.is_valid, "routine toggled");

        Ok(Event::RoutineToggled {
            date,
            routine_id: routine_id.to_string(),
            completed,
            completed_count: log.completed_count(routines),
            total_routines: routines.len(),
            is_valid: log.is_valid,
        })
    }

    /// Returns `None` when the day already had that mode.
    pub fn set_mode(&mut self, date: NaiveDate, mode: DayMode) -> Option<Event> {
        let current = self.logs.get(&date).map_or(DayMode::default(), |log| log.mode);
        if current == mode {
            return None;
        }
        self.logs.entry(date).or_insert_with(|| DayLog::new(date)).mode = mode;
        Some(Event::DayModeChanged { date, mode })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::Routine;
    use proptest::prelude::*;

    fn routines(n: usize) -> RoutineList {
        (0..n)
            .map(|i| Routine {
                id: format!("r{i}"),
                title: format!("Routine {i}"),
            })
            .collect()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 10).unwrap()
    }

    #[test]
    fn empty_routine_list_is_never_valid() {
        assert!(!meets_threshold(0, 0, 0.0));
        assert!(!meets_threshold(3, 0, 0.7));
    }

    #[test]
    fn seven_of_ten_meets_default_threshold() {
        assert!(meets_threshold(7, 10, DEFAULT_VALID_THRESHOLD));
        assert!(!meets_threshold(6, 10, DEFAULT_VALID_THRESHOLD));
    }

    #[test]
    fn toggle_recomputes_validity() {
        let list = routines(3);
        let mut book = DayLogBook::new();
        book.toggle_routine(day(), "r0", &list, 0.6).unwrap();
        assert!(!book.is_valid_on(day()));

        let event = book.toggle_routine(day(), "r1", &list, 0.6).unwrap();
        assert!(book.is_valid_on(day()));
        assert_eq!(
            event,
            Event::RoutineToggled {
                date: day(),
                routine_id: "r1".into(),
                completed: true,
                completed_count: 2,
                total_routines: 3,
                is_valid: true,
            }
        );

        book.toggle_routine(day(), "r1", &list, 0.6).unwrap();
        assert!(!book.is_valid_on(day()));
        assert_eq!(book.get(day()).unwrap().completed_routine_ids.len(), 1);
    }

    #[test]
    fn unknown_routine_does_not_create_log() {
        let list = routines(2);
        let mut book = DayLogBook::new();
        let err = book.toggle_routine(day(), "nope", &list, 0.7).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownId { .. }));
        assert!(book.is_empty());
    }

    #[test]
    fn removed_routines_stop_counting() {
        let mut list = routines(2);
        let mut book = DayLogBook::new();
        book.toggle_routine(day(), "r0", &list, 0.5).unwrap();
        assert!(book.is_valid_on(day()));

        list.remove("r0").unwrap();
        book.toggle_routine(day(), "r1", &list, 0.5).unwrap();
        let log = book.get(day()).unwrap();
        assert_eq!(log.completed_count(&list), 1);
        assert!(log.is_valid);
    }

    #[test]
    fn recompute_follows_routine_list() {
        let mut list = routines(1);
        let mut book = DayLogBook::new();
        book.toggle_routine(day(), "r0", &list, 0.7).unwrap();
        assert!(book.is_valid_on(day()));

        list = routines(5);
        assert!(book.recompute(day(), &list, 0.7));
        assert_eq!(book.is_valid_on(day()), meets_threshold(1, 5, 0.7));
        assert!(!book.recompute(day(), &list, 0.7));

        let other = NaiveDate::from_ymd_opt(2026, 5, 11).unwrap();
        assert!(!book.recompute(other, &list, 0.7));
        assert!(book.get(other).is_none());
    }

    #[test]
    fn set_mode_reports_changes_only() {
        let mut book = DayLogBook::new();
        assert!(book.set_mode(day(), DayMode::Normal).is_none());
        assert!(book.is_empty());
        assert_eq!(
            book.set_mode(day(), DayMode::Critical),
            Some(Event::DayModeChanged {
                date: day(),
                mode: DayMode::Critical
            })
        );
        assert_eq!(book.get(day()).unwrap().mode, DayMode::Critical);
    }

    proptest! {
        #[test]
        fn validity_matches_ratio(total in 0usize..12, picked in 0usize..12, threshold in 0.0f64..1.5) {
            let completed = picked.min(total);
            let list = routines(total);
            let mut log = DayLog::new(day());
            for i in 0..completed {
                log.completed_routine_ids.insert(format!("r{i}"));
            }
            log.recompute(&list, threshold);
            let expected = total > 0 && (completed as f64 / total as f64) >= threshold;
            prop_assert_eq!(log.is_valid, expected);
        }
    }
}
