use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::level::{Checklist, ChecklistItem, LevelState};
use super::view::LadderView;
use super::{Level, LEVEL_DAYS};
use crate::events::Event;

/// State of all three levels.
///
/// Every transition is a no-op (`None`) when a gate refuses it; callers never
/// have to distinguish why a locked day did not move.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionMap {
    #[serde(default)]
    level1: LevelState,
    #[serde(default)]
    level2: LevelState,
    #[serde(default)]
    level3: LevelState,
}

impl EvolutionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self, level: Level) -> &LevelState {
        match level {
            Level::One => &self.level1,
            Level::Two => &self.level2,
            Level::Three => &self.level3,
        }
    }

    fn level_mut(&mut self, level: Level) -> &mut LevelState {
        match level {
            Level::One => &mut self.level1,
            Level::Two => &mut self.level2,
            Level::Three => &mut self.level3,
        }
    }

    /// Level 1 is always open; each later level needs every earlier one
    /// complete.
    pub fn can_enter(&self, level: Level) -> bool {
        match level.previous() {
            None => true,
            Some(prev) => self.level(prev).is_complete() && self.can_enter(prev),
        }
    }

    /// Stamp the start date. A level that is locked or already started is
    /// left untouched.
    pub fn start_level(&mut self, level: Level, now: DateTime<Utc>) -> Option<Event> {
        if !self.can_enter(level) || self.level(level).is_started() {
            return None;
        }
        self.level_mut(level).start_date = Some(now);
        tracing::info!(%level, %now, "evolution level started");
        Some(Event::LevelStarted { level, at: now })
    }

    /// Whether `complete_day(level, day, now)` would be accepted.
    pub fn can_complete(&self, level: Level, day: u8, now: DateTime<Utc>) -> bool {
        if !self.can_enter(level) {
            return false;
        }
        let state = self.level(level);
        if !state.passes_gates(day, now) {
            return false;
        }
        if level.requires_checklist() {
            return state
                .checklist
                .is_some_and(|c| c.day == day && c.is_satisfied());
        }
        true
    }

    /// Mark `day` done. Already-completed days and days failing a gate are
    /// ignored.
    pub fn complete_day(&mut self, level: Level, day: u8, now: DateTime<Utc>) -> Option<Event> {
        if !self.can_complete(level, day, now) {
            tracing::debug!(%level, day, "completion refused by gate");
            return None;
        }

        let state = self.level_mut(level);
        if !state.completed_days.insert(day) {
            return None;
        }
        if level.requires_checklist() {
            state.last_completion_date = Some(now);
            state.checklist = None;
        }
        let level_complete = state.is_complete();

        if level_complete {
            tracing::info!(%level, "evolution level complete");
        }
        if level == Level::Three && day == LEVEL_DAYS {
            return Some(Event::ProofOfExecution { at: now });
        }
        Some(Event::DayCompleted {
            level,
            day,
            level_complete,
            at: now,
        })
    }

    /// Take back the most recent completion on levels 1 and 2.
    ///
    /// Level 3 never undoes. Only the highest completed day can be undone, so
    /// the completed set stays a contiguous `1..=n`, and a level cannot be
    /// reopened once the next level has been started.
    pub fn undo_day(&mut self, level: Level, day: u8, now: DateTime<Utc>) -> Option<Event> {
        if !level.allows_undo() || !self.can_enter(level) {
            return None;
        }
        if let Some(next) = level.next() {
            if self.level(next).is_started() {
                return None;
            }
        }

        let state = self.level_mut(level);
        if day == 0 || state.max_completed() != day {
            return None;
        }
        state.completed_days.remove(&day);
        tracing::debug!(%level, day, "day completion undone");
        Some(Event::DayUndone { level, day, at: now })
    }

    /// Tick or untick one level-3 checklist item for the currently available
    /// day. Ignored unless that day has cleared both gates.
    pub fn set_checklist_item(
        &mut self,
        item: ChecklistItem,
        checked: bool,
        now: DateTime<Utc>,
    ) -> Option<Event> {
        if !self.can_enter(Level::Three) {
            return None;
        }
        let state = self.level_mut(Level::Three);
        let day = state.next_day()?;
        if !state.passes_gates(day, now) {
            return None;
        }

        // A checklist left over from an earlier day starts again empty.
        let checklist = state.checklist.insert(
            state
                .checklist
                .filter(|c| c.day == day)
                .unwrap_or_else(|| Checklist::new(day)),
        );
        if checklist.get(item) == checked {
            return None;
        }
        checklist.set(item, checked);
        Some(Event::ChecklistConfirmed {
            day,
            execution: checklist.execution,
            reflection: checklist.reflection,
        })
    }

    pub fn view(&self, level: Level, now: DateTime<Utc>) -> LadderView {
        LadderView::build(self, level, now)
    }
}
