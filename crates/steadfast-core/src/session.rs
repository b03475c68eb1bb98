//! User session: application state plus the clock and store it runs on.
//!
//! Each action applies one transition to the in-memory [`AppState`] using the
//! injected clock, then writes the touched entity back through the
//! [`StateStore`]. Refused transitions (locked days, idle timers) return
//! `Ok(None)` and write nothing.

use chrono::NaiveDate;

use crate::clock::Clock;
use crate::error::Result;
use crate::events::Event;
use crate::evolution::{ChecklistItem, LadderView, Level};
use crate::goals::Goal;
use crate::state::AppState;
use crate::storage::{Config, StateStore};
use crate::timer::TimerSetup;
use crate::tracking::{DayLog, DayLogStats, DayMode, Routine, StreakCalculator};

pub struct Session<S, C> {
    store: S,
    clock: C,
    config: Config,
    state: AppState,
}

impl<S: StateStore, C: Clock> Session<S, C> {
    /// Load the user's state from `store`.
    ///
    /// # Errors
    /// Returns an error if the stored document cannot be read or decoded.
    pub fn open(store: S, clock: C, config: Config) -> Result<Self> {
        let state = store.load_state()?;
        let mut session = Self {
            store,
            clock,
            config,
            state,
        };
        if session.refresh_today() {
            tracing::debug!("today's validity re-derived with the current routines and threshold");
        }
        Ok(session)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn streak_calculator(&self) -> StreakCalculator {
        StreakCalculator::with_lookback(self.config.tracking.streak_lookback_days)
    }

    // ── Routines and day logs ────────────────────────────────────────

    /// # Errors
    /// Validation error for a blank title; store error if saving fails.
    pub fn add_routine(&mut self, title: &str) -> Result<Routine> {
        let routine = self.state.routines.add(title)?.clone();
        self.save_routines_and_today()?;
        Ok(routine)
    }

    /// # Errors
    /// Validation error for an unknown id; store error if saving fails.
    pub fn remove_routine(&mut self, id: &str) -> Result<Routine> {
        let routine = self.state.routines.remove(id)?;
        self.save_routines_and_today()?;
        Ok(routine)
    }

    /// Re-derive today's validity from the current routine list and
    /// threshold. Earlier days keep the validity they were recorded with.
    fn refresh_today(&mut self) -> bool {
        let today = self.clock.today();
        self.state.day_logs.recompute(
            today,
            &self.state.routines,
            self.config.tracking.valid_threshold,
        )
    }

    /// The routine list and today's log change together, so they are
    /// written in one upsert.
    fn save_routines_and_today(&mut self) -> Result<()> {
        if self.refresh_today() {
            self.store.save_state(&self.state)
        } else {
            self.store.save_routines(&self.state.routines)
        }
    }

    /// Toggle a routine on `date`, defaulting to today.
    ///
    /// # Errors
    /// Validation error for an unknown routine; store error if saving fails.
    pub fn toggle_routine(&mut self, routine_id: &str, date: Option<NaiveDate>) -> Result<Event> {
        let date = date.unwrap_or_else(|| self.clock.today());
        let event = self.state.day_logs.toggle_routine(
            date,
            routine_id,
            &self.state.routines,
            self.config.tracking.valid_threshold,
        )?;
        self.store.save_day_logs(&self.state.day_logs)?;
        Ok(event)
    }

    /// # Errors
    /// Store error if saving fails.
    pub fn set_day_mode(&mut self, mode: DayMode, date: Option<NaiveDate>) -> Result<Option<Event>> {
        let date = date.unwrap_or_else(|| self.clock.today());
        let event = self.state.day_logs.set_mode(date, mode);
        if event.is_some() {
            self.store.save_day_logs(&self.state.day_logs)?;
        }
        Ok(event)
    }

    pub fn day_log(&self, date: Option<NaiveDate>) -> Option<&DayLog> {
        let date = date.unwrap_or_else(|| self.clock.today());
        self.state.day_logs.get(date)
    }

    pub fn streak(&self) -> u32 {
        self.streak_calculator()
            .current_streak(&self.state.day_logs, self.clock.today())
    }

    pub fn day_stats(&self) -> DayLogStats {
        self.streak_calculator()
            .stats(&self.state.day_logs, self.clock.today())
    }

    // ── Evolution ladder ─────────────────────────────────────────────

    fn persist_evolution(&mut self, event: Option<Event>) -> Result<Option<Event>> {
        if event.is_some() {
            self.store.save_evolution(&self.state.evolution)?;
        }
        Ok(event)
    }

    /// # Errors
    /// Store error if saving fails.
    pub fn start_level(&mut self, level: Level) -> Result<Option<Event>> {
        let event = self.state.evolution.start_level(level, self.clock.now());
        self.persist_evolution(event)
    }

    /// # Errors
    /// Store error if saving fails.
    pub fn complete_day(&mut self, level: Level, day: u8) -> Result<Option<Event>> {
        let event = self.state.evolution.complete_day(level, day, self.clock.now());
        self.persist_evolution(event)
    }

    /// # Errors
    /// Store error if saving fails.
    pub fn undo_day(&mut self, level: Level, day: u8) -> Result<Option<Event>> {
        let event = self.state.evolution.undo_day(level, day, self.clock.now());
        self.persist_evolution(event)
    }

    /// # Errors
    /// Store error if saving fails.
    pub fn set_checklist_item(&mut self, item: ChecklistItem, checked: bool) -> Result<Option<Event>> {
        let event = self
            .state
            .evolution
            .set_checklist_item(item, checked, self.clock.now());
        self.persist_evolution(event)
    }

    pub fn ladder(&self, level: Level) -> LadderView {
        self.state.evolution.view(level, self.clock.now())
    }

    // ── Execution timer ──────────────────────────────────────────────

    fn beeps(&self) -> u32 {
        if self.config.notifications.enabled {
            self.config.notifications.beep_count
        } else {
            0
        }
    }

    /// # Errors
    /// Validation error for a zero duration or blank deliverable; store
    /// error if saving fails.
    pub fn start_timer(&mut self, setup: &TimerSetup) -> Result<Option<Event>> {
        let event = self.state.timer.start(setup, self.clock.now())?;
        if event.is_some() {
            self.store.save_timer(&self.state.timer)?;
        }
        Ok(event)
    }

    /// Re-evaluate the countdown; returns the finish event once.
    ///
    /// # Errors
    /// Store error if saving fails.
    pub fn tick_timer(&mut self) -> Result<Option<Event>> {
        let beeps = self.beeps();
        let event = self.state.timer.tick(self.clock.now(), beeps);
        if event.is_some() {
            self.store.save_timer(&self.state.timer)?;
        }
        Ok(event)
    }

    /// # Errors
    /// Store error if saving fails.
    pub fn give_up_timer(&mut self) -> Result<Option<Event>> {
        let event = self.state.timer.give_up(self.clock.now());
        if event.is_some() {
            self.store.save_timer(&self.state.timer)?;
        }
        Ok(event)
    }

    /// Close a finished timer and append it to the execution log.
    ///
    /// The timer and the log are written in one upsert. If that fails the
    /// in-memory state is rolled back, so the timer stays finished and the
    /// dismissal can be retried.
    ///
    /// # Errors
    /// Store error if saving fails.
    pub fn dismiss_timer(&mut self) -> Result<Option<Event>> {
        let now = self.clock.now();
        let previous = self.state.timer.clone();
        let Some(record) = self.state.timer.dismiss(now) else {
            return Ok(None);
        };
        let event = Event::TimerDismissed {
            deliverable: record.deliverable.clone(),
            at: now,
        };
        self.state.executions.push(record);
        if let Err(e) = self.store.save_state(&self.state) {
            self.state.executions.pop();
            self.state.timer = previous;
            return Err(e);
        }
        Ok(Some(event))
    }

    pub fn timer_snapshot(&self) -> Event {
        self.state.timer.snapshot(self.clock.now())
    }

    // ── Goals ────────────────────────────────────────────────────────

    /// # Errors
    /// Validation error for a blank title; store error if saving fails.
    pub fn add_goal(&mut self, title: &str) -> Result<Goal> {
        let goal = self.state.goals.add(title, self.clock.now())?.clone();
        self.store.save_goals(&self.state.goals)?;
        Ok(goal)
    }

    /// # Errors
    /// Validation error for an unknown id; store error if saving fails.
    pub fn toggle_goal(&mut self, id: &str) -> Result<Goal> {
        let goal = self.state.goals.toggle(id, self.clock.now())?.clone();
        self.store.save_goals(&self.state.goals)?;
        Ok(goal)
    }

    /// # Errors
    /// Validation error for an unknown id; store error if saving fails.
    pub fn remove_goal(&mut self, id: &str) -> Result<Goal> {
        let goal = self.state.goals.remove(id)?;
        self.store.save_goals(&self.state.goals)?;
        Ok(goal)
    }
}
