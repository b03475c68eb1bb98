//! Streak calculation over a day-log book.
//!
//! The current streak counts consecutive valid days walking back from today.
//! Today gets a grace rule: if it is not (yet) valid it is skipped rather than
//! breaking the run, since the day is still in progress. Every earlier day
//! breaks the scan when missing or invalid.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::daylog::DayLogBook;

/// How far back the current-streak scan looks, today included.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 365;

/// Summary of a day-log book, as shown by the `streak` command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLogStats {
    pub total_days: usize,
    pub valid_days: usize,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub today_valid: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct StreakCalculator {
    lookback_days: u32,
}

impl StreakCalculator {
    pub fn new() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }

    pub fn with_lookback(lookback_days: u32) -> Self {
        Self { lookback_days }
    }

    /// Consecutive valid days ending today, or yesterday when today is still
    /// pending.
    pub fn current_streak(&self, book: &DayLogBook, today: NaiveDate) -> u32 {
        let mut streak = 0;
        for offset in 0..self.lookback_days {
            let Some(day) = today.checked_sub_days(Days::new(u64::from(offset))) else {
                break;
            };
            if book.is_valid_on(day) {
                streak += 1;
            } else if offset == 0 {
                continue;
            } else {
                break;
            }
        }
        streak
    }

    /// Longest run of consecutive valid days anywhere in the book.
    pub fn longest_streak(&self, book: &DayLogBook) -> u32 {
        let mut longest = 0;
        let mut run = 0;
        let mut previous: Option<NaiveDate> = None;

        for log in book.iter().filter(|log| log.is_valid) {
            let contiguous = previous
                .and_then(|p| p.checked_add_days(Days::new(1)))
                .is_some_and(|next| next == log.date);
            run = if contiguous { run + 1 } else { 1 };
            longest = longest.max(run);
            previous = Some(log.date);
        }
        longest
    }

    pub fn stats(&self, book: &DayLogBook, today: NaiveDate) -> DayLogStats {
        DayLogStats {
            total_days: book.len(),
            valid_days: book.iter().filter(|log| log.is_valid).count(),
            current_streak: self.current_streak(book, today),
            longest_streak: self.longest_streak(book),
            today_valid: book.is_valid_on(today),
        }
    }
}

impl Default for StreakCalculator {
    fn default() -> Self {
        Self::new()
    }
}
