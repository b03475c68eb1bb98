//! Daily routine check-offs, day validity and streaks.

mod daylog;
mod routine;
mod streak;

pub use daylog::{meets_threshold, DayLog, DayLogBook, DayMode, DEFAULT_VALID_THRESHOLD};
pub use routine::{Routine, RoutineList};
pub use streak::{DayLogStats, StreakCalculator, DEFAULT_LOOKBACK_DAYS};
