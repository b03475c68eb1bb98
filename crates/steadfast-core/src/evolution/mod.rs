//! Evolution ladder: three sequential 40-day levels.
//!
//! ## Gates
//!
//! A day can be completed only when it passes both gates:
//!
//! - **Sequential gate**: it is `max(completed) + 1`.
//! - **Time gate**: `now - start_date >= (day - 1) * 24h`.
//!
//! Level 2 opens once level 1 has all 40 days, level 3 once levels 1 and 2
//! do. Level 3 is strict: each day needs a two-item checklist before it can
//! be marked, and a marked day is permanent.
//!
//! ```text
//! NotStarted -> Started -> day 1 .. day 40 -> Complete
//! ```

mod ladder;
mod level;
mod view;

pub use ladder::EvolutionMap;
pub use level::{Checklist, ChecklistItem, LevelState};
pub use view::{format_remaining, DayNode, DayStatus, LadderView};

use serde::{Deserialize, Serialize};

/// Days per level.
pub const LEVEL_DAYS: u8 = 40;

/// Spacing between consecutive day unlocks.
pub fn unlock_interval() -> chrono::Duration {
    chrono::Duration::hours(24)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    One,
    Two,
    Three,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::One, Level::Two, Level::Three];

    pub fn number(self) -> u8 {
        match self {
            Level::One => 1,
            Level::Two => 2,
            Level::Three => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Level::One),
            2 => Some(Level::Two),
            3 => Some(Level::Three),
            _ => None,
        }
    }

    /// Levels 1 and 2 let the user take a completion back.
    pub fn allows_undo(self) -> bool {
        self != Level::Three
    }

    pub fn requires_checklist(self) -> bool {
        self == Level::Three
    }

    pub fn previous(self) -> Option<Level> {
        match self {
            Level::One => None,
            Level::Two => Some(Level::One),
            Level::Three => Some(Level::Two),
        }
    }

    pub fn next(self) -> Option<Level> {
        match self {
            Level::One => Some(Level::Two),
            Level::Two => Some(Level::Three),
            Level::Three => None,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "level {}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_numbering_roundtrips() {
        for level in Level::ALL {
            assert_eq!(Level::from_number(level.number()), Some(level));
        }
        assert_eq!(Level::from_number(0), None);
        assert_eq!(Level::from_number(4), None);
    }

    #[test]
    fn only_level_three_is_strict() {
        assert!(Level::One.allows_undo());
        assert!(Level::Two.allows_undo());
        assert!(!Level::Three.allows_undo());
        assert!(Level::Three.requires_checklist());
    }
}
