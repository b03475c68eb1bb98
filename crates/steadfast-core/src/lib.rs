//! # Steadfast Core Library
//!
//! This library provides the core logic for Steadfast, a personal discipline
//! tracker. All operations are available via the standalone `steadfast` CLI;
//! any graphical front end is a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Tracking**: routines, per-day check-off logs with derived validity,
//!   and the streak calculator
//! - **Evolution**: a three-level, 40-day ladder gated by sequence and by a
//!   24-hour time unlock
//! - **Timer**: a wall-clock execution timer with a mandatory deliverable
//! - **Storage**: a typed state store over one JSON document per user,
//!   backed by SQLite, plus TOML configuration
//!
//! Time always comes from an injected [`Clock`], and all state lives in an
//! explicit [`AppState`] driven through a [`Session`].
//!
//! ## Key Components
//!
//! - [`EvolutionMap`]: ladder state machine
//! - [`StreakCalculator`]: current and longest streaks
//! - [`ExecutionTimer`]: countdown state machine
//! - [`StateStore`]: per-entity persistence interface
//! - [`Config`]: application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod evolution;
pub mod goals;
pub mod session;
pub mod state;
pub mod storage;
pub mod timer;
pub mod tracking;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use evolution::{ChecklistItem, DayStatus, EvolutionMap, LadderView, Level, LevelState};
pub use goals::{Goal, GoalList};
pub use session::Session;
pub use state::AppState;
pub use storage::{Config, Database, DocumentBackend, DocumentStore, MemoryBackend, StateStore};
pub use timer::{ExecutionRecord, ExecutionTimer, TimerSetup, TimerStatus};
pub use tracking::{DayLog, DayLogBook, DayLogStats, DayMode, Routine, RoutineList, StreakCalculator};
