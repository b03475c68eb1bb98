use serde::{Deserialize, Serialize};

use crate::evolution::EvolutionMap;
use crate::goals::GoalList;
use crate::timer::{ExecutionRecord, ExecutionTimer};
use crate::tracking::{DayLogBook, RoutineList};

/// Everything one user owns, as a single value.
///
/// Transitions operate on the parts of this struct; nothing is held in
/// globals. Serialized, it is the per-user document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub routines: RoutineList,
    #[serde(default)]
    pub day_logs: DayLogBook,
    #[serde(default)]
    pub evolution: EvolutionMap,
    #[serde(default)]
    pub timer: ExecutionTimer,
    #[serde(default)]
    pub goals: GoalList,
    #[serde(default)]
    pub executions: Vec<ExecutionRecord>,
}
