//! Typed state store over a per-user document.
//!
//! The backend only knows how to load and upsert one JSON document per user.
//! [`DocumentStore`] turns that into per-entity reads and writes so the core
//! never depends on the document's shape.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};
use crate::evolution::EvolutionMap;
use crate::goals::GoalList;
use crate::state::AppState;
use crate::timer::{ExecutionRecord, ExecutionTimer};
use crate::tracking::{DayLogBook, RoutineList};

const ROUTINES: &str = "routines";
const DAY_LOGS: &str = "day_logs";
const EVOLUTION: &str = "evolution";
const TIMER: &str = "timer";
const GOALS: &str = "goals";
const EXECUTIONS: &str = "executions";

/// Whole-document persistence keyed by user id. Writes are upserts of the
/// entire document; last write wins.
pub trait DocumentBackend {
    fn load(&self, user_id: &str) -> Result<Option<Value>>;
    fn save(&mut self, user_id: &str, document: &Value) -> Result<()>;
}

/// Per-entity access to a user's state.
pub trait StateStore {
    fn load_routines(&self) -> Result<RoutineList>;
    fn save_routines(&mut self, routines: &RoutineList) -> Result<()>;

    fn load_day_logs(&self) -> Result<DayLogBook>;
    fn save_day_logs(&mut self, logs: &DayLogBook) -> Result<()>;

    fn load_evolution(&self) -> Result<EvolutionMap>;
    fn save_evolution(&mut self, evolution: &EvolutionMap) -> Result<()>;

    fn load_timer(&self) -> Result<ExecutionTimer>;
    fn save_timer(&mut self, timer: &ExecutionTimer) -> Result<()>;

    fn load_goals(&self) -> Result<GoalList>;
    fn save_goals(&mut self, goals: &GoalList) -> Result<()>;

    fn load_executions(&self) -> Result<Vec<ExecutionRecord>>;
    fn save_executions(&mut self, executions: &[ExecutionRecord]) -> Result<()>;

    fn load_state(&self) -> Result<AppState> {
        Ok(AppState {
            routines: self.load_routines()?,
            day_logs: self.load_day_logs()?,
            evolution: self.load_evolution()?,
            timer: self.load_timer()?,
            goals: self.load_goals()?,
            executions: self.load_executions()?,
        })
    }

    /// Persist every entity. Implementations backed by a single document
    /// should write it in one step so a failure leaves nothing half-saved.
    fn save_state(&mut self, state: &AppState) -> Result<()> {
        self.save_routines(&state.routines)?;
        self.save_day_logs(&state.day_logs)?;
        self.save_evolution(&state.evolution)?;
        self.save_timer(&state.timer)?;
        self.save_goals(&state.goals)?;
        self.save_executions(&state.executions)
    }
}

/// [`StateStore`] backed by one document per user.
pub struct DocumentStore<B> {
    backend: B,
    user_id: String,
}

impl<B: DocumentBackend> DocumentStore<B> {
    pub fn new(backend: B, user_id: impl Into<String>) -> Self {
        Self {
            backend,
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn document(&self) -> Result<Map<String, Value>> {
        match self.backend.load(&self.user_id)? {
            Some(Value::Object(map)) => Ok(map),
            Some(other) => Err(CoreError::Custom(format!(
                "stored document for user '{}' is not a JSON object: {}",
                self.user_id,
                kind_of(&other)
            ))),
            None => Ok(Map::new()),
        }
    }

    fn read<T: DeserializeOwned + Default>(&self, field: &str) -> Result<T> {
        match self.document()?.remove(field) {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(T::default()),
        }
    }

    fn write<T: Serialize + ?Sized>(&mut self, field: &str, value: &T) -> Result<()> {
        let mut doc = self.document()?;
        doc.insert(field.to_string(), serde_json::to_value(value)?);
        self.backend
            .save(&self.user_id, &Value::Object(doc))
            .inspect_err(|e| tracing::warn!(user_id = %self.user_id, field, error = %e, "failed to save state"))
    }

    /// Merge several fields into the document with a single upsert.
    fn write_all(&mut self, fields: Map<String, Value>) -> Result<()> {
        let mut doc = self.document()?;
        doc.extend(fields);
        self.backend
            .save(&self.user_id, &Value::Object(doc))
            .inspect_err(|e| tracing::warn!(user_id = %self.user_id, error = %e, "failed to save state"))
    }
}

impl<B: DocumentBackend> StateStore for DocumentStore<B> {
    fn load_routines(&self) -> Result<RoutineList> {
        self.read(ROUTINES)
    }

    fn save_routines(&mut self, routines: &RoutineList) -> Result<()> {
        self.write(ROUTINES, routines)
    }

    fn load_day_logs(&self) -> Result<DayLogBook> {
        self.read(DAY_LOGS)
    }

    fn save_day_logs(&mut self, logs: &DayLogBook) -> Result<()> {
        self.write(DAY_LOGS, logs)
    }

    fn load_evolution(&self) -> Result<EvolutionMap> {
        self.read(EVOLUTION)
    }

    fn save_evolution(&mut self, evolution: &EvolutionMap) -> Result<()> {
        self.write(EVOLUTION, evolution)
    }

    fn load_timer(&self) -> Result<ExecutionTimer> {
        self.read(TIMER)
    }

    fn save_timer(&mut self, timer: &ExecutionTimer) -> Result<()> {
        self.write(TIMER, timer)
    }

    fn load_goals(&self) -> Result<GoalList> {
        self.read(GOALS)
    }

    fn save_goals(&mut self, goals: &GoalList) -> Result<()> {
        self.write(GOALS, goals)
    }

    fn load_executions(&self) -> Result<Vec<ExecutionRecord>> {
        self.read(EXECUTIONS)
    }

    fn save_executions(&mut self, executions: &[ExecutionRecord]) -> Result<()> {
        self.write(EXECUTIONS, executions)
    }

    /// One read for the whole state.
    fn load_state(&self) -> Result<AppState> {
        Ok(serde_json::from_value(Value::Object(self.document()?))?)
    }

    /// One upsert for the whole state; fields this version does not know
    /// about are kept.
    fn save_state(&mut self, state: &AppState) -> Result<()> {
        match serde_json::to_value(state)? {
            Value::Object(fields) => self.write_all(fields),
            other => Err(CoreError::Custom(format!(
                "state serialized to {} instead of an object",
                kind_of(&other)
            ))),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// In-process backend, for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    documents: HashMap<String, Value>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentBackend for MemoryBackend {
    fn load(&self, user_id: &str) -> Result<Option<Value>> {
        Ok(self.documents.get(user_id).cloned())
    }

    fn save(&mut self, user_id: &str, document: &Value) -> Result<()> {
        self.documents.insert(user_id.to_string(), document.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::evolution::Level;

    #[test]
    fn missing_document_loads_defaults() {
        let store = DocumentStore::new(MemoryBackend::new(), "u1");
        assert_eq!(store.load_state().unwrap(), AppState::default());
    }

    #[test]
    fn entity_writes_preserve_other_fields() {
        let mut store = DocumentStore::new(MemoryBackend::new(), "u1");
        let mut routines = RoutineList::new();
        routines.add("Read 20 pages").unwrap();
        store.save_routines(&routines).unwrap();

        let mut evolution = EvolutionMap::new();
        evolution.start_level(Level::One, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        store.save_evolution(&evolution).unwrap();

        let state = store.load_state().unwrap();
        assert_eq!(state.routines, routines);
        assert_eq!(state.evolution, evolution);
        assert_eq!(store.load_routines().unwrap(), routines);
    }

    #[test]
    fn users_are_isolated() {
        let mut backend = MemoryBackend::new();
        backend
            .save("other", &serde_json::json!({ "goals": [] }))
            .unwrap();
        let store = DocumentStore::new(backend, "me");
        assert!(store.load_goals().unwrap().is_empty());
        assert_eq!(store.user_id(), "me");
    }

    #[test]
    fn non_object_document_is_an_error() {
        let mut backend = MemoryBackend::new();
        backend.save("u1", &serde_json::json!([1, 2, 3])).unwrap();
        let mut store = DocumentStore::new(backend, "u1");

        assert!(matches!(store.load_state(), Err(CoreError::Custom(_))));
        assert!(store.save_goals(&GoalList::new()).is_err());
        assert_eq!(
            store.backend().load("u1").unwrap(),
            Some(serde_json::json!([1, 2, 3]))
        );
    }

    #[test]
    fn save_state_writes_everything_and_keeps_unknown_fields() {
        let mut backend = MemoryBackend::new();
        backend
            .save("u1", &serde_json::json!({ "notes": ["keep me"] }))
            .unwrap();
        let mut store = DocumentStore::new(backend, "u1");

        let mut state = AppState::default();
        state.routines.add("Stretch").unwrap();
        state.executions.push(ExecutionRecord {
            deliverable: "Invoice".into(),
            duration_secs: 600,
            started_at: Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap(),
            finished_at: Utc.with_ymd_and_hms(2026, 1, 1, 9, 10, 0).unwrap(),
        });
        store.save_state(&state).unwrap();

        assert_eq!(store.load_state().unwrap(), state);
        let doc = store.backend().load("u1").unwrap().unwrap();
        assert_eq!(doc["notes"], serde_json::json!(["keep me"]));
    }
}
