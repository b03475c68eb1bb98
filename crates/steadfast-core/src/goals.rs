//! Personal goals: a flat list of titled items that can be ticked off.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub done: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalList {
    goals: Vec<Goal>,
}

impl GoalList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Goal> {
        self.goals.iter()
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn open_count(&self) -> usize {
        self.goals.iter().filter(|g| !g.done).count()
    }

    /// # Errors
    /// Returns [`ValidationError::EmptyField`] for a blank title.
    pub fn add(&mut self, title: &str, now: DateTime<Utc>) -> Result<&Goal, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyField("title".into()));
        }
        self.goals.push(Goal {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            done: false,
            created_at: now,
            completed_at: None,
        });
        Ok(&self.goals[self.goals.len() - 1])
    }

    /// Flip a goal between open and done.
    ///
    /// # Errors
    /// Returns [`ValidationError::UnknownId`] when no goal has that id.
    pub fn toggle(&mut self, id: &str, now: DateTime<Utc>) -> Result<&Goal, ValidationError> {
        let goal = self
            .goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| unknown(id))?;
        goal.done = !goal.done;
        goal.completed_at = goal.done.then_some(now);
        Ok(&*goal)
    }

    /// # Errors
    /// Returns [`ValidationError::UnknownId`] when no goal has that id.
    pub fn remove(&mut self, id: &str) -> Result<Goal, ValidationError> {
        let pos = self
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| unknown(id))?;
        Ok(self.goals.remove(pos))
    }
}

fn unknown(id: &str) -> ValidationError {
    ValidationError::UnknownId {
        kind: "goal".into(),
        id: id.to_string(),
    }
}
