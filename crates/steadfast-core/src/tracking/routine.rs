use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A recurring daily routine the user checks off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub id: String,
    pub title: String,
}

/// Ordered set of the user's routines. Its length is the denominator of
/// day validity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutineList {
    routines: Vec<Routine>,
}

impl RoutineList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.routines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Routine> {
        self.routines.iter()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.routines.iter().any(|r| r.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Routine> {
        self.routines.iter().find(|r| r.id == id)
    }

    /// Add a routine with a fresh id.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyField`] for a blank title.
    pub fn add(&mut self, title: &str) -> Result<&Routine, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyField("title".into()));
        }
        self.routines.push(Routine {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
        });
        Ok(&self.routines[self.routines.len() - 1])
    }

    /// Remove a routine by id. Past day logs keep the validity they were
    /// recorded with.
    ///
    /// # Errors
    /// Returns [`ValidationError::UnknownId`] when no routine has that id.
    pub fn remove(&mut self, id: &str) -> Result<Routine, ValidationError> {
        let pos = self
            .routines
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| ValidationError::UnknownId {
                kind: "routine".into(),
                id: id.to_string(),
            })?;
        Ok(self.routines.remove(pos))
    }
}

impl FromIterator<Routine> for RoutineList {
    fn from_iter<I: IntoIterator<Item = Routine>>(iter: I) -> Self {
        Self {
            routines: iter.into_iter().collect(),
        }
    }
}
