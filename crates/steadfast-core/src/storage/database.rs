//! SQLite document backend.
//!
//! Holds one JSON document per user in the `documents` table:
//! - `user_id`: primary key
//! - `body`: the serialized [`AppState`](crate::AppState)
//! - `updated_at`: RFC 3339 timestamp of the last upsert

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use super::data_dir;
use super::migrations;
use super::store::DocumentBackend;
use crate::error::{DatabaseError, Result};

/// SQLite database holding per-user documents.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data dir>/steadfast.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("steadfast.db");
        Self::open_at(&path)
    }

    /// Open (or create) a database file at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Ids of every user with a stored document.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn user_ids(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT user_id FROM documents ORDER BY user_id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        Ok(ids)
    }
}

impl DocumentBackend for Database {
    fn load(&self, user_id: &str) -> Result<Option<Value>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;
        match body {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, user_id: &str, document: &Value) -> Result<()> {
        let body = serde_json::to_string(document)?;
        self.conn.execute(
            "INSERT INTO documents (user_id, body, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
            params![user_id, body, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}
