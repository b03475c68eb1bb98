pub mod config;
pub mod day;
pub mod evolution;
pub mod goal;
pub mod routine;
pub mod timer;

use serde::Serialize;
use steadfast_core::{Config, Database, DocumentStore, Event, Session, SystemClock};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

pub type CliSession = Session<DocumentStore<Database>, SystemClock>;

/// Open the configured user's session on the default database.
pub fn open_session() -> Result<CliSession, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let store = DocumentStore::new(db, config.user_id.clone());
    Ok(Session::open(store, SystemClock, config)?)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an accepted event, or an `ignored` marker when the action was
/// refused by a gate.
pub fn print_event(event: Option<Event>, reason: &str) -> CliResult {
    match event {
        Some(event) => print_json(&event),
        None => print_json(&serde_json::json!({ "type": "ignored", "reason": reason })),
    }
}
