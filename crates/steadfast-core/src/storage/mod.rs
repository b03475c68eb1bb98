mod config;
pub mod database;
pub mod migrations;
mod store;

pub use config::{Config, EvolutionConfig, NotificationsConfig, TimerConfig, TrackingConfig};
pub use database::Database;
pub use store::{DocumentBackend, DocumentStore, MemoryBackend, StateStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the directory holding `config.toml` and `steadfast.db`.
///
/// `STEADFAST_DATA_DIR` wins when set. Otherwise `~/.config/steadfast[-dev]/`,
/// with `STEADFAST_ENV=dev` selecting the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("STEADFAST_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("STEADFAST_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("steadfast-dev")
            } else {
                base_dir.join("steadfast")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
