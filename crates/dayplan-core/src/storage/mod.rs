//! Key-value persistence for tasks, plan snapshots, and learned state.
//!
//! The core does not own a storage format beyond "JSON string under a
//! string key". Two backends implement the [`KeyValueStore`] contract:
//! an in-memory map for tests and ephemeral runs, and a single-table
//! SQLite store for the CLI. Configuration is separate, TOML on disk.

mod config;
mod memory;
mod sqlite;
pub mod schedule;
pub mod tasks;

pub use config::{Config, ScheduleConfig};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::path::PathBuf;

use crate::error::StorageError;

/// Well-known storage keys.
pub mod keys {
    /// Ordered task list (JSON array of tasks).
    pub const TASKS: &str = "tasks";
    /// Q-table snapshot plus episode counter.
    pub const Q_TABLE: &str = "q_table";
    /// Last start time the user planned from, as `HH:MM`.
    pub const LAST_START_TIME: &str = "last_start_time";
    /// RL decision awaiting feedback.
    pub const PENDING_EPISODE: &str = "pending_episode";
}

/// Abstract key-value persistence collaborator.
///
/// Values are opaque strings (JSON in practice). Implementations are the
/// only long-lived state holders; the scheduling core itself is stateless
/// between invocations apart from what it reads and writes here.
pub trait KeyValueStore {
    /// Fetch the value under `key`, if present.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Returns `~/.config/dayplan[-dev]/`, creating it if needed.
///
/// Set `DAYPLAN_DATA_DIR` to force an explicit directory (used by tests),
/// or `DAYPLAN_ENV=dev` to keep development data separate.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    if let Ok(dir) = std::env::var("DAYPLAN_DATA_DIR") {
        let dir = PathBuf::from(dir);
        std::fs::create_dir_all(&dir).map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        return Ok(dir);
    }

    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DAYPLAN_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("dayplan-dev")
    } else {
        base_dir.join("dayplan")
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::QueryFailed(e.to_string()))?;
    Ok(dir)
}
