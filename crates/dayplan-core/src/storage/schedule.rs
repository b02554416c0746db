//! Plan snapshot persistence.
//!
//! A generated plan is stored per calendar date and start time so the user
//! can re-open the proposal they generated for "today from 09:30" without
//! recomputing it. Keys are derived deterministically as
//! `schedule_<YYYY-MM-DD>_<HH:MM>`.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::{keys, KeyValueStore};
use crate::error::StorageError;
use crate::placement::ScheduledItem;
use crate::task::Task;

/// Persisted form of one generated plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanSnapshot {
    pub scheduled: Vec<ScheduledItem>,
    pub unscheduled: Vec<Task>,
}

/// Storage key for the plan generated at `start`.
pub fn schedule_key(start: DateTime<Utc>) -> String {
    format!("schedule_{}", start.format("%Y-%m-%d_%H:%M"))
}

/// Persist a plan snapshot under its date/start-time key.
pub fn save_plan(
    store: &mut dyn KeyValueStore,
    start: DateTime<Utc>,
    snapshot: &PlanSnapshot,
) -> Result<(), StorageError> {
    let key = schedule_key(start);
    let raw = serde_json::to_string(snapshot).map_err(|e| StorageError::CorruptValue {
        key: key.clone(),
        message: e.to_string(),
    })?;
    store.set(&key, &raw)
}

/// Load the plan generated at `start`, if one was stored.
pub fn load_plan(
    store: &dyn KeyValueStore,
    start: DateTime<Utc>,
) -> Result<Option<PlanSnapshot>, StorageError> {
    let key = schedule_key(start);
    match store.get(&key)? {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::CorruptValue {
                key,
                message: e.to_string(),
            }),
    }
}

/// Drop the plan stored for `start`.
pub fn clear_plan(store: &mut dyn KeyValueStore, start: DateTime<Utc>) -> Result<(), StorageError> {
    store.remove(&schedule_key(start))
}

/// Remember the start time the user last planned from, as `HH:MM`.
pub fn save_last_start(store: &mut dyn KeyValueStore, start: DateTime<Utc>) -> Result<(), StorageError> {
    let value = format!("{:02}:{:02}", start.hour(), start.minute());
    store.set(keys::LAST_START_TIME, &value)
}

/// The last used start time, if any.
pub fn load_last_start(store: &dyn KeyValueStore) -> Result<Option<String>, StorageError> {
    store.get(keys::LAST_START_TIME)
}
