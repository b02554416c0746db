//! Ordered task list persistence.
//!
//! The task list lives as one JSON array under the `tasks` key. Order is
//! meaningful: the placement engine consumes tasks in list order, so the
//! reorder operation here is the only prioritization mechanism there is.

use super::{keys, KeyValueStore};
use crate::error::StorageError;
use crate::task::Task;

/// Direction for [`shift_task`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    Up,
    Down,
}

/// Load the full task list. A missing key is an empty list; a corrupt
/// value is reported, not silently dropped.
pub fn load_tasks(store: &dyn KeyValueStore) -> Result<Vec<Task>, StorageError> {
    match store.get(keys::TASKS)? {
        None => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(&raw).map_err(|e| StorageError::CorruptValue {
            key: keys::TASKS.to_string(),
            message: e.to_string(),
        }),
    }
}

/// Replace the stored task list.
pub fn save_tasks(store: &mut dyn KeyValueStore, tasks: &[Task]) -> Result<(), StorageError> {
    let raw = serde_json::to_string(tasks).map_err(|e| StorageError::CorruptValue {
        key: keys::TASKS.to_string(),
        message: e.to_string(),
    })?;
    store.set(keys::TASKS, &raw)
}

/// Append a task to the end of the list.
pub fn add_task(store: &mut dyn KeyValueStore, task: Task) -> Result<(), StorageError> {
    let mut tasks = load_tasks(store)?;
    tasks.push(task);
    save_tasks(store, &tasks)
}

/// Flip the completed flag of the task with `id`. Returns whether a task
/// was found.
pub fn toggle_completed(store: &mut dyn KeyValueStore, id: &str) -> Result<bool, StorageError> {
    let mut tasks = load_tasks(store)?;
    let mut found = false;
    for task in &mut tasks {
        if task.id == id {
            task.completed = !task.completed;
            found = true;
        }
    }
    if found {
        save_tasks(store, &tasks)?;
    }
    Ok(found)
}

/// Delete the task with `id`. Returns whether a task was removed.
pub fn remove_task(store: &mut dyn KeyValueStore, id: &str) -> Result<bool, StorageError> {
    let mut tasks = load_tasks(store)?;
    let before = tasks.len();
    tasks.retain(|t| t.id != id);
    let removed = tasks.len() != before;
    if removed {
        save_tasks(store, &tasks)?;
    }
    Ok(removed)
}

/// Move the task with `id` one position up or down the list. Moves past
/// either end are ignored. Returns whether the list changed.
pub fn shift_task(
    store: &mut dyn KeyValueStore,
    id: &str,
    direction: ShiftDirection,
) -> Result<bool, StorageError> {
    let mut tasks = load_tasks(store)?;
    let Some(index) = tasks.iter().position(|t| t.id == id) else {
        return Ok(false);
    };

    let target = match direction {
        ShiftDirection::Up if index > 0 => index - 1,
        ShiftDirection::Down if index + 1 < tasks.len() => index + 1,
        _ => return Ok(false),
    };

    tasks.swap(index, target);
    save_tasks(store, &tasks)?;
    Ok(true)
}
