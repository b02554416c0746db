//! Task types for the day planner.
//!
//! Tasks are caller-owned, immutable inputs to the schedule builder. The
//! builder only ever consumes the non-completed subset and never mutates
//! them; the one exception is the `duration_minutes` copy carried by an
//! unscheduled remainder of a split task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Minimum schedulable duration in minutes. Tasks and task fragments
/// below this floor are never placed.
pub const MIN_TASK_MINUTES: i64 = 5;

/// A unit of pending work to be placed into the day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Total duration in minutes
    pub duration_minutes: i64,
    /// Whether the task may be split across multiple slots
    pub splittable: bool,
    /// Whether the task is already done
    pub completed: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a validated task.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] if the name is blank or the duration
    /// is below [`MIN_TASK_MINUTES`]. Validation happens here so invalid
    /// tasks never reach the placement engine.
    pub fn new(name: &str, duration_minutes: i64, splittable: bool) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if duration_minutes < MIN_TASK_MINUTES {
            return Err(ValidationError::DurationTooShort {
                minutes: duration_minutes,
                min: MIN_TASK_MINUTES,
            });
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            duration_minutes,
            splittable,
            completed: false,
            created_at: Utc::now(),
        })
    }

    /// Copy of this task with a reduced duration, used to report the
    /// unplaced remainder of a split task.
    pub fn with_remaining(&self, minutes: i64) -> Self {
        Self {
            duration_minutes: minutes,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_defaults() {
        let task = Task::new("Write report", 30, false).unwrap();
        assert_eq!(task.name, "Write report");
        assert_eq!(task.duration_minutes, 30);
        assert!(!task.splittable);
        assert!(!task.completed);
        assert!(!task.id.is_empty());
    }

    #[test]
    fn test_rejects_blank_name() {
        let err = Task::new("   ", 30, false).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyName));
    }

    #[test]
    fn test_rejects_short_duration() {
        let err = Task::new("Quick check", 3, false).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::DurationTooShort { minutes: 3, min: 5 }
        ));
    }

    #[test]
    fn test_minimum_duration_accepted() {
        assert!(Task::new("Tiny", 5, true).is_ok());
    }

    #[test]
    fn test_with_remaining_keeps_identity() {
        let task = Task::new("Split me", 60, true).unwrap();
        let rest = task.with_remaining(25);
        assert_eq!(rest.id, task.id);
        assert_eq!(rest.duration_minutes, 25);
        assert!(rest.splittable);
    }

    #[test]
    fn test_name_is_trimmed() {
        let task = Task::new("  Padded  ", 10, false).unwrap();
        assert_eq!(task.name, "Padded");
    }
}
