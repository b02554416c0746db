//! Core error types for dayplan-core.
//!
//! This module defines the error hierarchy used across the library,
//! built with thiserror. Nothing in the core is fatal: every variant
//! here is recoverable by the caller, and placement infeasibility is
//! reported as data (`unscheduled`), never as an error.

use thiserror::Error;

/// Core error type for dayplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Credential-related errors
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Calendar API errors
    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    /// Break-policy errors
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Validation errors raised before inputs reach the schedule builder.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Task name missing or blank
    #[error("Task name must not be empty")]
    EmptyName,

    /// Task duration below the minimum chunk size
    #[error("Task duration {minutes} min is below the minimum of {min} min")]
    DurationTooShort { minutes: i64, min: i64 },

    /// Invalid time range
    #[error("Invalid time range: end ({end}) must be greater than start ({start})")]
    InvalidTimeRange {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: std::path::PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Stored value failed to deserialize
    #[error("Corrupt value under key '{key}': {message}")]
    CorruptValue { key: String, message: String },

    /// Config file errors
    #[error("Failed to load configuration from {path}: {message}")]
    ConfigLoadFailed {
        path: std::path::PathBuf,
        message: String,
    },

    /// Config save errors
    #[error("Failed to save configuration to {path}: {message}")]
    ConfigSaveFailed {
        path: std::path::PathBuf,
        message: String,
    },
}

/// Credential-provider errors. Always recoverable: the planner degrades
/// to "no fixed commitments" when no token can be produced.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// No token stored for the service
    #[error("Not authenticated with {service}")]
    NotAuthenticated { service: String },

    /// Keyring access failed
    #[error("Keyring access failed: {0}")]
    Keyring(String),
}

/// Calendar API errors.
#[derive(Error, Debug)]
pub enum CalendarError {
    /// Request failed at the transport level
    #[error("Calendar request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-success status
    #[error("Calendar API returned status {status}")]
    Status { status: u16 },

    /// Response body was not in the expected shape
    #[error("Unexpected calendar response: {0}")]
    UnexpectedResponse(String),

    /// Credentials unavailable
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// Break-policy errors. A failure here must never block schedule
/// generation; the planner falls back to the traditional path.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// Agent snapshot could not be written back
    #[error("Failed to persist policy snapshot: {0}")]
    PersistFailed(String),

    /// No decision is pending for a feedback episode
    #[error("No pending decision to attach feedback to")]
    NoPendingDecision,
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::QueryFailed(err.to_string())
    }
}

impl From<keyring::Error> for CredentialError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::NoEntry => CredentialError::NotAuthenticated {
                service: "google".to_string(),
            },
            other => CredentialError::Keyring(other.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
