//! Error types for hubcal.

use thiserror::Error;

/// Errors that can occur in hubcal operations.
#[derive(Error, Debug)]
pub enum HubCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid {field} '{value}'. Expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("Event '{event_id}' has an invalid {field}: '{value}'")]
    InvalidEventDate {
        event_id: String,
        field: &'static str,
        value: String,
    },

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for HubCalError {
    fn from(e: serde_json::Error) -> Self {
        HubCalError::Serialization(e.to_string())
    }
}

/// Result type alias for hubcal operations.
pub type HubCalResult<T> = Result<T, HubCalError>;
