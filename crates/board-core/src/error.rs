//! Error types for store access and board operations.

use thiserror::Error;

use crate::domain::Collection;

/// Failures talking to the remote JSON store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Store responded {status} {status_text}")]
    Status { status: u16, status_text: String },

    #[error("Invalid JSON payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid store path: {0}")]
    InvalidPath(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => StoreError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            },
            None => StoreError::Transport(err.to_string()),
        }
    }
}

/// Failures of board-level operations.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{collection} record {id} not found")]
    NotFound { collection: Collection, id: String },

    #[error("Malformed record: {0}")]
    Malformed(String),

    #[error("Subtask {index} out of range for {id} ({len} subtasks)")]
    SubtaskOutOfRange { id: String, index: usize, len: usize },

    #[error("Task {id} has {total} subtasks but {checked} checkbox states")]
    SubtaskMismatch { id: String, total: usize, checked: usize },
}

/// Invalid store configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Store URL is empty")]
    EmptyUrl,

    #[error("Store URL must start with http:// or https://: {0}")]
    UnsupportedScheme(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
pub type BoardResult<T> = Result<T, BoardError>;
