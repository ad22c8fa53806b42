//! Error types for throwlist JSON store operations.

use std::path::PathBuf;

use thiserror::Error;
use throwlist_core::ValidationError;

/// Errors that can occur during `JsonStore` operations.
#[derive(Error, Debug)]
pub enum JsonStoreError {
    /// Input rejected before anything was written.
    #[error("Invalid task: {0}")]
    Validation(#[from] ValidationError),

    /// The store file exists but does not hold a task document.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// Store file.
        path: PathBuf,
        /// Underlying decoder error.
        source: serde_json::Error,
    },

    /// Failed to encode the task document.
    #[error("Failed to serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The advisory lock next to the store file could not be taken.
    #[error("Failed to lock {path}: {source}")]
    Lock {
        /// Store file being locked.
        path: PathBuf,
        /// Underlying lock error.
        source: std::io::Error,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tempfile::PersistError> for JsonStoreError {
    fn from(err: tempfile::PersistError) -> Self {
        Self::Io(err.error)
    }
}
