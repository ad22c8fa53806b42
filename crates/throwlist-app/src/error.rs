//! Errors surfaced by task lifecycle operations.

use anyhow::Error;
use throwlist_core::{DateError, TaskId, ValidationError};

/// Error returned by [`TaskService`](crate::service::TaskService) operations.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// Input rejected before any write.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// A date argument could not be parsed.
    #[error(transparent)]
    InvalidDate(#[from] DateError),

    /// A bulk write stopped partway. `committed` tasks were written, `pending`
    /// ones were not. Callers re-read the task set before retrying `pending`;
    /// the original deltas must not be replayed.
    #[error(
        "batch write stopped after {} of {} tasks: {source}",
        .committed.len(),
        .committed.len() + .pending.len()
    )]
    PartialBatch {
        /// Tasks whose chunk committed, in commit order.
        committed: Vec<TaskId>,
        /// Tasks from the failed chunk onward.
        pending: Vec<TaskId>,
        /// Store failure that stopped the batch.
        source: Error,
    },

    /// Reading the task set or creating a task failed; nothing was written.
    #[error("store error: {0}")]
    Store(#[from] Error),
}

impl LifecycleError {
    /// Ids left unwritten by a partial batch, empty for any other error.
    #[must_use]
    pub fn pending(&self) -> &[TaskId] {
        match self {
            Self::PartialBatch { pending, .. } => pending,
            _ => &[],
        }
    }
}
