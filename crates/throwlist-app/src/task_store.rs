//! Repository contract consumed by the lifecycle service.

use anyhow::Error;
use std::sync::Arc;
use throwlist_core::{NewTask, Task, TaskId, TaskUpdate};
use throwlist_store_json::{JsonStore, JsonStoreError};

/// Largest number of task writes a store commits as one atomic unit by default.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 450;

/// Minimal storage abstraction required by [`TaskService`](crate::service::TaskService).
///
/// Stores behave like an unordered set keyed by task id with field-level
/// merge writes. There is no compare-and-swap: concurrent writers race and the
/// last write to a field wins.
pub trait TaskStore {
    /// Error type bubbled up from the backing store.
    type Error: Into<Error>;

    /// Persist a new task and return the identifier the store assigned.
    ///
    /// # Errors
    /// Returns a store-specific error when the title or owner is empty or the
    /// write fails.
    fn create(&self, task: &NewTask) -> Result<TaskId, Self::Error>;

    /// Point-in-time snapshot of every task of `owner`, normalized on read.
    ///
    /// # Errors
    /// Returns a store-specific error when the tasks cannot be read.
    fn list_all(&self, owner: &str) -> Result<Vec<Task>, Self::Error>;

    /// Commit `updates` as one atomic unit, stamping `updated_at` on every
    /// written task. Unknown ids are skipped without error.
    ///
    /// # Errors
    /// Returns a store-specific error when the batch could not be committed;
    /// nothing from the batch is applied in that case.
    fn commit_batch(&self, updates: &[TaskUpdate]) -> Result<(), Self::Error>;

    /// Upper bound on the number of updates passed to one
    /// [`commit_batch`](Self::commit_batch) call.
    fn max_batch_size(&self) -> usize {
        DEFAULT_MAX_BATCH_SIZE
    }
}

impl<S: TaskStore + ?Sized> TaskStore for Arc<S> {
    type Error = S::Error;

    fn create(&self, task: &NewTask) -> Result<TaskId, Self::Error> {
        (**self).create(task)
    }

    fn list_all(&self, owner: &str) -> Result<Vec<Task>, Self::Error> {
        (**self).list_all(owner)
    }

    fn commit_batch(&self, updates: &[TaskUpdate]) -> Result<(), Self::Error> {
        (**self).commit_batch(updates)
    }

    fn max_batch_size(&self) -> usize {
        (**self).max_batch_size()
    }
}

impl TaskStore for JsonStore {
    type Error = JsonStoreError;

    fn create(&self, task: &NewTask) -> Result<TaskId, Self::Error> {
        Self::create(self, task)
    }

    fn list_all(&self, owner: &str) -> Result<Vec<Task>, Self::Error> {
        Self::list_all(self, owner)
    }

    fn commit_batch(&self, updates: &[TaskUpdate]) -> Result<(), Self::Error> {
        Self::commit_batch(self, updates).map(|_| ())
    }
}
