use throwlist_core::lifecycle::{self, NewTask, TaskUpdate, ThrowAction};
use throwlist_core::{Band, Board, DateOnly, Selection, TaskId, ValidationError, ordering};
use tracing::{debug, info};

use crate::batch::{BatchReport, BatchWriter};
use crate::config::AppConfig;
use crate::error::LifecycleError;
use crate::task_store::TaskStore;

/// Service façade that runs every user action as read, compute, write.
///
/// Each call starts from a fresh snapshot of the owner's tasks, computes the
/// field deltas with the pure lifecycle rules, and commits them in chunks.
/// Callers re-read with [`board`](Self::board) afterwards, also after a
/// failure, so the displayed state converges on what was actually stored.
pub struct TaskService<S> {
    store: S,
    owner: String,
    default_band: Band,
    batch_size: usize,
}

impl<S> TaskService<S> {
    /// Build a service for the configured owner.
    #[must_use]
    pub fn new(store: S, config: &AppConfig) -> Self {
        Self {
            store,
            owner: config.owner.clone(),
            default_band: config.default_band(),
            batch_size: config.batch_size,
        }
    }

    /// Owner whose tasks this service reads and writes.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Expose a reference to the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<S: TaskStore> TaskService<S> {
    /// Read the owner's tasks and partition them against `reference`.
    ///
    /// # Errors
    /// Returns [`LifecycleError::Store`] when the store cannot be read.
    pub fn board(&self, reference: DateOnly) -> Result<Board, LifecycleError> {
        let tasks = self
            .store
            .list_all(&self.owner)
            .map_err(|err| LifecycleError::Store(err.into()))?;
        Ok(Board::partition(tasks, reference))
    }

    /// Add a task due on `reference`, appended to `band` (or the configured
    /// default band).
    ///
    /// # Errors
    /// Returns [`LifecycleError::Validation`] for an empty title before
    /// anything is written, or [`LifecycleError::Store`] when the store fails.
    pub fn add(
        &self,
        title: &str,
        band: Option<i64>,
        reference: DateOnly,
    ) -> Result<TaskId, LifecycleError> {
        self.create(title, band, reference, reference)
    }

    /// Add a task scheduled for an explicit `YYYY-MM-DD` due date.
    ///
    /// # Errors
    /// Returns [`LifecycleError::Validation`] for an empty title or due date,
    /// [`LifecycleError::InvalidDate`] for a malformed one, or
    /// [`LifecycleError::Store`] when the store fails.
    pub fn add_due(
        &self,
        title: &str,
        band: Option<i64>,
        due: &str,
        reference: DateOnly,
    ) -> Result<TaskId, LifecycleError> {
        let due = due.trim();
        if due.is_empty() {
            return Err(ValidationError::EmptyDueDate.into());
        }
        let due: DateOnly = due.parse()?;
        self.create(title, band, due, reference)
    }

    fn create(
        &self,
        title: &str,
        band: Option<i64>,
        due: DateOnly,
        reference: DateOnly,
    ) -> Result<TaskId, LifecycleError> {
        let band = band.map_or(self.default_band, Band::clamped);
        let board = self.board(reference)?;
        let mut new_task = NewTask::new(&self.owner, title, Some(band), reference, &board.today)?;
        new_task.due_date = due;
        let id = self
            .store
            .create(&new_task)
            .map_err(|err| LifecycleError::Store(err.into()))?;
        info!(
            task = %id,
            band = %new_task.sort_order,
            sorter = new_task.sorter,
            due = %due,
            "Added task"
        );
        Ok(id)
    }

    /// Push a Today task to tomorrow.
    ///
    /// # Errors
    /// Returns an error when the store cannot be read or written.
    pub fn advance_one_day(
        &self,
        id: &TaskId,
        reference: DateOnly,
    ) -> Result<BatchReport, LifecycleError> {
        let board = self.board(reference)?;
        let update = lifecycle::advance_one_day(&board, id, reference);
        self.commit("advance", id, update.as_slice())
    }

    /// Complete a Today task on `reference`.
    ///
    /// # Errors
    /// Returns an error when the store cannot be read or written.
    pub fn complete(
        &self,
        id: &TaskId,
        reference: DateOnly,
    ) -> Result<BatchReport, LifecycleError> {
        let board = self.board(reference)?;
        let update = lifecycle::complete(&board, id, reference);
        self.commit("complete", id, update.as_slice())
    }

    /// Flag a task as removed without counting a throw.
    ///
    /// # Errors
    /// Returns an error when the store cannot be read or written.
    pub fn remove(&self, id: &TaskId, reference: DateOnly) -> Result<BatchReport, LifecycleError> {
        let board = self.board(reference)?;
        let update = lifecycle::remove(&board, id);
        self.commit("remove", id, update.as_slice())
    }

    /// Bring Future or Removed tasks back onto `reference` in one batch.
    ///
    /// Ids already in Today or unknown to the store are skipped.
    ///
    /// # Errors
    /// Returns an error when the store cannot be read, or a partial-batch
    /// error when a chunk fails.
    pub fn restore(
        &self,
        ids: &[TaskId],
        reference: DateOnly,
    ) -> Result<BatchReport, LifecycleError> {
        let board = self.board(reference)?;
        let updates = lifecycle::restore_all(&board, ids, reference);
        if updates.len() < ids.len() {
            debug!(
                requested = ids.len(),
                eligible = updates.len(),
                "Ignoring ids outside Future and Removed"
            );
        }
        self.write("restore", &updates)
    }

    /// Drag a Today task to `target_index` and renumber the whole list.
    ///
    /// # Errors
    /// Returns an error when the store cannot be read or written.
    pub fn reorder(
        &self,
        id: &TaskId,
        target_index: i64,
        reference: DateOnly,
    ) -> Result<BatchReport, LifecycleError> {
        let board = self.board(reference)?;
        let placements = ordering::reorder(&board.today, id, target_index);
        let updates = lifecycle::reposition(&board.today, &placements);
        self.commit("reorder", id, &updates)
    }

    /// Move a Today task to the end of `band`.
    ///
    /// # Errors
    /// Returns an error when the store cannot be read or written.
    pub fn change_band(
        &self,
        id: &TaskId,
        band: i64,
        reference: DateOnly,
    ) -> Result<BatchReport, LifecycleError> {
        let board = self.board(reference)?;
        let placement = ordering::change_band(id, band, &board.today);
        let updates = lifecycle::reposition(&board.today, placement.as_slice());
        self.commit("band", id, &updates)
    }

    /// Throw every selected Today task at once.
    ///
    /// The selection is cleared afterwards whether the write succeeded or not.
    /// After a [`LifecycleError::PartialBatch`], retry by selecting the
    /// pending ids again: the deltas are recomputed from a fresh read.
    ///
    /// # Errors
    /// Returns an error when the store cannot be read, or a partial-batch
    /// error when a chunk fails.
    pub fn throw(
        &self,
        selection: &mut Selection,
        action: ThrowAction,
        reference: DateOnly,
    ) -> Result<BatchReport, LifecycleError> {
        let result = self.board(reference).and_then(|board| {
            let updates = lifecycle::throw(&board, selection, action, reference);
            if updates.len() < selection.len() {
                debug!(
                    selected = selection.len(),
                    eligible = updates.len(),
                    "Ignoring selected tasks outside Today"
                );
            }
            self.write("throw", &updates)
        });
        selection.clear();
        if let Ok(report) = &result {
            info!(%action, count = report.committed.len(), "Threw tasks");
        }
        result
    }

    fn commit(
        &self,
        action: &'static str,
        id: &TaskId,
        updates: &[TaskUpdate],
    ) -> Result<BatchReport, LifecycleError> {
        if updates.is_empty() {
            debug!(action, task = %id, "No change for task");
        }
        self.write(action, updates)
    }

    fn write(
        &self,
        action: &'static str,
        updates: &[TaskUpdate],
    ) -> Result<BatchReport, LifecycleError> {
        if updates.is_empty() {
            return Ok(BatchReport::default());
        }
        debug!(action, count = updates.len(), "Writing updates");
        BatchWriter::new(&self.store, self.batch_size).commit(updates)
    }
}
