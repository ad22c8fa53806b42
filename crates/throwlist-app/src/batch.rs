//! Chunked, sequential commit of a computed delta list.

use throwlist_core::{TaskId, TaskUpdate};
use tracing::{info, warn};

use crate::error::LifecycleError;
use crate::task_store::TaskStore;

/// Summary of a fully committed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Tasks written, in commit order.
    pub committed: Vec<TaskId>,
    /// Number of atomic chunks used.
    pub chunks: usize,
}

impl BatchReport {
    /// Returns true when nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }
}

/// Splits updates into chunks no larger than the store allows and commits them
/// in order.
///
/// Each chunk is atomic; the batch as a whole is not. A failure stops at the
/// failing chunk and reports which tasks made it.
pub struct BatchWriter<'a, S> {
    store: &'a S,
    chunk_size: usize,
}

impl<'a, S: TaskStore> BatchWriter<'a, S> {
    /// Writer using `requested` as chunk size, capped by the store's limit.
    pub fn new(store: &'a S, requested: usize) -> Self {
        let limit = store.max_batch_size().max(1);
        Self {
            store,
            chunk_size: requested.clamp(1, limit),
        }
    }

    /// Effective chunk size.
    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Commit `updates` chunk by chunk.
    ///
    /// # Errors
    /// Returns [`LifecycleError::PartialBatch`] when a chunk fails; earlier
    /// chunks stay committed and are listed in the error.
    pub fn commit(&self, updates: &[TaskUpdate]) -> Result<BatchReport, LifecycleError> {
        let mut report = BatchReport::default();
        for (index, chunk) in updates.chunks(self.chunk_size).enumerate() {
            if let Err(err) = self.store.commit_batch(chunk) {
                let pending: Vec<TaskId> = updates[report.committed.len()..]
                    .iter()
                    .map(|update| update.id.clone())
                    .collect();
                warn!(
                    chunk = index,
                    committed = report.committed.len(),
                    pending = pending.len(),
                    "Batch write stopped"
                );
                return Err(LifecycleError::PartialBatch {
                    committed: report.committed,
                    pending,
                    source: err.into(),
                });
            }
            report
                .committed
                .extend(chunk.iter().map(|update| update.id.clone()));
            report.chunks += 1;
        }
        if !report.is_empty() {
            info!(
                count = report.committed.len(),
                chunks = report.chunks,
                "Committed updates"
            );
        }
        Ok(report)
    }
}
