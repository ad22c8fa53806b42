//! JSON-file-backed storage implementation for throwlist.

mod error;
mod lock;

pub use error::JsonStoreError;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use throwlist_core::task::now_millis;
use throwlist_core::{NewTask, StoredTask, Task, TaskId, TaskUpdate, ValidationError};
use tracing::{debug, info};
use uuid::Uuid;

use crate::lock::{LockMode, StoreLock, StoreLockGuard};

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, JsonStoreError>;

const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    tasks: Vec<StoredTask>,
}

/// Storage holding every task of every owner in a single JSON document.
///
/// Each write replaces the file through a temporary sibling and a rename, so a
/// write is either fully visible or not at all. Every read-modify-write holds
/// an exclusive advisory lock on `<file>.lock` and reads hold a shared one, so
/// several handles or processes on one file never drop each other's writes.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Open the store at `path`, creating the file (and its parent directory)
    /// when missing.
    ///
    /// # Errors
    /// Returns an error if the directory or the initial document cannot be written.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let store = Self { path };
        let _guard = store.guard(LockMode::Write)?;
        if !store.path.exists() {
            store.write_document(&Document {
                version: DOCUMENT_VERSION,
                tasks: Vec::new(),
            })?;
            info!(path = %store.path.display(), "Initialized task store");
        }
        Ok(store)
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self, mode: LockMode) -> Result<StoreLockGuard> {
        StoreLock::acquire(&self.path, mode).map_err(|source| JsonStoreError::Lock {
            path: self.path.clone(),
            source,
        })
    }

    fn read_document(&self) -> Result<Document> {
        let file = File::open(&self.path)?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| JsonStoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn write_document(&self, document: &Document) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, document)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;
        Ok(())
    }

    /// Persist a new task and return its identifier.
    ///
    /// # Errors
    /// Returns [`JsonStoreError::Validation`] when the owner or title is empty,
    /// or an I/O error when the document cannot be rewritten.
    pub fn create(&self, new_task: &NewTask) -> Result<TaskId> {
        if new_task.owner.trim().is_empty() {
            return Err(ValidationError::EmptyOwner.into());
        }
        if new_task.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }

        let _guard = self.guard(LockMode::Write)?;
        let mut document = self.read_document()?;
        let id = TaskId::new(Uuid::now_v7().to_string());
        let now = now_millis();
        let task = Task {
            id: id.clone(),
            owner: new_task.owner.clone(),
            title: new_task.title.clone(),
            due_date: new_task.due_date,
            removed: false,
            done_count: 0,
            last_done_date: None,
            throw_count: 0,
            sort_order: new_task.sort_order,
            sorter: new_task.sorter,
            created_at: now,
            updated_at: now,
        };
        document.tasks.push(StoredTask::from(&task));
        document.version = DOCUMENT_VERSION;
        self.write_document(&document)?;

        info!(task = %id, owner = %task.owner, "Created task");
        Ok(id)
    }

    /// Point-in-time snapshot of every task owned by `owner`, normalized.
    ///
    /// # Errors
    /// Returns an error if the document cannot be read or parsed.
    pub fn list_all(&self, owner: &str) -> Result<Vec<Task>> {
        let _guard = self.guard(LockMode::Read)?;
        let document = self.read_document()?;
        Ok(document
            .tasks
            .into_iter()
            .filter(|row| row.owner == owner)
            .map(Task::from_stored)
            .collect())
    }

    /// Apply `updates` as one atomic rewrite, stamping `updatedAt` on every
    /// touched task. Ids unknown to the store are skipped.
    ///
    /// Returns the number of tasks written.
    ///
    /// # Errors
    /// Returns an error if the document cannot be read or rewritten; nothing
    /// from this batch is persisted in that case.
    pub fn commit_batch(&self, updates: &[TaskUpdate]) -> Result<usize> {
        if updates.is_empty() {
            return Ok(0);
        }

        let _guard = self.guard(LockMode::Write)?;
        let mut document = self.read_document()?;
        let index: HashMap<TaskId, usize> = document
            .tasks
            .iter()
            .enumerate()
            .map(|(idx, row)| (row.id.clone(), idx))
            .collect();

        let now = now_millis();
        let mut written = 0;
        for update in updates {
            let Some(&idx) = index.get(&update.id) else {
                debug!(task = %update.id, "Skipping update for unknown task");
                continue;
            };
            let row = &mut document.tasks[idx];
            let mut task = Task::from_stored(std::mem::take(row));
            update.patch.apply_to(&mut task);
            task.updated_at = now;
            *row = StoredTask::from(&task);
            written += 1;
        }

        document.version = DOCUMENT_VERSION;
        self.write_document(&document)?;
        info!(count = written, path = %self.path.display(), "Committed batch");
        Ok(written)
    }
}
