//! In-memory store with failure injection, shared by unit tests.

use anyhow::anyhow;
use std::sync::{Mutex, MutexGuard, PoisonError};
use throwlist_core::{NewTask, Task, TaskId, TaskUpdate};

use crate::task_store::{DEFAULT_MAX_BATCH_SIZE, TaskStore};

#[derive(Default)]
pub struct MockStore {
    inner: Mutex<MockStoreInner>,
    max_batch: Option<usize>,
}

#[derive(Default)]
struct MockStoreInner {
    tasks: Vec<Task>,
    next_id: u32,
    clock: i64,
    commit_attempts: usize,
    fail_on_commit: Option<usize>,
    fail_list: bool,
    commit_sizes: Vec<usize>,
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockStore {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let store = Self::default();
        guard(&store.inner).tasks = tasks;
        store
    }

    pub const fn with_max_batch(mut self, max: usize) -> Self {
        self.max_batch = Some(max);
        self
    }

    /// Fail the `n`-th commit attempt (1-based).
    pub fn fail_commit_number(&self, n: usize) {
        guard(&self.inner).fail_on_commit = Some(n);
    }

    pub fn fail_list(&self) {
        guard(&self.inner).fail_list = true;
    }

    pub fn commit_sizes(&self) -> Vec<usize> {
        guard(&self.inner).commit_sizes.clone()
    }

    pub fn task(&self, id: &str) -> Task {
        guard(&self.inner)
            .tasks
            .iter()
            .find(|task| task.id.as_str() == id)
            .cloned()
            .unwrap_or_else(|| panic!("task {id} must exist"))
    }
}

impl TaskStore for MockStore {
    type Error = anyhow::Error;

    fn create(&self, task: &NewTask) -> Result<TaskId, Self::Error> {
        if task.title.trim().is_empty() || task.owner.trim().is_empty() {
            return Err(anyhow!("title and owner are required"));
        }
        let mut inner = guard(&self.inner);
        inner.next_id += 1;
        inner.clock += 1;
        let id = TaskId::new(format!("new-{}", inner.next_id));
        let now = inner.clock;
        inner.tasks.push(Task {
            id: id.clone(),
            owner: task.owner.clone(),
            title: task.title.clone(),
            due_date: task.due_date,
            removed: false,
            done_count: 0,
            last_done_date: None,
            throw_count: 0,
            sort_order: task.sort_order,
            sorter: task.sorter,
            created_at: now,
            updated_at: now,
        });
        drop(inner);
        Ok(id)
    }

    fn list_all(&self, owner: &str) -> Result<Vec<Task>, Self::Error> {
        let inner = guard(&self.inner);
        if inner.fail_list {
            return Err(anyhow!("list failed"));
        }
        Ok(inner
            .tasks
            .iter()
            .filter(|task| task.owner == owner)
            .cloned()
            .collect())
    }

    fn commit_batch(&self, updates: &[TaskUpdate]) -> Result<(), Self::Error> {
        let mut inner = guard(&self.inner);
        inner.commit_attempts += 1;
        if inner.fail_on_commit == Some(inner.commit_attempts) {
            return Err(anyhow!("commit {} rejected", inner.commit_attempts));
        }
        inner.clock += 1;
        let now = inner.clock;
        for update in updates {
            if let Some(task) = inner.tasks.iter_mut().find(|task| task.id == update.id) {
                update.patch.apply_to(task);
                task.updated_at = now;
            }
        }
        inner.commit_sizes.push(updates.len());
        drop(inner);
        Ok(())
    }

    fn max_batch_size(&self) -> usize {
        self.max_batch.unwrap_or(DEFAULT_MAX_BATCH_SIZE)
    }
}
