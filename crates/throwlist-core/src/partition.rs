//! Classification of a task set into the Today, Future and Removed views.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::date::DateOnly;
use crate::id::TaskId;
use crate::task::Task;

/// Derived bucket of a task relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Due on or before the reference date.
    Today,
    /// Due after the reference date.
    Future,
    /// Flagged as removed, regardless of due date.
    Removed,
}

impl View {
    /// Classify a single task. Pure function of `(due_date, removed, reference)`.
    #[must_use]
    pub fn classify(task: &Task, reference: DateOnly) -> Self {
        if task.removed {
            Self::Removed
        } else if task.due_date <= reference {
            Self::Today
        } else {
            Self::Future
        }
    }

    /// Lower-case label used in user-facing output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Future => "future",
            Self::Removed => "removed",
        }
    }
}

/// The three ordered views of one owner's task set.
#[derive(Debug, Clone, Default)]
pub struct Board {
    /// Tasks due on or before the reference date, in manual priority order.
    pub today: Vec<Task>,
    /// Tasks due after the reference date, soonest first.
    pub future: Vec<Task>,
    /// Removed tasks, latest due date first.
    pub removed: Vec<Task>,
}

impl Board {
    /// Partition `tasks` against `reference` and order each view.
    ///
    /// Duplicate ordering keys never fail; ties fall through to creation time
    /// and finally the id so the order is stable.
    #[must_use]
    pub fn partition(tasks: impl IntoIterator<Item = Task>, reference: DateOnly) -> Self {
        let mut board = Self::default();
        for task in tasks {
            match View::classify(&task, reference) {
                View::Today => board.today.push(task),
                View::Future => board.future.push(task),
                View::Removed => board.removed.push(task),
            }
        }
        board.today.sort_by(compare_today);
        board.future.sort_by(compare_future);
        board.removed.sort_by(compare_removed);
        board
    }

    /// Tasks of the given view in display order.
    #[must_use]
    pub fn view(&self, view: View) -> &[Task] {
        match view {
            View::Today => &self.today,
            View::Future => &self.future,
            View::Removed => &self.removed,
        }
    }

    /// Locate a task and the view it belongs to.
    #[must_use]
    pub fn find(&self, id: &TaskId) -> Option<(View, &Task)> {
        [View::Today, View::Future, View::Removed]
            .into_iter()
            .find_map(|view| {
                self.view(view)
                    .iter()
                    .find(|task| task.id == *id)
                    .map(|task| (view, task))
            })
    }

    /// Total number of tasks across every view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.today.len() + self.future.len() + self.removed.len()
    }

    /// Returns true when the board holds no tasks at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordering of the Today view: band, sorter, creation time.
#[must_use]
pub fn compare_today(a: &Task, b: &Task) -> Ordering {
    a.sort_order
        .cmp(&b.sort_order)
        .then(a.sorter.cmp(&b.sorter))
        .then(a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

fn compare_future(a: &Task, b: &Task) -> Ordering {
    a.due_date
        .cmp(&b.due_date)
        .then(a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

fn compare_removed(a: &Task, b: &Task) -> Ordering {
    b.due_date
        .cmp(&a.due_date)
        .then(b.updated_at.cmp(&a.updated_at))
        .then_with(|| a.id.cmp(&b.id))
}
