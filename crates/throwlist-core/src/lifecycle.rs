//! Field deltas produced by each user action.
//!
//! Every action is a pure function from a partitioned [`Board`] and the
//! reference date to a list of [`TaskUpdate`]s. Nothing here touches storage;
//! callers persist the updates and re-read the task set afterwards.
//!
//! Targets missing from the board, or outside the view an action requires,
//! produce no update at all: the task may just have been changed by another
//! client.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::date::DateOnly;
use crate::error::ValidationError;
use crate::id::TaskId;
use crate::ordering::{Placement, SorterIssuer, assign};
use crate::partition::{Board, View};
use crate::selection::Selection;
use crate::task::{Band, Task};

/// Field-level delta for a single task.
///
/// Set fields overwrite, counter fields are increments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// New due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateOnly>,
    /// New removal flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<bool>,
    /// New completion date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_done_date: Option<DateOnly>,
    /// New band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<Band>,
    /// New sorter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorter: Option<i64>,
    /// Amount added to `done_count`.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub done_count: u32,
    /// Amount added to `throw_count`.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub throw_count: u32,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_zero(value: &u32) -> bool {
    *value == 0
}

impl TaskPatch {
    /// Returns true when the patch would not modify any field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.due_date.is_none()
            && self.removed.is_none()
            && self.last_done_date.is_none()
            && self.sort_order.is_none()
            && self.sorter.is_none()
            && self.done_count == 0
            && self.throw_count == 0
    }

    /// Merge the delta into `task`. Does not touch `updated_at`; stamping is
    /// the store's job.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(removed) = self.removed {
            task.removed = removed;
        }
        if let Some(last_done_date) = self.last_done_date {
            task.last_done_date = Some(last_done_date);
        }
        if let Some(band) = self.sort_order {
            task.sort_order = band;
        }
        if let Some(sorter) = self.sorter {
            task.sorter = sorter;
        }
        task.done_count = task.done_count.saturating_add(self.done_count);
        task.throw_count = task.throw_count.saturating_add(self.throw_count);
    }
}

/// Delta addressed to one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    /// Target task.
    pub id: TaskId,
    /// Field changes.
    pub patch: TaskPatch,
}

impl TaskUpdate {
    fn new(id: &TaskId, patch: TaskPatch) -> Self {
        Self {
            id: id.clone(),
            patch,
        }
    }
}

/// Validated fields of a task about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Owner of the new task.
    pub owner: String,
    /// Trimmed title.
    pub title: String,
    /// Initial due date (the reference date).
    pub due_date: DateOnly,
    /// Chosen band.
    pub sort_order: Band,
    /// Sorter at the end of the chosen band.
    pub sorter: i64,
}

impl NewTask {
    /// Validate input and compute the initial keys of a task added on
    /// `reference`.
    ///
    /// # Errors
    /// Returns [`ValidationError`] when the trimmed owner or title is empty.
    pub fn new(
        owner: &str,
        title: &str,
        band: Option<Band>,
        reference: DateOnly,
        today: &[Task],
    ) -> Result<Self, ValidationError> {
        let owner = owner.trim();
        if owner.is_empty() {
            return Err(ValidationError::EmptyOwner);
        }
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let band = band.unwrap_or_default();
        Ok(Self {
            owner: owner.to_owned(),
            title: title.to_owned(),
            due_date: reference,
            sort_order: band,
            sorter: assign(band, today),
        })
    }
}

/// Supported reschedule distances of a bulk throw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThrowOffset {
    /// Tomorrow.
    OneDay,
    /// The day after tomorrow.
    TwoDays,
    /// One week out.
    OneWeek,
    /// Thirty days out.
    OneMonth,
    /// Ninety days out.
    ThreeMonths,
    /// One year out.
    OneYear,
}

impl ThrowOffset {
    /// Number of days the task is pushed forward.
    #[must_use]
    pub const fn days(self) -> i64 {
        match self {
            Self::OneDay => 1,
            Self::TwoDays => 2,
            Self::OneWeek => 7,
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::OneYear => 365,
        }
    }
}

impl TryFrom<i64> for ThrowOffset {
    type Error = ValidationError;

    fn try_from(days: i64) -> Result<Self, Self::Error> {
        match days {
            1 => Ok(Self::OneDay),
            2 => Ok(Self::TwoDays),
            7 => Ok(Self::OneWeek),
            30 => Ok(Self::OneMonth),
            90 => Ok(Self::ThreeMonths),
            365 => Ok(Self::OneYear),
            other => Err(ValidationError::UnsupportedOffset(other)),
        }
    }
}

/// What a bulk throw does to every selected task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThrowAction {
    /// Reschedule by a fixed distance.
    Offset(ThrowOffset),
    /// Mark done on the reference date.
    Complete,
    /// Flag as removed.
    Remove,
    /// Spread the selection over consecutive days starting four days out.
    Swipe,
}

/// First day offset used by [`ThrowAction::Swipe`].
pub const SWIPE_START_DAYS: i64 = 4;

impl fmt::Display for ThrowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offset(offset) => write!(f, "+{}d", offset.days()),
            Self::Complete => f.write_str("complete"),
            Self::Remove => f.write_str("remove"),
            Self::Swipe => f.write_str("swipe"),
        }
    }
}

impl FromStr for ThrowAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "complete" | "done" => Ok(Self::Complete),
            "remove" | "rm" => Ok(Self::Remove),
            "swipe" => Ok(Self::Swipe),
            other => {
                let days = other
                    .trim_start_matches('+')
                    .trim_end_matches('d')
                    .parse::<i64>()
                    .map_err(|_| ValidationError::UnknownThrowAction(s.trim().to_owned()))?;
                ThrowOffset::try_from(days).map(Self::Offset)
            }
        }
    }
}

fn in_view<'a>(board: &'a Board, id: &TaskId, view: View) -> Option<&'a Task> {
    board
        .find(id)
        .and_then(|(found, task)| (found == view).then_some(task))
}

/// Push a Today task to the day after the reference date.
#[must_use]
pub fn advance_one_day(board: &Board, id: &TaskId, reference: DateOnly) -> Option<TaskUpdate> {
    let task = in_view(board, id, View::Today)?;
    Some(TaskUpdate::new(
        &task.id,
        TaskPatch {
            due_date: Some(reference.add_days(1)),
            throw_count: 1,
            ..TaskPatch::default()
        },
    ))
}

/// Record a completion of a Today task on the reference date.
#[must_use]
pub fn complete(board: &Board, id: &TaskId, reference: DateOnly) -> Option<TaskUpdate> {
    let task = in_view(board, id, View::Today)?;
    Some(TaskUpdate::new(&task.id, completion(reference, 0)))
}

/// Flag a task as removed. A plain removal is not a throw and leaves
/// `throw_count` alone.
#[must_use]
pub fn remove(board: &Board, id: &TaskId) -> Option<TaskUpdate> {
    let (view, task) = board.find(id)?;
    (view != View::Removed).then(|| {
        TaskUpdate::new(
            &task.id,
            TaskPatch {
                removed: Some(true),
                ..TaskPatch::default()
            },
        )
    })
}

fn completion(reference: DateOnly, throws: u32) -> TaskPatch {
    TaskPatch {
        last_done_date: Some(reference),
        done_count: 1,
        throw_count: throws,
        ..TaskPatch::default()
    }
}

/// Apply a bulk throw to the selected Today tasks, in screen order.
///
/// Every affected task gets `throw_count + 1`. A selection made under a
/// different reference date is stale and yields nothing, as does an empty
/// selection.
#[must_use]
pub fn throw(
    board: &Board,
    selection: &Selection,
    action: ThrowAction,
    reference: DateOnly,
) -> Vec<TaskUpdate> {
    if selection.reference() != reference {
        return Vec::new();
    }
    selection
        .in_screen_order(&board.today)
        .into_iter()
        .zip(0_i64..)
        .map(|(task, index)| {
            let patch = match action {
                ThrowAction::Offset(offset) => TaskPatch {
                    due_date: Some(reference.add_days(offset.days())),
                    throw_count: 1,
                    ..TaskPatch::default()
                },
                ThrowAction::Complete => completion(reference, 1),
                ThrowAction::Remove => TaskPatch {
                    removed: Some(true),
                    throw_count: 1,
                    ..TaskPatch::default()
                },
                ThrowAction::Swipe => TaskPatch {
                    due_date: Some(reference.add_days(index + SWIPE_START_DAYS)),
                    throw_count: 1,
                    ..TaskPatch::default()
                },
            };
            TaskUpdate::new(&task.id, patch)
        })
        .collect()
}

/// Bring Future or Removed tasks back to the reference date.
///
/// Each task keeps its band and is appended to it; a removed task is also
/// un-removed. Tasks restored into the same band receive strictly increasing
/// sorters in the order of `ids`. Ids currently in Today or unknown are
/// skipped.
#[must_use]
pub fn restore_all(board: &Board, ids: &[TaskId], reference: DateOnly) -> Vec<TaskUpdate> {
    let mut issuer = SorterIssuer::new(&board.today);
    ids.iter()
        .filter_map(|id| match board.find(id) {
            Some((View::Future | View::Removed, task)) => {
                Some(restoration(task, reference, &mut issuer))
            }
            _ => None,
        })
        .collect()
}

fn restoration(task: &Task, reference: DateOnly, issuer: &mut SorterIssuer) -> TaskUpdate {
    TaskUpdate::new(
        &task.id,
        TaskPatch {
            due_date: Some(reference),
            removed: task.removed.then_some(false),
            sorter: Some(issuer.issue(task.sort_order)),
            ..TaskPatch::default()
        },
    )
}

/// Turn ordering placements into updates, skipping tasks whose keys are
/// already in place.
#[must_use]
pub fn reposition(today: &[Task], placements: &[Placement]) -> Vec<TaskUpdate> {
    placements
        .iter()
        .filter_map(|placement| {
            let task = today.iter().find(|task| task.id == placement.id)?;
            placement.changes(task).then(|| {
                TaskUpdate::new(
                    &task.id,
                    TaskPatch {
                        sort_order: (placement.band != task.sort_order).then_some(placement.band),
                        sorter: (placement.sorter != task.sorter).then_some(placement.sorter),
                        ..TaskPatch::default()
                    },
                )
            })
        })
        .collect()
}
