//! Position keys of the Today view.
//!
//! Each task carries a coarse manual [`Band`] and a fine-grained integer
//! `sorter`. New keys are issued with a fixed [`SORTER_STEP`] gap so that
//! inserting never rewrites siblings; a drag-and-drop reorder renumbers the
//! whole list, which bounds key growth.

use std::collections::HashMap;

use crate::id::TaskId;
use crate::task::{Band, Task};

/// Gap between consecutive issued sorters.
pub const SORTER_STEP: i64 = 1000;

/// New ordering keys for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Task receiving the keys.
    pub id: TaskId,
    /// Band after the operation.
    pub band: Band,
    /// Sorter after the operation.
    pub sorter: i64,
}

impl Placement {
    /// Returns true when applying the placement would modify `task`.
    #[must_use]
    pub fn changes(&self, task: &Task) -> bool {
        self.band != task.sort_order || self.sorter != task.sorter
    }
}

/// Issues sorters at the end of each band, remembering what it handed out.
///
/// Successive calls for the same band keep increasing, so several tasks can be
/// appended to one band in a single step without colliding.
#[derive(Debug, Clone, Default)]
pub struct SorterIssuer {
    tails: HashMap<Band, i64>,
}

impl SorterIssuer {
    /// Seed the issuer with the current Today tasks.
    #[must_use]
    pub fn new(today: &[Task]) -> Self {
        let mut tails: HashMap<Band, i64> = HashMap::new();
        for task in today {
            tails
                .entry(task.sort_order)
                .and_modify(|tail| *tail = (*tail).max(task.sorter))
                .or_insert(task.sorter);
        }
        Self { tails }
    }

    /// Next sorter for `band`: the band's maximum plus one step, or one step
    /// when the band is empty.
    pub fn issue(&mut self, band: Band) -> i64 {
        let next = self
            .tails
            .get(&band)
            .map_or(SORTER_STEP, |tail| tail.saturating_add(SORTER_STEP));
        self.tails.insert(band, next);
        next
    }
}

/// Sorter for a task appended to `band` among the current Today tasks.
#[must_use]
pub fn assign(band: Band, today: &[Task]) -> i64 {
    SorterIssuer::new(today).issue(band)
}

/// Drag-and-drop reorder of the Today list.
///
/// `today` must be in display order. The moved task is reinserted at
/// `target_index` (clamped into the list), inherits the band of its new
/// previous neighbour (or of the next one when dropped at the head), and every
/// task is renumbered to `(position + 1) * SORTER_STEP`. Only the moved task's
/// band changes.
///
/// Returns one placement per task in the new order, or nothing when `moved` is
/// not part of `today`.
#[must_use]
pub fn reorder(today: &[Task], moved: &TaskId, target_index: i64) -> Vec<Placement> {
    let Some(from) = today.iter().position(|task| task.id == *moved) else {
        return Vec::new();
    };

    let mut order: Vec<&Task> = today.iter().collect();
    let item = order.remove(from);
    let target = usize::try_from(target_index.max(0))
        .unwrap_or(usize::MAX)
        .min(order.len());
    order.insert(target, item);

    let band = if order.len() == 1 {
        item.sort_order
    } else if target == 0 {
        order[1].sort_order
    } else {
        order[target - 1].sort_order
    };

    order
        .iter()
        .enumerate()
        .map(|(position, task)| Placement {
            id: task.id.clone(),
            band: if task.id == *moved { band } else { task.sort_order },
            sorter: position_key(position),
        })
        .collect()
}

/// Explicit band selection: move the task to the end of `new_band`.
///
/// `new_band` is clamped into `1..=24`. Every other task keeps its keys.
#[must_use]
pub fn change_band(task_id: &TaskId, new_band: i64, today: &[Task]) -> Option<Placement> {
    let task = today.iter().find(|task| task.id == *task_id)?;
    let band = Band::clamped(new_band);
    Some(Placement {
        id: task.id.clone(),
        band,
        sorter: assign(band, today),
    })
}

fn position_key(position: usize) -> i64 {
    i64::try_from(position + 1)
        .unwrap_or(i64::MAX)
        .saturating_mul(SORTER_STEP)
}
