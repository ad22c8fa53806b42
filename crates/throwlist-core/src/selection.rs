//! Transient set of Today tasks picked for a bulk throw.

use std::collections::BTreeSet;

use crate::date::DateOnly;
use crate::id::TaskId;
use crate::partition::View;
use crate::task::Task;

/// Tasks selected for a bulk action, bound to the reference date they were
/// picked under.
///
/// The selection only ever targets the Today view. Moving to another reference
/// date or leaving the Today tab drops it, so a bulk action never runs against
/// a stale membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    reference: DateOnly,
    ids: BTreeSet<TaskId>,
}

impl Selection {
    /// Empty selection for `reference`.
    #[must_use]
    pub const fn new(reference: DateOnly) -> Self {
        Self {
            reference,
            ids: BTreeSet::new(),
        }
    }

    /// Selection containing `ids` for `reference`.
    #[must_use]
    pub fn with_ids(reference: DateOnly, ids: impl IntoIterator<Item = TaskId>) -> Self {
        Self {
            reference,
            ids: ids.into_iter().collect(),
        }
    }

    /// Reference date the selection was made under.
    #[must_use]
    pub const fn reference(&self) -> DateOnly {
        self.reference
    }

    /// Add `id` to the selection.
    pub fn select(&mut self, id: TaskId) {
        self.ids.insert(id);
    }

    /// Flip membership of `id`; returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: TaskId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Returns true when `id` is selected.
    #[must_use]
    pub fn contains(&self, id: &TaskId) -> bool {
        self.ids.contains(id)
    }

    /// Drop every selected id.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Follow a reference date or tab change, clearing the selection unless
    /// both the date and the Today tab are unchanged.
    pub fn rebase(&mut self, reference: DateOnly, active: View) {
        if reference != self.reference || active != View::Today {
            self.ids.clear();
        }
        self.reference = reference;
    }

    /// Selected tasks in the order they appear in `today`.
    ///
    /// Ids that are no longer part of Today are skipped.
    #[must_use]
    pub fn in_screen_order<'a>(&self, today: &'a [Task]) -> Vec<&'a Task> {
        today.iter().filter(|task| self.ids.contains(&task.id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Band;

    fn day(s: &str) -> DateOnly {
        s.parse().unwrap_or_else(|err| panic!("must parse {s}: {err}"))
    }

    fn task(id: &str) -> Task {
        Task {
            id: TaskId::new(id),
            owner: "me".into(),
            title: id.into(),
            due_date: day("2024-06-01"),
            removed: false,
            done_count: 0,
            last_done_date: None,
            throw_count: 0,
            sort_order: Band::LOWEST,
            sorter: 1000,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn toggle_flips_membership() {
        let mut selection = Selection::new(day("2024-06-01"));
        assert!(selection.toggle(TaskId::new("a")));
        assert!(selection.contains(&TaskId::new("a")));
        assert!(!selection.toggle(TaskId::new("a")));
        assert!(selection.is_empty());
    }

    #[test]
    fn changing_reference_date_clears_selection() {
        let mut selection = Selection::with_ids(day("2024-06-01"), [TaskId::new("a")]);
        selection.rebase(day("2024-06-02"), View::Today);
        assert!(selection.is_empty());
        assert_eq!(selection.reference(), day("2024-06-02"));
    }

    #[test]
    fn leaving_today_tab_clears_selection() {
        let mut selection = Selection::with_ids(day("2024-06-01"), [TaskId::new("a")]);
        selection.rebase(day("2024-06-01"), View::Future);
        assert!(selection.is_empty());
    }

    #[test]
    fn same_date_and_tab_keeps_selection() {
        let mut selection = Selection::with_ids(day("2024-06-01"), [TaskId::new("a")]);
        selection.rebase(day("2024-06-01"), View::Today);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn screen_order_follows_today_list() {
        let today = vec![task("a"), task("b"), task("c")];
        let selection = Selection::with_ids(
            day("2024-06-01"),
            [TaskId::new("c"), TaskId::new("a"), TaskId::new("gone")],
        );
        let picked: Vec<&str> = selection
            .in_screen_order(&today)
            .into_iter()
            .map(|task| task.id.as_str())
            .collect();
        assert_eq!(picked, vec!["a", "c"]);
    }
}
