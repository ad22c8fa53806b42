//! End-to-end lifecycle tests against the JSON file store.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::fs;

use tempfile::TempDir;
use throwlist_app::{AppConfig, LifecycleError, TaskService};
use throwlist_core::{Band, DateOnly, Selection, TaskId, ThrowAction, ThrowOffset, View};
use throwlist_store_json::JsonStore;

fn day(s: &str) -> DateOnly {
    s.parse().expect("valid date")
}

fn setup() -> (TempDir, TaskService<JsonStore>) {
    let dir = TempDir::with_prefix("throwlist-test-").expect("create temp dir");
    let store = JsonStore::open(dir.path().join("tasks.json")).expect("open store");
    (dir, TaskService::new(store, &AppConfig::default()))
}

fn titles(service: &TaskService<JsonStore>, reference: DateOnly, view: View) -> Vec<String> {
    service
        .board(reference)
        .expect("board")
        .view(view)
        .iter()
        .map(|task| task.title.clone())
        .collect()
}

#[test]
fn added_tasks_are_listed_by_band_then_insertion() {
    let (_dir, service) = setup();
    let reference = day("2024-06-01");
    service.add("low", None, reference).expect("add");
    service.add("urgent", Some(1), reference).expect("add");
    service.add("also urgent", Some(1), reference).expect("add");

    assert_eq!(
        titles(&service, reference, View::Today),
        vec!["urgent", "also urgent", "low"]
    );
    let board = service.board(reference).expect("board");
    let sorters: Vec<i64> = board.today.iter().map(|task| task.sorter).collect();
    assert_eq!(sorters, vec![1000, 2000, 1000]);
}

#[test]
fn throw_complete_and_restore_round_trip() {
    let (_dir, service) = setup();
    let reference = day("2024-06-01");
    let a = service.add("a", Some(5), reference).expect("add");
    let b = service.add("b", Some(5), reference).expect("add");
    let c = service.add("c", Some(5), reference).expect("add");

    let mut selection = Selection::with_ids(reference, [a.clone(), b.clone()]);
    let report = service
        .throw(
            &mut selection,
            ThrowAction::Offset(ThrowOffset::OneWeek),
            reference,
        )
        .expect("throw");
    assert_eq!(report.committed, vec![a.clone(), b.clone()]);
    assert!(selection.is_empty());
    let mut future = titles(&service, reference, View::Future);
    future.sort();
    assert_eq!(future, vec!["a", "b"]);

    service.complete(&c, reference).expect("complete");
    let board = service.board(reference).expect("board");
    let (view, done) = board.find(&c).expect("c exists");
    assert_eq!(view, View::Today);
    assert_eq!(done.done_count, 1);
    assert_eq!(done.last_done_date, Some(reference));
    assert_eq!(done.throw_count, 0);

    // A week later both thrown tasks are due again without any write.
    let later = day("2024-06-08");
    assert_eq!(titles(&service, later, View::Today), vec!["a", "b", "c"]);

    service.restore(std::slice::from_ref(&b), reference).expect("restore");
    let board = service.board(reference).expect("board");
    let (view, restored) = board.find(&b).expect("b exists");
    assert_eq!(view, View::Today);
    assert_eq!(restored.sort_order, Band::clamped(5));
    assert_eq!(restored.throw_count, 1);
}

#[test]
fn remove_then_restore_appends_to_band() {
    let (_dir, service) = setup();
    let reference = day("2024-06-01");
    let gone = service.add("gone", Some(10), reference).expect("add");
    service.add("stay", Some(10), reference).expect("add");

    service.remove(&gone, reference).expect("remove");
    assert_eq!(titles(&service, reference, View::Removed), vec!["gone"]);

    let next_day = day("2024-06-02");
    service.restore(std::slice::from_ref(&gone), next_day).expect("restore");
    let board = service.board(next_day).expect("board");
    let (view, task) = board.find(&gone).expect("gone exists");
    assert_eq!(view, View::Today);
    assert!(!task.removed);
    assert_eq!(task.due_date, next_day);
    assert_eq!(task.sorter, 3000);
    assert_eq!(task.throw_count, 0);
}

#[test]
fn drag_reorder_persists_contiguous_keys() {
    let (_dir, service) = setup();
    let reference = day("2024-06-01");
    let first = service.add("first", Some(1), reference).expect("add");
    service.add("second", Some(1), reference).expect("add");
    let third = service.add("third", Some(3), reference).expect("add");

    service.reorder(&third, 1, reference).expect("reorder");
    assert_eq!(
        titles(&service, reference, View::Today),
        vec!["first", "third", "second"]
    );

    service.reorder(&first, 99, reference).expect("reorder");
    let board = service.board(reference).expect("board");
    let keys: Vec<(String, u8, i64)> = board
        .today
        .iter()
        .map(|task| (task.title.clone(), task.sort_order.get(), task.sorter))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("third".to_owned(), 1, 1000),
            ("second".to_owned(), 1, 2000),
            ("first".to_owned(), 1, 3000),
        ]
    );
}

#[test]
fn drifted_documents_are_normalized_on_read() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("tasks.json");
    fs::write(
        &path,
        r#"{
  "version": 1,
  "tasks": [
    { "id": "legacy", "owner": "me", "title": "old", "createdAt": 7000 },
    { "id": "odd", "owner": "me", "title": "odd", "dueDate": "2024-06-01",
      "sortOrder": 99, "sorter": "first", "createdAt": 5 },
    { "id": "other", "owner": "you", "title": "not mine", "dueDate": "2024-06-01" }
  ]
}"#,
    )
    .expect("write document");

    let store = JsonStore::open(&path).expect("open store");
    let service = TaskService::new(store, &AppConfig::default());
    let board = service.board(day("2024-06-01")).expect("board");

    assert_eq!(board.len(), 2);
    let (view, legacy) = board.find(&TaskId::new("legacy")).expect("legacy");
    assert_eq!(view, View::Future);
    assert_eq!(legacy.due_date, DateOnly::FAR_FUTURE);
    assert_eq!(legacy.sort_order, Band::LOWEST);
    assert_eq!(legacy.sorter, 7000);

    let (view, odd) = board.find(&TaskId::new("odd")).expect("odd");
    assert_eq!(view, View::Today);
    assert_eq!(odd.sort_order, Band::LOWEST);
    assert_eq!(odd.sorter, 5);
}

#[test]
fn empty_title_is_rejected_without_touching_the_file() {
    let (dir, service) = setup();
    let path = dir.path().join("tasks.json");
    let before = fs::read_to_string(&path).expect("read document");

    let err = service
        .add("  ", None, day("2024-06-01"))
        .expect_err("empty title");
    assert!(matches!(err, LifecycleError::Validation(_)));
    assert_eq!(fs::read_to_string(&path).expect("read document"), before);
}
