//! Undo history across restarts

use crate::prelude::*;

#[test]
fn history_survives_a_restart() {
    let store = Store::with_inventory(vec![item(1, "a"), item(2, "b")]);
    let before = {
        let mut daemon = store.start();
        daemon.service.remove(EntityId(1)).unwrap();
        daemon.service.reverse();
        daemon.service.clear();
        let before = records(&daemon);
        daemon.shutdown().unwrap();
        before
    };

    let daemon = store.start();
    assert_eq!(records(&daemon), before);
    assert!(names(&daemon).is_empty());

    daemon.service.undo(3);
    assert_eq!(names(&daemon), vec!["a", "b"]);
}

#[test]
fn saving_twice_writes_identical_files() {
    let store = Store::with_inventory(vec![item(1, "a"), item(2, "b")]);
    let daemon = store.start();
    daemon.service.update(item(2, "b2")).unwrap();
    daemon.service.clear();

    daemon.service.save().unwrap();
    let records = store.read("undo/records.log");
    let snapshots = store.read("undo/snapshots.jsonl");
    daemon.service.save().unwrap();

    similar_asserts::assert_eq!(store.read("undo/records.log"), records);
    similar_asserts::assert_eq!(store.read("undo/snapshots.jsonl"), snapshots);
}

#[test]
fn appends_reach_disk_before_any_save() {
    let store = Store::empty();
    let daemon = store.start();

    daemon.service.add(EntityDraft::new("a", "alice"));
    daemon.service.reverse();

    similar_asserts::assert_eq!(store.read("undo/records.log"), "remove 1\nreverse\n");
}

#[test]
fn appends_wait_for_save_when_disabled() {
    let store = Store::empty();
    store.write("stockpile.toml", "[journal]\nappend = false\n");
    let daemon = store.start();

    daemon.service.add(EntityDraft::new("a", "alice"));
    assert_eq!(store.read("undo/records.log"), "");

    daemon.service.save().unwrap();
    assert_eq!(store.read("undo/records.log"), "remove 1\n");
}

#[test]
fn malformed_lines_are_skipped_and_dropped_on_save() {
    let store = Store::with_inventory(vec![item(1, "a"), item(2, "b")]);
    store.write("undo/records.log", "reverse\nfrobnicate 3\nreverse\n");
    store.write("undo/snapshots.jsonl", "");

    let daemon = store.start();
    assert_eq!(
        records(&daemon),
        vec![LogRecord::CompensateReorder, LogRecord::CompensateReorder]
    );
    assert!(daemon.service.undo_log().inspect(|j| j.is_stale()));

    daemon.service.save().unwrap();
    similar_asserts::assert_eq!(store.read("undo/records.log"), "reverse\nreverse\n");
}

#[test]
fn unreadable_snapshots_start_an_empty_history() {
    let store = Store::with_inventory(vec![item(1, "a")]);
    store.write("undo/records.log", "update 1\n");
    store.write("undo/snapshots.jsonl", "{ not an entity\n");

    let daemon = store.start();

    assert!(records(&daemon).is_empty());
    assert!(daemon.service.undo_log().inspect(|j| j.is_stale()));
    assert!(daemon.service.undo(1).is_noop());
}

#[test]
fn transaction_left_open_by_a_crash_is_closed_on_restart() {
    let store = Store::with_inventory(vec![item(1, "a"), item(2, "b")]);
    store.write("undo/records.log", "reverse\n--- transaction ---\nremove 2\n");
    store.write("undo/snapshots.jsonl", "");

    let daemon = store.start();
    let report = daemon.service.undo(1);

    assert_eq!(report.units, 1);
    assert!(!report.stopped_at_open_transaction);
    assert_eq!(names(&daemon), vec!["a"]);
    assert_eq!(records(&daemon), vec![LogRecord::CompensateReorder]);
}

#[test]
fn commands_after_a_crashed_transaction_stay_grouped() {
    let store = Store::with_inventory(vec![item(1, "a"), item(2, "b"), item(3, "c")]);
    store.write("undo/records.log", "--- transaction ---\nreverse\n");
    store.write("undo/snapshots.jsonl", "");

    let daemon = store.start();
    daemon.service.clear();
    let report = daemon.service.undo(1);

    assert_eq!(report.units, 1);
    assert_eq!(report.applied, 3);
    assert_eq!(names(&daemon), vec!["a", "b", "c"]);
}

#[test]
fn interrupted_append_keeps_earlier_history() {
    let store = Store::with_inventory(vec![item(1, "a"), item(2, "b")]);
    store.write("undo/records.log", "reverse\nreverse");
    store.write("undo/snapshots.jsonl", "");

    let daemon = store.start();
    daemon.service.add(EntityDraft::new("c", "alice"));
    daemon.service.save().unwrap();

    similar_asserts::assert_eq!(
        store.read("undo/records.log"),
        "reverse\nreverse\nremove 3\n"
    );
}
