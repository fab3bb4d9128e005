//! End-to-end undo specs
//!
//! Commands go through the daemon's command service; undo runs against the
//! live inventory.

use crate::prelude::*;

fn seeded() -> Store {
    Store::with_inventory(vec![
        item(1, "w"),
        item(2, "x"),
        item(3, "a"),
        item(4, "b"),
    ])
}

#[test]
fn transaction_is_undone_in_one_call() {
    let store = seeded();
    let daemon = store.start();
    let service = &daemon.service;

    service.remove(EntityId(3)).unwrap();
    service.update(item(4, "b-new")).unwrap();
    {
        let _txn = service.undo_log().transaction();
        service.add(EntityDraft::new("c", "alice"));
        service.reverse();
    }
    assert_eq!(names(&daemon), vec!["c", "b-new", "x", "w"]);

    let report = service.undo(1);

    assert_eq!(report.units, 1);
    assert_eq!(report.applied, 2);
    assert_eq!(names(&daemon), vec!["w", "x", "b-new"]);
    assert_eq!(
        records(&daemon),
        vec![
            LogRecord::CompensateAdd { index: 2 },
            LogRecord::CompensateUpdate { id: EntityId(4) },
        ]
    );
}

#[test]
fn remaining_history_is_saved_bottom_to_top() {
    let store = seeded();
    let daemon = store.start();
    let service = &daemon.service;

    service.remove(EntityId(3)).unwrap();
    service.update(item(4, "b-new")).unwrap();
    {
        let _txn = service.undo_log().transaction();
        service.add(EntityDraft::new("c", "alice"));
        service.reverse();
    }
    service.undo(1);
    service.save().unwrap();

    similar_asserts::assert_eq!(store.read("undo/records.log"), "add 2\nupdate 4\n");
    let snapshots: Vec<Entity> = store
        .read("undo/snapshots.jsonl")
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(snapshots, vec![item(3, "a"), item(4, "b")]);
}

#[test]
fn undoing_everything_restores_the_original_inventory() {
    let store = seeded();
    let daemon = store.start();
    let service = &daemon.service;
    let original = service.inventory_snapshot();

    service.remove(EntityId(3)).unwrap();
    service.update(item(4, "b-new")).unwrap();
    service.clear();
    service.add(EntityDraft::new("c", "alice"));
    service.reverse();

    let report = service.undo(100);

    assert_eq!(report.units, 5);
    assert!(report.failures.is_empty());
    assert_eq!(service.inventory_snapshot(), original);
    assert!(service.undo_log().inspect(|j| j.is_empty()));
}

#[test]
fn undo_with_empty_history_changes_nothing() {
    let store = seeded();
    let daemon = store.start();

    let report = daemon.service.undo(3);

    assert!(report.is_noop());
    assert_eq!(names(&daemon), vec!["w", "x", "a", "b"]);
}

#[test]
fn failed_compensation_is_skipped_and_undo_continues() {
    let store = seeded();
    let daemon = store.start();
    let service = &daemon.service;

    service.reverse();
    service.update(item(1, "w2")).unwrap();
    {
        // Compensation for an entity that never reaches the inventory
        let _txn = service.undo_log().transaction();
        service.undo_log().log_add(EntityId(99));
    }

    let report = service.undo(3);

    assert_eq!(report.units, 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(names(&daemon), vec!["w", "x", "a", "b"]);
}
