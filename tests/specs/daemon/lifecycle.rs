//! Daemon lifecycle specs
//!
//! Verify startup, locking and shutdown persistence.

use crate::prelude::*;

#[test]
fn startup_creates_undo_files() {
    let store = Store::empty();
    let _daemon = store.start();

    assert_eq!(store.read("undo/records.log"), "");
    assert_eq!(store.read("undo/snapshots.jsonl"), "");
}

#[test]
fn only_one_daemon_per_state_dir() {
    let store = Store::empty();
    let _daemon = store.start();

    let err = lifecycle::startup(&store.config()).err().unwrap();

    assert!(matches!(err, LifecycleError::LockFailed(_)), "{err:?}");
}

#[test]
fn shutdown_persists_inventory_and_releases_lock() {
    let store = Store::empty();
    {
        let mut daemon = store.start();
        daemon.service.add(EntityDraft::new("bolt", "alice").with_price(3));
        daemon.shutdown().unwrap();
    }

    assert!(!store.path("daemon.pid").exists());
    let saved: Inventory = serde_json::from_str(&store.read("inventory.json")).unwrap();
    assert_eq!(
        saved.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
        vec!["bolt"]
    );

    let _again = store.start();
}

#[test]
fn periodic_save_writes_both_files() {
    let store = Store::empty();
    let daemon = store.start();
    daemon.service.add(EntityDraft::new("bolt", "alice"));

    daemon.save().unwrap();

    assert!(store.read("inventory.json").contains("\"bolt\""));
    similar_asserts::assert_eq!(store.read("undo/records.log"), "remove 1\n");
}

#[test]
fn config_file_is_read_from_state_dir() {
    let store = Store::empty();
    store.write("stockpile.toml", "autosave = \"2m\"\n[journal]\nfsync = true\n");

    let config = store.config();

    assert_eq!(config.autosave, Some(std::time::Duration::from_secs(120)));
    assert!(config.journal.options.fsync);
    assert!(config.journal.options.append);
}
