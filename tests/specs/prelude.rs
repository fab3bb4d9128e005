//! Shared fixtures for specs

#![allow(dead_code)]

use std::path::PathBuf;

pub use sp_core::{Entity, EntityDraft, EntityId, Inventory};
pub use sp_daemon::lifecycle::{self, Config, DaemonState, LifecycleError};
pub use sp_storage::LogRecord;
use tempfile::TempDir;

/// A scratch state directory for one daemon
pub struct Store {
    dir: TempDir,
}

impl Store {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// State directory holding `entities` as the saved inventory
    pub fn with_inventory(entities: Vec<Entity>) -> Self {
        let store = Self::empty();
        lifecycle::save_inventory(
            &store.config().inventory_path,
            &Inventory::from_entities(entities),
        )
        .unwrap();
        store
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn config(&self) -> Config {
        Config::for_state_dir(self.dir.path()).unwrap()
    }

    pub fn start(&self) -> DaemonState {
        lifecycle::startup(&self.config()).unwrap()
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path(rel)).unwrap()
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }
}

pub fn item(id: u64, name: &str) -> Entity {
    Entity::new(id, name, "alice")
}

pub fn names(daemon: &DaemonState) -> Vec<String> {
    daemon
        .service
        .inventory_snapshot()
        .iter()
        .map(|e| e.name.clone())
        .collect()
}

pub fn records(daemon: &DaemonState) -> Vec<LogRecord> {
    daemon
        .service
        .undo_log()
        .inspect(|j| j.records().collect())
}
