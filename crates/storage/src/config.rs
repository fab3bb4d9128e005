// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Undo journal configuration

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Tunables that can be set from a config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JournalOptions {
    /// Write each appended entry to disk immediately, between full saves
    pub append: bool,
    /// fsync after every incremental append
    pub fsync: bool,
}

impl Default for JournalOptions {
    fn default() -> Self {
        Self {
            append: true,
            fsync: false,
        }
    }
}

/// Configuration for an undo journal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalConfig {
    /// JSON-lines file of entity snapshots
    pub snapshot_path: PathBuf,
    /// Line-oriented file of compensation records
    pub log_path: PathBuf,
    pub options: JournalOptions,
}

impl JournalConfig {
    /// Standard file names inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            snapshot_path: dir.join("snapshots.jsonl"),
            log_path: dir.join("records.log"),
            options: JournalOptions::default(),
        }
    }

    pub fn with_options(mut self, options: JournalOptions) -> Self {
        self.options = options;
        self
    }
}
