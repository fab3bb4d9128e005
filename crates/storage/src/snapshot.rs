// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entity snapshot file
//!
//! Snapshots of prior entity values are stored as JSON lines, one entity per
//! line, oldest first. File order is the only ordering information.

use crate::error::JournalError;
use crate::log_file::{create_empty, is_torn};
use sp_core::Entity;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Snapshots read back from a snapshot file
#[derive(Debug, Default)]
pub struct LoadedSnapshots {
    /// Entities in file order (stack bottom first)
    pub snapshots: Vec<Entity>,
    /// The file did not end with a newline (an append was cut short)
    pub torn: bool,
}

/// JSON-lines file of entity snapshots
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read all snapshots in file order, creating an empty file if none exists
    ///
    /// Unlike the record log, a snapshot line that fails to parse aborts the
    /// load: dropping it would silently shift every later snapshot onto the
    /// wrong record. The one exception is a final line without a newline,
    /// which is an interrupted append; it is dropped if it does not parse.
    /// Its record was never written, since records follow their snapshot.
    pub fn load_or_create(&self) -> Result<LoadedSnapshots, JournalError> {
        if !self.path.exists() {
            create_empty(&self.path)?;
            tracing::info!(path = %self.path.display(), "created empty snapshot file");
            return Ok(LoadedSnapshots::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let mut loaded = LoadedSnapshots {
            torn: is_torn(&content),
            ..LoadedSnapshots::default()
        };
        let line_count = content.lines().count();

        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(entity) => loaded.snapshots.push(entity),
                Err(e) if loaded.torn && index + 1 == line_count => {
                    tracing::warn!(
                        path = %self.path.display(),
                        line = index + 1,
                        error = %e,
                        "dropping partial snapshot line"
                    );
                }
                Err(source) => {
                    return Err(JournalError::CorruptSnapshot {
                        line: index + 1,
                        source,
                    })
                }
            }
        }

        Ok(loaded)
    }

    /// Truncate the file and write `snapshots` one per line, in order
    pub fn save<'a, I>(&self, snapshots: I) -> Result<(), JournalError>
    where
        I: IntoIterator<Item = &'a Entity>,
    {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        for entity in snapshots {
            writeln!(writer, "{}", encode(entity)?)?;
        }
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }
}

/// Encode one snapshot as a single JSON line (without newline)
pub fn encode(entity: &Entity) -> Result<String, JournalError> {
    serde_json::to_string(entity).map_err(JournalError::from)
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
