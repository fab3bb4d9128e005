// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line-oriented files backing the undo journal
//!
//! The log file holds one encoded [`LogRecord`] per line, oldest first. The
//! [`LineAppender`] is shared by the log file and the snapshot file for
//! incremental writes between full saves.

use crate::error::JournalError;
use crate::record::LogRecord;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Records read back from a log file
#[derive(Debug, Default)]
pub struct LoadedRecords {
    /// Records in file order (stack bottom first)
    pub records: Vec<LogRecord>,
    /// Number of malformed lines that were skipped
    pub skipped: usize,
    /// The file did not end with a newline (an append was cut short)
    pub torn: bool,
}

/// Plain-text log of compensation records
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read all records in file order
    ///
    /// A missing file is created empty. Malformed lines are reported and
    /// skipped; blank lines are ignored. A final line without a newline is
    /// still parsed, but flagged as `torn`.
    pub fn load_or_create(&self) -> Result<LoadedRecords, JournalError> {
        if !self.path.exists() {
            create_empty(&self.path)?;
            tracing::info!(path = %self.path.display(), "created empty undo log");
            return Ok(LoadedRecords::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let mut loaded = LoadedRecords {
            torn: is_torn(&content),
            ..LoadedRecords::default()
        };
        if loaded.torn {
            tracing::warn!(path = %self.path.display(), "undo log ends with a partial line");
        }

        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match LogRecord::from_line(line) {
                Ok(record) => loaded.records.push(record),
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        line = index + 1,
                        error = %e,
                        "skipping malformed undo record"
                    );
                    loaded.skipped += 1;
                }
            }
        }

        Ok(loaded)
    }

    /// Truncate the file and write `records` one per line, in order
    pub fn save<I>(&self, records: I) -> Result<(), JournalError>
    where
        I: IntoIterator<Item = LogRecord>,
    {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        for record in records {
            writeln!(writer, "{}", record)?;
        }
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }
}

/// Whether non-empty `content` is missing its final newline
pub(crate) fn is_torn(content: &str) -> bool {
    !content.is_empty() && !content.ends_with('\n')
}

/// Create `path` (and its parent directory) as an empty file
pub(crate) fn create_empty(path: &Path) -> Result<(), JournalError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)?;
    Ok(())
}

/// Append-only line writer
pub struct LineAppender {
    file: File,
    fsync: bool,
}

impl LineAppender {
    /// Open `path` for appending, creating it if needed
    pub fn open(path: &Path, fsync: bool) -> Result<Self, JournalError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file, fsync })
    }

    /// Write one line; synced before returning when `fsync` is set
    ///
    /// The line and its newline go out in a single write.
    pub fn append(&mut self, line: &str) -> Result<(), JournalError> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        self.file.write_all(buf.as_bytes())?;
        if self.fsync {
            self.file.sync_all()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "log_file_tests.rs"]
mod tests;
