// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Undo journal: the compensating-action stack and its persistence
//!
//! ## Layout
//!
//! ```text
//! log_x() → UndoEntry ─┬─ push ──→ stack (memory)
//!                      └─ append → records.log + snapshots.jsonl
//!
//! undo(n) ← pop ← stack           save() → truncate + rewrite both files
//! ```
//!
//! The journal itself is single-threaded; share it through
//! [`UndoCoordinator`](crate::UndoCoordinator).
//!
//! ## Staleness
//!
//! Incremental appends keep the files in step with memory only while the
//! stack grows. Once an undo pops entries (or a write fails, or recovery had
//! to drop data) the files no longer describe the stack, and further appends
//! would pair snapshots with the wrong records on the next load. The journal
//! is then *stale*: appends stay in memory until the next successful
//! [`save`](UndoJournal::save).

use crate::config::JournalConfig;
use crate::entry::{Compensation, UndoEntry};
use crate::error::{CompensateError, JournalError};
use crate::log_file::{LineAppender, LogFile};
use crate::record::LogRecord;
use crate::snapshot::{self, SnapshotFile};
use sp_core::{Entity, EntityCollection, EntityId};

/// Outcome of an undo call
#[derive(Debug, Default, PartialEq, Eq)]
pub struct UndoReport {
    /// Undo units completed (standalone records or whole transactions)
    pub units: usize,
    /// Entries popped off the stack, delimiters included
    pub popped: usize,
    /// Compensations applied successfully
    pub applied: usize,
    /// Compensations that failed and were skipped
    pub failures: Vec<CompensateError>,
    /// Stopped at an opening delimiter with no matching close
    pub stopped_at_open_transaction: bool,
}

impl UndoReport {
    /// True when the stack was not touched
    pub fn is_noop(&self) -> bool {
        self.popped == 0
    }
}

struct Appenders {
    records: LineAppender,
    snapshots: LineAppender,
}

impl Appenders {
    fn open(config: &JournalConfig) -> Result<Self, JournalError> {
        Ok(Self {
            records: LineAppender::open(&config.log_path, config.options.fsync)?,
            snapshots: LineAppender::open(&config.snapshot_path, config.options.fsync)?,
        })
    }

    fn append(&mut self, entry: &UndoEntry) -> Result<(), JournalError> {
        if let Some(entity) = entry.snapshot() {
            self.snapshots.append(&snapshot::encode(entity)?)?;
        }
        self.records.append(&entry.record().to_line())
    }
}

/// Persistent stack of compensations
pub struct UndoJournal {
    config: JournalConfig,
    entries: Vec<UndoEntry>,
    delimiters: usize,
    snapshots: usize,
    appenders: Option<Appenders>,
    stale: bool,
}

impl UndoJournal {
    /// Load the journal from its files, creating them if absent
    pub fn open(config: JournalConfig) -> Result<Self, JournalError> {
        let snapshots = SnapshotFile::new(&config.snapshot_path).load_or_create()?;
        let loaded = LogFile::new(&config.log_path).load_or_create()?;

        let snapshot_count = snapshots.snapshots.len();
        let record_count = loaded.records.len();
        let mut anomalies = loaded.skipped;
        // A file without its final newline would glue the next append onto it
        if loaded.torn || snapshots.torn {
            anomalies += 1;
        }

        let mut remaining = snapshots.snapshots.into_iter();
        let mut entries = Vec::with_capacity(record_count);
        for record in loaded.records {
            match UndoEntry::pair(record, &mut remaining) {
                Some(entry) => entries.push(entry),
                None => {
                    tracing::warn!(%record, "dropping undo record with no snapshot");
                    anomalies += 1;
                }
            }
        }
        let surplus = remaining.count();
        if surplus > 0 {
            tracing::warn!(surplus, "dropping snapshots with no undo record");
            anomalies += 1;
        }

        let mut journal = Self::empty(config);
        for entry in entries {
            journal.track(&entry);
            journal.entries.push(entry);
        }

        // Delimiters are matched by position, so a transaction left open by a
        // crash is closed here before anything else is logged above it
        if journal.in_transaction() {
            tracing::warn!(
                delimiters = journal.delimiters,
                "undo log ends inside an open transaction, closing it"
            );
            journal.track(&UndoEntry::Delimiter);
            journal.entries.push(UndoEntry::Delimiter);
            anomalies += 1;
        }

        tracing::info!(
            records = record_count,
            snapshots = snapshot_count,
            entries = journal.entries.len(),
            "loaded undo journal"
        );

        if anomalies > 0 {
            tracing::warn!(anomalies, "undo files need a full save to be consistent");
            journal.stale = true;
        } else {
            journal.open_appenders();
        }

        Ok(journal)
    }

    /// Load the journal, falling back to an empty one if the files cannot be
    /// read
    ///
    /// The fallback journal is stale, so nothing is appended to the unreadable
    /// files before an explicit save replaces them.
    pub fn recover(config: JournalConfig) -> Self {
        match Self::open(config.clone()) {
            Ok(journal) => journal,
            Err(e) => {
                tracing::error!(error = %e, "failed to load undo journal, starting empty");
                let mut journal = Self::empty(config);
                journal.stale = true;
                journal
            }
        }
    }

    fn empty(config: JournalConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
            delimiters: 0,
            snapshots: 0,
            appenders: None,
            stale: false,
        }
    }

    fn open_appenders(&mut self) {
        if !self.config.options.append {
            return;
        }
        match Appenders::open(&self.config) {
            Ok(appenders) => self.appenders = Some(appenders),
            Err(e) => {
                tracing::warn!(error = %e, "cannot open undo files for appending");
                self.stale = true;
            }
        }
    }

    fn track(&mut self, entry: &UndoEntry) {
        if entry.is_delimiter() {
            self.delimiters += 1;
        }
        if entry.snapshot().is_some() {
            self.snapshots += 1;
        }
    }

    fn untrack(&mut self, entry: &UndoEntry) {
        if entry.is_delimiter() {
            self.delimiters -= 1;
        }
        if entry.snapshot().is_some() {
            self.snapshots -= 1;
        }
    }

    fn push(&mut self, entry: UndoEntry) {
        tracing::debug!(record = %entry.record(), "logged compensation");
        if !self.stale {
            if let Some(appenders) = self.appenders.as_mut() {
                if let Err(e) = appenders.append(&entry) {
                    tracing::warn!(error = %e, "incremental append failed, undo files are stale");
                    self.stale = true;
                }
            }
        }
        self.track(&entry);
        self.entries.push(entry);
    }

    fn pop(&mut self) -> Option<UndoEntry> {
        let entry = self.entries.pop()?;
        self.untrack(&entry);
        Some(entry)
    }

    /// Push a transaction delimiter
    ///
    /// Two calls bracket the entries that a single undo unit reverses.
    pub fn begin_or_end_transaction(&mut self) {
        self.push(UndoEntry::Delimiter);
    }

    /// Record that entity `added` was inserted
    pub fn log_add(&mut self, added: EntityId) {
        self.push(Compensation::Remove { id: added }.into());
    }

    /// Record that `removed` is about to be taken out of `collection`
    ///
    /// Must be called while the entity is still present: its current index is
    /// where undo will re-insert it. Returns that index.
    pub fn log_remove<C>(&mut self, removed: &Entity, collection: &C) -> Result<usize, CompensateError>
    where
        C: EntityCollection + ?Sized,
    {
        let (index, _) = collection
            .find_by_id(removed.id)
            .ok_or(CompensateError::NotFoundInCollection { id: removed.id })?;
        self.log_remove_at(index, removed.clone());
        Ok(index)
    }

    /// Record that `removed` was taken out of position `index`
    pub fn log_remove_at(&mut self, index: usize, removed: Entity) {
        self.push(
            Compensation::Reinsert {
                index,
                entity: removed,
            }
            .into(),
        );
    }

    /// Record an update, given the entity's value before the update
    pub fn log_update(&mut self, prior: Entity) {
        self.push(
            Compensation::Restore {
                id: prior.id,
                entity: prior,
            }
            .into(),
        );
    }

    /// Record that the whole collection was reversed
    pub fn log_reorder(&mut self) {
        self.push(Compensation::Reverse.into());
    }

    /// Undo up to `units` undo units against `collection`
    ///
    /// A standalone entry is one unit; a delimiter-bracketed transaction is
    /// one unit however many entries it holds. A compensation that fails is
    /// reported in the result and skipped, and the loop carries on.
    ///
    /// Delimiters alternate open/close counted from the bottom of the stack.
    /// Meeting an opening delimiter outside a transaction means the
    /// transaction above it was never closed: the delimiter is discarded and
    /// the call stops there.
    pub fn undo<C>(&mut self, units: usize, collection: &mut C) -> UndoReport
    where
        C: EntityCollection + ?Sized,
    {
        let mut report = UndoReport::default();
        if self.entries.is_empty() {
            tracing::info!("nothing to undo");
            return report;
        }

        let mut remaining = units;
        let mut inside_transaction = false;

        while remaining > 0 {
            // Position (from the bottom) of a delimiter about to be popped
            let delimiter_position = self.delimiters;
            let Some(entry) = self.pop() else {
                break;
            };
            report.popped += 1;

            let compensation = match entry {
                UndoEntry::Delimiter => {
                    let opens = delimiter_position % 2 == 1;
                    if !inside_transaction && opens {
                        tracing::warn!("discarding unmatched transaction delimiter");
                        report.stopped_at_open_transaction = true;
                        break;
                    }
                    inside_transaction = !inside_transaction;
                    if !inside_transaction {
                        remaining -= 1;
                        report.units += 1;
                    }
                    continue;
                }
                UndoEntry::Compensate(compensation) => compensation,
            };

            let record = compensation.record();
            match compensation.apply(collection) {
                Ok(()) => {
                    tracing::debug!(%record, "undone");
                    report.applied += 1;
                }
                Err(e) => {
                    tracing::warn!(%record, error = %e, "compensation failed, skipping");
                    report.failures.push(e);
                }
            }

            if !inside_transaction {
                remaining -= 1;
                report.units += 1;
            }
        }

        if report.popped > 0 {
            self.stale = true;
        }
        tracing::info!(
            units = report.units,
            applied = report.applied,
            failed = report.failures.len(),
            "undo complete"
        );
        report
    }

    /// Truncate and rewrite both files from the in-memory stack
    ///
    /// On failure the in-memory stack is untouched and the files may be
    /// partially written; the journal stays stale until a save succeeds.
    pub fn save(&mut self) -> Result<(), JournalError> {
        // Close append handles before truncating underneath them
        self.appenders = None;

        if let Err(e) = self.write_files() {
            tracing::error!(error = %e, "failed to save undo journal");
            self.stale = true;
            return Err(e);
        }

        self.stale = false;
        self.open_appenders();
        tracing::debug!(
            entries = self.entries.len(),
            snapshots = self.snapshots,
            "saved undo journal"
        );
        Ok(())
    }

    fn write_files(&self) -> Result<(), JournalError> {
        crate::log_file::create_empty(&self.config.snapshot_path)?;
        crate::log_file::create_empty(&self.config.log_path)?;
        SnapshotFile::new(&self.config.snapshot_path)
            .save(self.entries.iter().filter_map(UndoEntry::snapshot))?;
        LogFile::new(&self.config.log_path).save(self.entries.iter().map(UndoEntry::record))
    }

    /// Number of entries on the stack, delimiters included
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Number of entity snapshots held by the stack
    pub fn snapshot_depth(&self) -> usize {
        self.snapshots
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an odd number of delimiters is on the stack
    pub fn in_transaction(&self) -> bool {
        self.delimiters % 2 == 1
    }

    /// Whether the files on disk lag behind the in-memory stack
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Records from the bottom of the stack to the top
    pub fn records(&self) -> impl Iterator<Item = LogRecord> + '_ {
        self.entries.iter().map(UndoEntry::record)
    }

    /// Snapshots from the bottom of the stack to the top
    pub fn snapshots(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entries.iter().filter_map(UndoEntry::snapshot)
    }
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
