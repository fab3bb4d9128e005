// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory undo stack entries
//!
//! The record stack and the snapshot stack are kept as one stack in memory:
//! every compensation that needs a prior entity value carries it inline, so a
//! record and its snapshot are always pushed and popped together. The two are
//! only split apart at the persistence boundary.

use crate::record::LogRecord;
use sp_core::{Entity, EntityId};

/// A compensating action ready to be applied to the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
    /// Put a removed entity back at its old position
    Reinsert { index: usize, entity: Entity },
    /// Take an added entity out again
    Remove { id: EntityId },
    /// Overwrite an updated entity with its prior value
    Restore { id: EntityId, entity: Entity },
    /// Undo a whole-collection reversal
    Reverse,
}

impl Compensation {
    /// The log record this compensation is persisted as
    pub fn record(&self) -> LogRecord {
        match self {
            Compensation::Reinsert { index, .. } => LogRecord::CompensateAdd { index: *index },
            Compensation::Remove { id } => LogRecord::CompensateRemove { id: *id },
            Compensation::Restore { id, .. } => LogRecord::CompensateUpdate { id: *id },
            Compensation::Reverse => LogRecord::CompensateReorder,
        }
    }

    /// The snapshot this compensation owns, if any
    pub fn snapshot(&self) -> Option<&Entity> {
        match self {
            Compensation::Reinsert { entity, .. } | Compensation::Restore { entity, .. } => {
                Some(entity)
            }
            Compensation::Remove { .. } | Compensation::Reverse => None,
        }
    }
}

/// One entry of the undo stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoEntry {
    Compensate(Compensation),
    Delimiter,
}

impl UndoEntry {
    pub fn record(&self) -> LogRecord {
        match self {
            UndoEntry::Compensate(c) => c.record(),
            UndoEntry::Delimiter => LogRecord::TransactionDelimiter,
        }
    }

    pub fn snapshot(&self) -> Option<&Entity> {
        match self {
            UndoEntry::Compensate(c) => c.snapshot(),
            UndoEntry::Delimiter => None,
        }
    }

    pub fn is_delimiter(&self) -> bool {
        matches!(self, UndoEntry::Delimiter)
    }

    /// Rebuild an entry from a persisted record, drawing its snapshot (if the
    /// record needs one) from `snapshots`.
    ///
    /// Returns `None` when the record needs a snapshot and none is left.
    pub fn pair(record: LogRecord, snapshots: &mut impl Iterator<Item = Entity>) -> Option<Self> {
        let compensation = match record {
            LogRecord::TransactionDelimiter => return Some(UndoEntry::Delimiter),
            LogRecord::CompensateRemove { id } => Compensation::Remove { id },
            LogRecord::CompensateReorder => Compensation::Reverse,
            LogRecord::CompensateAdd { index } => Compensation::Reinsert {
                index,
                entity: snapshots.next()?,
            },
            LogRecord::CompensateUpdate { id } => Compensation::Restore {
                id,
                entity: snapshots.next()?,
            },
        };
        Some(UndoEntry::Compensate(compensation))
    }
}

impl From<Compensation> for UndoEntry {
    fn from(compensation: Compensation) -> Self {
        UndoEntry::Compensate(compensation)
    }
}
