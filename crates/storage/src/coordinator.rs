// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared handle to the undo journal
//!
//! Every command handler holds a clone of the same [`UndoCoordinator`]. All
//! journal operations go through one mutex, so at most one of them runs at a
//! time. The coordinator does not lock the live collection: callers mutate
//! the collection and log the compensation inside their own critical section.

use crate::config::JournalConfig;
use crate::error::{CompensateError, JournalError};
use crate::journal::{UndoJournal, UndoReport};
use sp_core::{Entity, EntityCollection, EntityId};
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable, thread-safe façade over an [`UndoJournal`]
#[derive(Clone)]
pub struct UndoCoordinator {
    journal: Arc<Mutex<UndoJournal>>,
}

impl UndoCoordinator {
    pub fn new(journal: UndoJournal) -> Self {
        Self {
            journal: Arc::new(Mutex::new(journal)),
        }
    }

    /// Recover the journal from disk (see [`UndoJournal::recover`])
    pub fn recover(config: JournalConfig) -> Self {
        Self::new(UndoJournal::recover(config))
    }

    fn lock(&self) -> MutexGuard<'_, UndoJournal> {
        self.journal.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn begin_or_end_transaction(&self) {
        self.lock().begin_or_end_transaction();
    }

    /// Open a transaction that is closed when the guard drops
    pub fn transaction(&self) -> TransactionGuard {
        self.begin_or_end_transaction();
        TransactionGuard {
            coordinator: self.clone(),
        }
    }

    pub fn log_add(&self, added: EntityId) {
        self.lock().log_add(added);
    }

    pub fn log_remove<C>(&self, removed: &Entity, collection: &C) -> Result<usize, CompensateError>
    where
        C: EntityCollection + ?Sized,
    {
        let result = self.lock().log_remove(removed, collection);
        if let Err(e) = &result {
            tracing::warn!(id = %removed.id, error = %e, "remove not logged");
        }
        result
    }

    pub fn log_update(&self, prior: Entity) {
        self.lock().log_update(prior);
    }

    pub fn log_reorder(&self) {
        self.lock().log_reorder();
    }

    pub fn undo<C>(&self, units: usize, collection: &mut C) -> UndoReport
    where
        C: EntityCollection + ?Sized,
    {
        let span = tracing::info_span!("undo", units);
        let _guard = span.enter();
        self.lock().undo(units, collection)
    }

    pub fn save(&self) -> Result<(), JournalError> {
        self.lock().save()
    }

    /// Run `f` with read access to the journal
    pub fn inspect<R>(&self, f: impl FnOnce(&UndoJournal) -> R) -> R {
        f(&self.lock())
    }
}

/// Closes a transaction on drop
#[must_use = "the transaction closes as soon as the guard is dropped"]
pub struct TransactionGuard {
    coordinator: UndoCoordinator,
}

impl Drop for TransactionGuard {
    fn drop(&mut self) {
        self.coordinator.begin_or_end_transaction();
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
