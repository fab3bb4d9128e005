// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command handlers for the shared inventory
//!
//! Each handler mutates the inventory and logs the matching compensation
//! while holding the inventory lock, so no other command can observe (or
//! undo) a mutation whose compensation is not yet on the undo stack.
//!
//! Lock order is always inventory first, then undo journal.

use sp_core::{Entity, EntityCollection, EntityDraft, EntityId, IdGen, Inventory, SequentialIdGen};
use sp_storage::{CompensateError, JournalError, UndoCoordinator, UndoReport};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::info;

/// Errors returned to command callers
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("no element with id {0}")]
    NotFound(EntityId),
    #[error("compensation error: {0}")]
    Compensate(#[from] CompensateError),
    #[error("undo log error: {0}")]
    Journal(#[from] JournalError),
}

/// Shared inventory plus its undo log
#[derive(Clone)]
pub struct CommandService<G: IdGen = SequentialIdGen> {
    inventory: Arc<Mutex<Inventory>>,
    undo: UndoCoordinator,
    ids: G,
}

impl<G: IdGen> CommandService<G> {
    pub fn new(inventory: Inventory, undo: UndoCoordinator, ids: G) -> Self {
        Self {
            inventory: Arc::new(Mutex::new(inventory)),
            undo,
            ids,
        }
    }

    fn inventory(&self) -> MutexGuard<'_, Inventory> {
        self.inventory.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add a new entity at the end of the inventory
    pub fn add(&self, draft: EntityDraft) -> EntityId {
        let mut inventory = self.inventory();
        let id = self.ids.next();
        inventory.push(draft.into_entity(id));
        self.undo.log_add(id);
        info!(%id, "added element");
        id
    }

    /// Replace the entity with the same id, keeping its position
    pub fn update(&self, entity: Entity) -> Result<(), CommandError> {
        let mut inventory = self.inventory();
        let id = entity.id;
        let (index, _) = inventory.find_by_id(id).ok_or(CommandError::NotFound(id))?;
        let prior = inventory
            .replace_at(index, entity)
            .ok_or(CommandError::NotFound(id))?;
        self.undo.log_update(prior);
        info!(%id, index, "updated element");
        Ok(())
    }

    /// Remove one entity by id
    pub fn remove(&self, id: EntityId) -> Result<Entity, CommandError> {
        let mut inventory = self.inventory();
        let entity = inventory
            .find_by_id(id)
            .map(|(_, e)| e.clone())
            .ok_or(CommandError::NotFound(id))?;
        self.undo.log_remove(&entity, &*inventory)?;
        let removed = inventory
            .remove_by_identity(id)
            .ok_or(CommandError::NotFound(id))?;
        info!(%id, "removed element");
        Ok(removed)
    }

    /// Reverse the order of the inventory
    pub fn reverse(&self) {
        let mut inventory = self.inventory();
        inventory.reverse_order();
        self.undo.log_reorder();
        info!("reversed collection");
    }

    /// Remove every entity priced above `price` as one undo unit
    pub fn remove_greater(&self, price: u64) -> Vec<EntityId> {
        self.remove_matching(|e| e.price > price)
    }

    /// Remove every entity as one undo unit
    pub fn clear(&self) -> Vec<EntityId> {
        self.remove_matching(|_| true)
    }

    fn remove_matching(&self, predicate: impl Fn(&Entity) -> bool) -> Vec<EntityId> {
        let mut inventory = self.inventory();
        let doomed: Vec<Entity> = inventory.iter().filter(|e| predicate(e)).cloned().collect();
        if doomed.is_empty() {
            return Vec::new();
        }

        let _txn = self.undo.transaction();
        let mut removed = Vec::with_capacity(doomed.len());
        for entity in &doomed {
            if self.undo.log_remove(entity, &*inventory).is_ok()
                && inventory.remove_by_identity(entity.id).is_some()
            {
                removed.push(entity.id);
            }
        }
        info!(count = removed.len(), "removed elements");
        removed
    }

    /// Undo up to `units` user-visible commands
    pub fn undo(&self, units: usize) -> UndoReport {
        let mut inventory = self.inventory();
        self.undo.undo(units, &mut *inventory)
    }

    /// Persist the undo log
    pub fn save(&self) -> Result<(), CommandError> {
        self.undo.save()?;
        Ok(())
    }

    /// Copy of the current inventory
    pub fn inventory_snapshot(&self) -> Inventory {
        self.inventory().clone()
    }

    pub fn undo_log(&self) -> &UndoCoordinator {
        &self.undo
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
