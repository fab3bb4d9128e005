// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live collection contract
//!
//! The undo log never owns the shared collection. It only touches it through
//! [`EntityCollection`]: index-based insert, identity-based find and remove,
//! and in-place reversal.

use crate::entity::{Entity, EntityId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by collection mutations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("index {index} out of range for collection of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Minimal mutation contract of the shared collection
pub trait EntityCollection {
    /// Insert an entity at `index`, shifting later entities back
    fn insert_at(&mut self, index: usize, entity: Entity) -> Result<(), CollectionError>;

    /// Find an entity by id, returning its position and value
    fn find_by_id(&self, id: EntityId) -> Option<(usize, &Entity)>;

    /// Remove the entity with the given identity
    fn remove_by_identity(&mut self, id: EntityId) -> Option<Entity>;

    /// Reverse the order of the whole collection
    fn reverse_order(&mut self);
}

/// Ordered, `Vec`-backed collection of entities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    entities: Vec<Entity>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entities(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Append an entity at the end
    pub fn push(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Replace the entity at `index`, returning the previous value
    pub fn replace_at(&mut self, index: usize, entity: Entity) -> Option<Entity> {
        let slot = self.entities.get_mut(index)?;
        Some(std::mem::replace(slot, entity))
    }

    /// Highest id currently present
    pub fn max_id(&self) -> Option<EntityId> {
        self.entities.iter().map(|e| e.id).max()
    }

    /// Ids in collection order
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id).collect()
    }
}

impl EntityCollection for Inventory {
    fn insert_at(&mut self, index: usize, entity: Entity) -> Result<(), CollectionError> {
        let len = self.entities.len();
        if index > len {
            return Err(CollectionError::IndexOutOfRange { index, len });
        }
        self.entities.insert(index, entity);
        Ok(())
    }

    fn find_by_id(&self, id: EntityId) -> Option<(usize, &Entity)> {
        self.entities.iter().enumerate().find(|(_, e)| e.id == id)
    }

    fn remove_by_identity(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    fn reverse_order(&mut self) {
        self.entities.reverse();
    }
}

#[cfg(test)]
#[path = "collection_tests.rs"]
mod tests;
