// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entity model for the shared collection
//!
//! An entity is a product record with a stable identifier and an owner.
//! Once captured in an undo snapshot it is treated as an immutable value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Unique identifier for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(EntityId)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        EntityId(id)
    }
}

/// Position of a product on the storage floor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: i64,
    pub y: i64,
}

/// Unit a product is sold in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitOfMeasure {
    Kilograms,
    Centimeters,
    Square,
    Liters,
    Milligrams,
}

/// A product in the shared collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub coordinates: Coordinates,
    pub price: u64,
    pub manufacture_cost: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_of_measure: Option<UnitOfMeasure>,
    /// Name of the user that created the entity
    pub owner: String,
}

impl Entity {
    /// Create an entity with zeroed numeric fields
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinates: Coordinates::default(),
            price: 0,
            manufacture_cost: 0,
            unit_of_measure: None,
            owner: owner.into(),
        }
    }

    /// Builder-style price setter
    pub fn with_price(mut self, price: u64) -> Self {
        self.price = price;
        self
    }
}

/// An entity that has not been assigned an identifier yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDraft {
    pub name: String,
    pub coordinates: Coordinates,
    pub price: u64,
    pub manufacture_cost: u64,
    #[serde(default)]
    pub unit_of_measure: Option<UnitOfMeasure>,
    pub owner: String,
}

impl EntityDraft {
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coordinates: Coordinates::default(),
            price: 0,
            manufacture_cost: 0,
            unit_of_measure: None,
            owner: owner.into(),
        }
    }

    pub fn with_price(mut self, price: u64) -> Self {
        self.price = price;
        self
    }

    /// Attach an identifier, producing a full entity
    pub fn into_entity(self, id: EntityId) -> Entity {
        Entity {
            id,
            name: self.name,
            coordinates: self.coordinates,
            price: self.price,
            manufacture_cost: self.manufacture_cost,
            unit_of_measure: self.unit_of_measure,
            owner: self.owner,
        }
    }
}

#[cfg(test)]
#[path = "entity_tests.rs"]
mod tests;
