// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sp-core: Core types for the Stockpile collection manager
//!
//! This crate provides:
//! - The entity model stored in the shared collection
//! - The minimal collection contract the undo log mutates through
//! - Entity id generation

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod collection;
pub mod entity;
pub mod id;

pub use collection::{CollectionError, EntityCollection, Inventory};
pub use entity::{Coordinates, Entity, EntityDraft, EntityId, UnitOfMeasure};
pub use id::{IdGen, SequentialIdGen};
