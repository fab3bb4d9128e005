// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entity id generation

use crate::entity::EntityId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generates unique entity identifiers
pub trait IdGen: Clone + Send + Sync {
    fn next(&self) -> EntityId;
}

/// Monotonic id generator shared between clones
#[derive(Clone)]
pub struct SequentialIdGen {
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    /// Start handing out ids at `first`
    pub fn starting_at(first: u64) -> Self {
        Self {
            counter: Arc::new(AtomicU64::new(first)),
        }
    }

    /// Resume after the highest id already in use
    pub fn after(highest: Option<EntityId>) -> Self {
        Self::starting_at(highest.map(|id| id.0.saturating_add(1)).unwrap_or(1))
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> EntityId {
        EntityId(self.counter.fetch_add(1, Ordering::SeqCst))
    }
}
