// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the undo journal

use sp_core::{CollectionError, EntityId};
use thiserror::Error;

/// Errors from loading or saving the journal files
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupted snapshot at line {line}: {source}")]
    CorruptSnapshot {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from applying a compensation to the collection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompensateError {
    #[error("entity {id} not found in collection")]
    NotFoundInCollection { id: EntityId },
    #[error(transparent)]
    Collection(#[from] CollectionError),
}
