// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sp-storage: Persistent undo log for the shared collection
//!
//! Command handlers log a compensation after every mutation of the shared
//! collection. An undo pops compensations (whole transactions at a time) and
//! applies them to the collection. The stack survives restarts through two
//! files: a line-oriented record log and a JSON-lines snapshot file.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod compensate;
pub mod config;
pub mod coordinator;
pub mod entry;
pub mod error;
pub mod journal;
pub mod log_file;
pub mod record;
pub mod snapshot;

pub use config::{JournalConfig, JournalOptions};
pub use coordinator::{TransactionGuard, UndoCoordinator};
pub use entry::{Compensation, UndoEntry};
pub use error::{CompensateError, JournalError};
pub use journal::{UndoJournal, UndoReport};
pub use record::{LogRecord, RecordParseError, TRANSACTION_DELIMITER};
