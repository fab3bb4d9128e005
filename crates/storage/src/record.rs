// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Undo log records and their line encoding
//!
//! Records are compensations: each one describes how to reverse a mutation
//! that has already been applied to the collection. On disk a record is one
//! line of the form `<opcode> <argument>`:
//!
//! ```text
//! add 3          re-insert the snapshotted entity at index 3
//! remove 17      remove the entity with id 17
//! update 17      restore the snapshotted value of entity 17
//! reverse        reverse the collection
//! --- transaction ---
//! ```

use sp_core::EntityId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Sentinel line written for a transaction delimiter. It contains spaces and
/// dashes, so it can never be mistaken for an opcode token.
pub const TRANSACTION_DELIMITER: &str = "--- transaction ---";

const OP_ADD: &str = "add";
const OP_REMOVE: &str = "remove";
const OP_UPDATE: &str = "update";
const OP_REVERSE: &str = "reverse";

/// Errors from parsing a log line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordParseError {
    #[error("empty record")]
    Empty,
    #[error("unknown opcode: {0}")]
    UnknownOpcode(String),
    #[error("missing argument for {0}")]
    MissingArgument(&'static str),
    #[error("invalid argument for {opcode}: {value}")]
    InvalidArgument { opcode: &'static str, value: String },
    #[error("unexpected argument for {opcode}: {value}")]
    UnexpectedArgument { opcode: &'static str, value: String },
}

/// One entry of the log record stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRecord {
    /// Logged after a remove; undo re-inserts the snapshot at `index`
    CompensateAdd { index: usize },
    /// Logged after an add; undo removes the entity with `id`
    CompensateRemove { id: EntityId },
    /// Logged after an update; undo restores the snapshot over `id`
    CompensateUpdate { id: EntityId },
    /// Logged after a reversal; undo reverses again
    CompensateReorder,
    /// Opens or closes a transaction
    TransactionDelimiter,
}

impl LogRecord {
    /// Whether this record owns one entry of the snapshot stack
    pub fn needs_snapshot(&self) -> bool {
        matches!(
            self,
            LogRecord::CompensateAdd { .. } | LogRecord::CompensateUpdate { .. }
        )
    }

    pub fn is_delimiter(&self) -> bool {
        matches!(self, LogRecord::TransactionDelimiter)
    }

    /// Encode as a single log line (without newline)
    pub fn to_line(&self) -> String {
        self.to_string()
    }

    /// Parse a single log line
    ///
    /// Trailing whitespace is ignored, so `"reverse "` parses.
    pub fn from_line(line: &str) -> Result<Self, RecordParseError> {
        let line = line.trim_end();
        if line == TRANSACTION_DELIMITER {
            return Ok(LogRecord::TransactionDelimiter);
        }
        if line.is_empty() {
            return Err(RecordParseError::Empty);
        }

        let (opcode, argument) = match line.split_once(' ') {
            Some((op, arg)) => (op, Some(arg.trim())),
            None => (line, None),
        };

        match opcode {
            OP_ADD => parse_argument(OP_ADD, argument)
                .map(|index| LogRecord::CompensateAdd { index }),
            OP_REMOVE => parse_argument(OP_REMOVE, argument)
                .map(|id| LogRecord::CompensateRemove { id }),
            OP_UPDATE => parse_argument(OP_UPDATE, argument)
                .map(|id| LogRecord::CompensateUpdate { id }),
            OP_REVERSE => match argument {
                None | Some("") => Ok(LogRecord::CompensateReorder),
                Some(value) => Err(RecordParseError::UnexpectedArgument {
                    opcode: OP_REVERSE,
                    value: value.to_string(),
                }),
            },
            other => Err(RecordParseError::UnknownOpcode(other.to_string())),
        }
    }
}

fn parse_argument<T: FromStr>(
    opcode: &'static str,
    argument: Option<&str>,
) -> Result<T, RecordParseError> {
    let value = match argument {
        Some(value) if !value.is_empty() => value,
        _ => return Err(RecordParseError::MissingArgument(opcode)),
    };
    value
        .parse()
        .map_err(|_| RecordParseError::InvalidArgument {
            opcode,
            value: value.to_string(),
        })
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogRecord::CompensateAdd { index } => write!(f, "{} {}", OP_ADD, index),
            LogRecord::CompensateRemove { id } => write!(f, "{} {}", OP_REMOVE, id),
            LogRecord::CompensateUpdate { id } => write!(f, "{} {}", OP_UPDATE, id),
            LogRecord::CompensateReorder => f.write_str(OP_REVERSE),
            LogRecord::TransactionDelimiter => f.write_str(TRANSACTION_DELIMITER),
        }
    }
}

impl FromStr for LogRecord {
    type Err = RecordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogRecord::from_line(s)
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
