// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    add = { LogRecord::CompensateAdd { index: 3 }, "add 3" },
    remove = { LogRecord::CompensateRemove { id: EntityId(17) }, "remove 17" },
    update = { LogRecord::CompensateUpdate { id: EntityId(17) }, "update 17" },
    reverse = { LogRecord::CompensateReorder, "reverse" },
    delimiter = { LogRecord::TransactionDelimiter, TRANSACTION_DELIMITER },
)]
fn record_encodes_as_line(record: LogRecord, line: &str) {
    assert_eq!(record.to_line(), line);
    assert_eq!(LogRecord::from_line(line).unwrap(), record);
}

#[parameterized(
    trailing_space_reverse = { "reverse ", LogRecord::CompensateReorder },
    trailing_newline = { "add 0\n", LogRecord::CompensateAdd { index: 0 } },
    crlf = { "remove 9\r\n", LogRecord::CompensateRemove { id: EntityId(9) } },
    delimiter_trailing_space = { "--- transaction --- ", LogRecord::TransactionDelimiter },
)]
fn record_parse_tolerates_trailing_whitespace(line: &str, expected: LogRecord) {
    assert_eq!(LogRecord::from_line(line).unwrap(), expected);
}

#[parameterized(
    empty = { "", RecordParseError::Empty },
    whitespace = { "   ", RecordParseError::Empty },
    unknown = { "insert 3", RecordParseError::UnknownOpcode("insert".to_string()) },
    add_without_index = { "add", RecordParseError::MissingArgument("add") },
    update_blank_argument = { "update ", RecordParseError::MissingArgument("update") },
    negative_index = { "add -1", RecordParseError::InvalidArgument { opcode: "add", value: "-1".to_string() } },
    word_id = { "remove abc", RecordParseError::InvalidArgument { opcode: "remove", value: "abc".to_string() } },
    reverse_with_argument = { "reverse 2", RecordParseError::UnexpectedArgument { opcode: "reverse", value: "2".to_string() } },
)]
fn record_parse_rejects_malformed(line: &str, expected: RecordParseError) {
    assert_eq!(LogRecord::from_line(line).unwrap_err(), expected);
}

#[test]
fn delimiter_never_parses_as_opcode() {
    let first_token = TRANSACTION_DELIMITER.split(' ').next().unwrap();
    assert!(!["add", "remove", "update", "reverse"].contains(&first_token));
}

#[test]
fn only_add_and_update_need_snapshots() {
    assert!(LogRecord::CompensateAdd { index: 0 }.needs_snapshot());
    assert!(LogRecord::CompensateUpdate { id: EntityId(1) }.needs_snapshot());
    assert!(!LogRecord::CompensateRemove { id: EntityId(1) }.needs_snapshot());
    assert!(!LogRecord::CompensateReorder.needs_snapshot());
    assert!(!LogRecord::TransactionDelimiter.needs_snapshot());
}
