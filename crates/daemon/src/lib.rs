// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sp-daemon: Owns the shared inventory and its undo log

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod commands;
pub mod lifecycle;

pub use commands::{CommandError, CommandService};
pub use lifecycle::{startup, Config, DaemonState, LifecycleError};
