// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, autosave, shutdown.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;
use serde::Deserialize;
use sp_core::{Inventory, SequentialIdGen};
use sp_storage::{JournalConfig, JournalError, JournalOptions, UndoCoordinator};
use thiserror::Error;
use tracing::{info, warn};

use crate::commands::{CommandError, CommandService};

/// Name of the optional config file inside the state directory
pub const CONFIG_FILE: &str = "stockpile.toml";

const DEFAULT_AUTOSAVE: Duration = Duration::from_secs(30);

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of all daemon state
    pub state_dir: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Path to the persisted inventory
    pub inventory_path: PathBuf,
    /// Undo journal files and options
    pub journal: JournalConfig,
    /// How often to save; `None` disables autosave
    pub autosave: Option<Duration>,
}

/// Contents of `stockpile.toml`
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    #[serde(with = "humantime_serde")]
    autosave: Option<Duration>,
    journal: JournalOptions,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            autosave: Some(DEFAULT_AUTOSAVE),
            journal: JournalOptions::default(),
        }
    }
}

impl Config {
    /// Resolve the state directory and load config for it
    ///
    /// An explicit directory wins, then `STOCKPILE_STATE_DIR`, then the XDG
    /// state directory.
    pub fn load(explicit: Option<PathBuf>) -> Result<Self, LifecycleError> {
        let state_dir = match explicit {
            Some(dir) => dir,
            None => state_dir()?,
        };
        Self::for_state_dir(&state_dir)
    }

    /// Create config rooted at `state_dir`, reading `stockpile.toml` if present
    pub fn for_state_dir(state_dir: &Path) -> Result<Self, LifecycleError> {
        let file = read_file_config(&state_dir.join(CONFIG_FILE))?;

        Ok(Self {
            state_dir: state_dir.to_path_buf(),
            lock_path: state_dir.join("daemon.pid"),
            log_path: state_dir.join("daemon.log"),
            inventory_path: state_dir.join("inventory.json"),
            journal: JournalConfig::in_dir(&state_dir.join("undo")).with_options(file.journal),
            autosave: file.autosave.filter(|d| !d.is_zero()),
        })
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, LifecycleError> {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).map_err(|e| LifecycleError::Config {
            path: path.to_path_buf(),
            source: e,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
        Err(e) => Err(e.into()),
    }
}

/// Daemon state during operation
pub struct DaemonState {
    /// Configuration
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// Command handlers over the loaded inventory
    pub service: CommandService<SequentialIdGen>,
    /// When daemon started
    pub start_time: Instant,
}

impl DaemonState {
    /// Persist the undo journal and the inventory
    pub fn save(&self) -> Result<(), LifecycleError> {
        self.service.save()?;
        save_inventory(&self.config.inventory_path, &self.service.inventory_snapshot())?;
        Ok(())
    }

    /// Shutdown the daemon gracefully
    pub fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");

        let saved = self.save();
        if let Err(e) = &saved {
            warn!("Failed to save state on shutdown: {}", e);
        }

        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        // Lock is released when self.lock_file is dropped
        info!(
            "Daemon shutdown complete after {:?}",
            self.start_time.elapsed()
        );
        saved
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Invalid config at {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid inventory at {path}: {source}")]
    Inventory {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Undo journal error: {0}")]
    Journal(#[from] JournalError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon
pub fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    match startup_inner(config) {
        Ok(state) => Ok(state),
        Err(e) => {
            cleanup_on_failure(config);
            Err(e)
        }
    }
}

/// Inner startup logic - cleanup_on_failure called if this fails
fn startup_inner(config: &Config) -> Result<DaemonState, LifecycleError> {
    // 1. Create state directory
    std::fs::create_dir_all(&config.state_dir)?;

    // 2. Acquire lock file FIRST - prevents two daemons sharing one journal
    let lock_file = File::create(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;

    use std::io::Write;
    let mut lock_file = lock_file;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file;

    // 3. Load the inventory
    let inventory = load_inventory(&config.inventory_path)?;
    info!("Loaded inventory: {} elements", inventory.len());

    // 4. Recover the undo journal (never fails; falls back to empty)
    let undo = UndoCoordinator::recover(config.journal.clone());
    undo.inspect(|journal| {
        if journal.is_stale() {
            warn!("Undo journal recovered with anomalies; it will be rewritten on next save");
        }
    });

    let ids = SequentialIdGen::after(inventory.max_id());
    let service = CommandService::new(inventory, undo, ids);

    info!("Daemon started in {}", config.state_dir.display());

    Ok(DaemonState {
        config: config.clone(),
        lock_file,
        service,
        start_time: Instant::now(),
    })
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &Config) {
    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

/// Load the inventory, treating a missing file as empty
pub fn load_inventory(path: &Path) -> Result<Inventory, LifecycleError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Inventory::new()),
        Err(e) => return Err(e.into()),
    };
    if content.trim().is_empty() {
        return Ok(Inventory::new());
    }
    serde_json::from_str(&content).map_err(|e| LifecycleError::Inventory {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write the inventory as a JSON array
pub fn save_inventory(path: &Path, inventory: &Inventory) -> Result<(), LifecycleError> {
    let json = serde_json::to_string_pretty(inventory).map_err(|e| LifecycleError::Inventory {
        path: path.to_path_buf(),
        source: e,
    })?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    // Write to a sibling then rename so a crash never leaves half an inventory
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Get the state directory for stockpile
fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("STOCKPILE_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }

    // Use XDG_STATE_HOME or default to ~/.local/state
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("stockpile"));
    }

    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/stockpile"))
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
