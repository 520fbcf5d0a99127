// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup and initialization logic.

use std::io::Write;

use fs2::FileExt;
use lcx_adapters::TftpServer;
use lcx_core::FileKind;
use lcx_storage::FileStore;
use tracing::{info, warn};

use crate::config::load_line_config;

use super::{Config, LifecycleError, StartupResult};

/// Acquire the lock, load the line list, and bind the server.
pub async fn startup(config: &Config) -> Result<StartupResult, LifecycleError> {
    match startup_inner(config).await {
        Ok(result) => Ok(result),
        Err(e) => {
            // A failed lock means the files belong to a running daemon
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(config);
            }
            Err(e)
        }
    }
}

async fn startup_inner(config: &Config) -> Result<StartupResult, LifecycleError> {
    // 1. Create the store directory (holds the lock file too)
    std::fs::create_dir_all(&config.dir)?;

    // 2. Acquire the lock before touching anything else.
    // Don't truncate until the lock is held; that would wipe a running daemon's PID.
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file;

    // 3. Load and validate the line list before binding
    let line_config = load_line_config(config.lines_path.as_deref())?;
    match &config.lines_path {
        Some(path) => info!(lines = line_config.lines().len(), path = %path.display(), "Loaded line list"),
        None => info!(lines = line_config.lines().len(), "Using built-in line list"),
    }

    let store = FileStore::open(&config.dir)?;

    // 4. Bind LAST, only after all validation passes
    let server = TftpServer::listen(config.port, store.clone())
        .await
        .map_err(|e| LifecycleError::BindFailed(config.port, e))?
        .with_config(config.transfer)
        // Stations only ever push their info reply
        .with_upload_kinds(&[FileKind::Info]);
    if config.abort_first {
        server.arm_abort();
        info!("First request will be refused");
    }
    if let Ok(addr) = server.local_addr() {
        info!(%addr, dir = %config.dir.display(), "Listening");
    }

    Ok(StartupResult { lock_file, store, line_config, server })
}

fn cleanup_on_failure(config: &Config) {
    if config.lock_path.exists() {
        if let Err(e) = std::fs::remove_file(&config.lock_path) {
            warn!("Failed to remove PID file during cleanup: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
