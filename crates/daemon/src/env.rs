// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::lifecycle::LifecycleError;

/// Standard TFTP port
pub const DEFAULT_PORT: u16 = 69;

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse::<T>().ok())
}

/// Resolve store directory: LCX_DIR > XDG_STATE_HOME/lcx > ~/.local/state/lcx
pub fn store_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("LCX_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("lcx"));
    }
    let home = dirs::home_dir().ok_or(LifecycleError::NoStateDir)?;
    Ok(home.join(".local/state/lcx"))
}

/// Listening port (default 69)
pub fn port() -> u16 {
    parsed("LCX_PORT").unwrap_or(DEFAULT_PORT)
}

/// Port stations accept uploads on. Defaults to the listening port.
pub fn remote_port() -> Option<u16> {
    parsed("LCX_REMOTE_PORT")
}

/// TOML file holding the line list to serve
pub fn config_path() -> Option<PathBuf> {
    std::env::var("LCX_CONFIG").ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Delay between poll iterations (default 1s)
pub fn poll_interval() -> Duration {
    parsed("LCX_POLL_INTERVAL_MS").map(Duration::from_millis).unwrap_or(Duration::from_secs(1))
}

pub fn max_consecutive_errors() -> Option<u32> {
    parsed("LCX_MAX_CONSECUTIVE_ERRORS")
}

pub fn max_iterations() -> Option<u64> {
    parsed("LCX_MAX_ITERATIONS")
}

/// Refuse the first request after startup
pub fn abort_first() -> bool {
    std::env::var("LCX_ABORT_FIRST")
        .map(|v| !matches!(v.trim(), "" | "0" | "false" | "no"))
        .unwrap_or(false)
}

/// Per-packet transfer timeout (default 1s)
pub fn transfer_timeout() -> Duration {
    parsed("LCX_TRANSFER_TIMEOUT_MS").map(Duration::from_millis).unwrap_or(Duration::from_secs(1))
}

/// Tracing filter directive (default "info")
pub fn log_filter() -> String {
    std::env::var("LCX_LOG").ok().filter(|s| !s.is_empty()).unwrap_or_else(|| "info".to_string())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
