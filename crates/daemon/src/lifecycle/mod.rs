// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup and shutdown.

mod startup;
pub use startup::startup;

use std::fs::File;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lcx_adapters::{TftpServer, TransferConfig, TransferError};
use lcx_core::LineConfigRecord;
use lcx_engine::ContinuationPolicy;
use lcx_storage::{FileStore, StoreError};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::ConfigError;
use crate::env;
use crate::listener::{build_router, Listener};
use crate::sessions::{SessionReport, SessionSettings, Sessions};

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// File store directory; also holds the lock and log files
    pub dir: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Listening port
    pub port: u16,
    /// Port stations accept uploads on
    pub remote_port: u16,
    /// Line list file; the built-in list when `None`
    pub lines_path: Option<PathBuf>,
    pub poll_interval: Duration,
    pub policy: ContinuationPolicy,
    /// Refuse the first request after startup
    pub abort_first: bool,
    pub transfer: TransferConfig,
}

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self, LifecycleError> {
        let port = env::port();
        let mut config = Self::for_dir(env::store_dir()?);
        config.port = port;
        config.remote_port = env::remote_port().unwrap_or(port);
        config.lines_path = env::config_path();
        config.poll_interval = env::poll_interval();
        config.policy = ContinuationPolicy {
            max_consecutive_errors: env::max_consecutive_errors(),
            max_iterations: env::max_iterations(),
        };
        config.abort_first = env::abort_first();
        config.transfer.timeout = env::transfer_timeout();
        Ok(config)
    }

    /// Defaults for a daemon rooted at `dir`.
    pub fn for_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            lock_path: dir.join("lcxd.pid"),
            log_path: dir.join("lcxd.log"),
            dir,
            port: env::DEFAULT_PORT,
            remote_port: env::DEFAULT_PORT,
            lines_path: None,
            poll_interval: Duration::from_secs(1),
            policy: ContinuationPolicy::default(),
            abort_first: false,
            transfer: TransferConfig::default(),
        }
    }
}

/// Everything startup acquired, ready to be wired into a [`Daemon`].
pub struct StartupResult {
    pub lock_file: File,
    pub store: FileStore,
    pub line_config: LineConfigRecord,
    pub server: TftpServer,
}

/// A running daemon: the accept loop plus every poll session it launched.
pub struct Daemon {
    /// Configuration
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    pub store: FileStore,
    pub line_config: LineConfigRecord,
    local_addr: SocketAddr,
    sessions: Arc<Sessions>,
    listener: JoinHandle<()>,
    cancel: CancellationToken,
    /// When daemon started
    pub start_time: Instant,
}

impl Daemon {
    /// Run startup, then spawn the accept loop.
    pub async fn start(config: Config) -> Result<Self, LifecycleError> {
        let start_time = Instant::now();
        let StartupResult { lock_file, store, line_config, server } = startup(&config).await?;
        let local_addr = server.local_addr().map_err(|e| LifecycleError::BindFailed(config.port, e))?;

        let cancel = CancellationToken::new();
        let settings = SessionSettings {
            remote_port: config.remote_port,
            poll_interval: config.poll_interval,
            policy: config.policy,
            transfer: config.transfer,
        };
        let sessions =
            Arc::new(Sessions::new(settings, store.clone(), line_config.clone(), cancel.child_token()));
        let router = build_router(store.clone(), line_config.clone(), sessions.clone());
        let listener = tokio::spawn(Listener::new(Arc::new(server), router, cancel.clone()).run());

        info!(%local_addr, remote_port = config.remote_port, "Daemon started");
        Ok(Self {
            config,
            lock_file,
            store,
            line_config,
            local_addr,
            sessions,
            listener,
            cancel,
            start_time,
        })
    }

    /// Address the server is listening on.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    /// Token that stops the accept loop and every session when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop accepting, cancel running sessions, and release the lock.
    ///
    /// Returns a report for every session that ran.
    pub async fn shutdown(self) -> Result<Vec<SessionReport>, LifecycleError> {
        info!("Shutting down daemon...");
        self.cancel.cancel();
        if let Err(e) = self.listener.await {
            warn!("Listener task failed: {}", e);
        }
        let reports = self.sessions.join_all().await;

        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        info!(
            sessions = reports.len(),
            uptime_secs = self.start_time.elapsed().as_secs(),
            "Daemon shutdown complete"
        );
        Ok(reports)
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind port {0}: {1}")]
    BindFailed(u16, #[source] TransferError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
