// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Poll sessions, one per announcing station.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use lcx_adapters::{ExchangeClient, TftpClient, TransferConfig};
use lcx_core::{Clock, LineConfigRecord, SystemClock};
use lcx_engine::{
    ContinuationPolicy, PollController, PollOutcome, PollReport, SessionConfig, SessionLauncher,
    DEFAULT_POLL_INTERVAL,
};
use lcx_storage::FileStore;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Instrument};

/// Settings shared by every session the daemon starts.
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    /// Port the station accepts uploads on
    pub remote_port: u16,
    pub poll_interval: Duration,
    pub policy: ContinuationPolicy,
    pub transfer: TransferConfig,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            remote_port: crate::env::DEFAULT_PORT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            policy: ContinuationPolicy::default(),
            transfer: TransferConfig::default(),
        }
    }
}

/// How one session ended. `report` is `None` when it was cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub stem: String,
    pub report: Option<PollReport>,
}

impl SessionReport {
    pub fn outcome(&self) -> Option<PollOutcome> {
        self.report.as_ref().map(|r| r.outcome)
    }
}

/// Drive `controller` until it reaches an outcome or `cancel` fires.
pub async fn run_until_cancelled<C: ExchangeClient, K: Clock>(
    mut controller: PollController<C, K>,
    cancel: CancellationToken,
) -> Option<PollReport> {
    tokio::select! {
        report = controller.run() => Some(report),
        _ = cancel.cancelled() => None,
    }
}

/// Launches and tracks poll sessions. At most one runs per station.
pub struct Sessions {
    settings: SessionSettings,
    store: FileStore,
    line_config: LineConfigRecord,
    cancel: CancellationToken,
    running: Mutex<HashMap<String, JoinHandle<()>>>,
    finished: Arc<Mutex<Vec<SessionReport>>>,
}

impl Sessions {
    pub fn new(
        settings: SessionSettings,
        store: FileStore,
        line_config: LineConfigRecord,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            settings,
            store,
            line_config,
            cancel,
            running: Mutex::new(HashMap::new()),
            finished: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sessions still polling.
    pub fn active_count(&self) -> usize {
        self.running.lock().values().filter(|h| !h.is_finished()).count()
    }

    /// Reports of every session that has ended, in completion order.
    pub fn finished(&self) -> Vec<SessionReport> {
        self.finished.lock().clone()
    }

    /// Cancel every running session and wait for all of them to end.
    pub async fn join_all(&self) -> Vec<SessionReport> {
        self.cancel.cancel();
        let handles: Vec<(String, JoinHandle<()>)> = self.running.lock().drain().collect();
        for (stem, handle) in handles {
            if let Err(e) = handle.await {
                warn!(station = %stem, error = %e, "session task failed");
            }
        }
        self.finished()
    }

    fn spawn(&self, stem: &str, peer: SocketAddr) -> JoinHandle<()> {
        let endpoint = SocketAddr::new(peer.ip(), self.settings.remote_port);
        let config = SessionConfig::for_station(endpoint, self.store.root(), stem)
            .with_poll_interval(self.settings.poll_interval)
            .with_policy(self.settings.policy);
        let client =
            TftpClient::new(endpoint, self.store.clone()).with_config(self.settings.transfer);
        let controller = PollController::new(config, self.line_config.clone(), client, SystemClock);

        let cancel = self.cancel.child_token();
        let finished = Arc::clone(&self.finished);
        let stem = stem.to_string();
        let span = tracing::info_span!("session", station = %stem, %endpoint);
        tokio::spawn(
            async move {
                let report = run_until_cancelled(controller, cancel).await;
                match &report {
                    Some(r) => info!(
                        outcome = ?r.outcome,
                        iterations = r.iterations,
                        uploads_failed = r.uploads_failed,
                        elapsed = ?r.elapsed,
                        "session ended"
                    ),
                    None => info!("session cancelled"),
                }
                finished.lock().push(SessionReport { stem, report });
            }
            .instrument(span),
        )
    }
}

impl SessionLauncher for Sessions {
    fn launch(&self, stem: &str, peer: SocketAddr) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        let mut running = self.running.lock();
        if running.get(stem).is_some_and(|h| !h.is_finished()) {
            return false;
        }
        let handle = self.spawn(stem, peer);
        running.insert(stem.to_string(), handle);
        true
    }

    fn is_running(&self, stem: &str) -> bool {
        self.running.lock().get(stem).is_some_and(|h| !h.is_finished())
    }
}

#[cfg(test)]
#[path = "sessions_tests.rs"]
mod tests;
