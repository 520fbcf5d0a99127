// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use lcx_adapters::ExchangeServer;
use lcx_core::{InfoRecord, LineConfigRecord, StatusCode};
use lcx_storage::FileStore;
use tracing::{debug, info, warn};

use super::{DispatchError, InboundRequest, RequestHandler};

/// Starts poll sessions for stations that announced themselves.
pub trait SessionLauncher: Send + Sync {
    /// Start polling `stem` at `peer`. Returns false when a session for
    /// `stem` is already running.
    fn launch(&self, stem: &str, peer: SocketAddr) -> bool;

    /// Whether a session for `stem` is still running.
    fn is_running(&self, stem: &str) -> bool;
}

/// Answers an info request, then starts a poll session for the requesting
/// station. A station without a running session gets a fresh
/// acknowledgement; a running session's reply is served as it stands.
pub struct InfoHandler {
    store: FileStore,
    initial_status: StatusCode,
    launcher: Arc<dyn SessionLauncher>,
}

impl InfoHandler {
    pub fn new(store: FileStore, launcher: Arc<dyn SessionLauncher>) -> Self {
        Self { store, initial_status: StatusCode::ACCEPTED, launcher }
    }

    pub fn with_initial_status(mut self, status: StatusCode) -> Self {
        self.initial_status = status;
        self
    }
}

#[async_trait]
impl RequestHandler for InfoHandler {
    async fn handle(
        &self,
        request: &InboundRequest,
        server: &dyn ExchangeServer,
    ) -> Result<(), DispatchError> {
        let name = request.file_name();
        if self.launcher.is_running(&request.stem) && self.store.exists(&name) {
            debug!(station = %request.stem, "serving reply of running session");
        } else {
            self.store.generate(&name, &InfoRecord::acknowledgement(self.initial_status))?;
        }
        server.send_file(&name).await?;

        let Some(peer) = request.peer else {
            warn!(station = %request.stem, "info request without a requester address");
            return Ok(());
        };
        if self.launcher.launch(&request.stem, peer) {
            info!(station = %request.stem, %peer, "session started");
        } else {
            debug!(station = %request.stem, "session already running");
        }
        Ok(())
    }
}

/// Regenerates the configured line list and serves it.
pub struct FullListHandler {
    store: FileStore,
    record: LineConfigRecord,
}

impl FullListHandler {
    pub fn new(store: FileStore, record: LineConfigRecord) -> Self {
        Self { store, record }
    }
}

#[async_trait]
impl RequestHandler for FullListHandler {
    async fn handle(
        &self,
        request: &InboundRequest,
        server: &dyn ExchangeServer,
    ) -> Result<(), DispatchError> {
        let name = request.file_name();
        self.store.generate(&name, &self.record)?;
        server.send_file(&name).await?;
        Ok(())
    }
}

/// Serves the station's current status file. A missing file is reported
/// to the requester by the server.
pub struct StatusHandler;

#[async_trait]
impl RequestHandler for StatusHandler {
    async fn handle(
        &self,
        request: &InboundRequest,
        server: &dyn ExchangeServer,
    ) -> Result<(), DispatchError> {
        server.send_file(&request.file_name()).await?;
        Ok(())
    }
}
