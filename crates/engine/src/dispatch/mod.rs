// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Routing of inbound requests to handlers by file kind.

mod handlers;

pub use handlers::{FullListHandler, InfoHandler, SessionLauncher, StatusHandler};

use std::collections::HashMap;
use std::net::SocketAddr;

use async_trait::async_trait;
use lcx_adapters::{ExchangeServer, TransferError};
use lcx_core::{split_name, FileKind};
use lcx_storage::StoreError;
use thiserror::Error;
use tracing::{debug, info};

/// A request for a file of a recognised kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRequest {
    /// Name as requested
    pub name: String,
    /// Station namespace
    pub stem: String,
    pub kind: FileKind,
    pub peer: Option<SocketAddr>,
}

impl InboundRequest {
    /// The store name for this request, with the canonical suffix.
    pub fn file_name(&self) -> String {
        self.kind.file_name(&self.stem)
    }
}

/// What became of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Nothing arrived
    Idle,
    /// Name without a recognised suffix; dropped
    Unrecognized(String),
    /// No handler registered for the kind; dropped
    Unhandled(InboundRequest),
    /// Refused by the fault-injection flag
    Aborted(InboundRequest),
    Handled(InboundRequest),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("store: {0}")]
    Store(#[from] StoreError),

    #[error("transfer: {0}")]
    Transfer(#[from] TransferError),
}

#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(
        &self,
        request: &InboundRequest,
        server: &dyn ExchangeServer,
    ) -> Result<(), DispatchError>;
}

/// Maps each file kind to at most one handler.
#[derive(Default)]
pub struct Router {
    handlers: HashMap<FileKind, Box<dyn RequestHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind`, replacing any earlier one.
    pub fn route(mut self, kind: FileKind, handler: impl RequestHandler + 'static) -> Self {
        self.handlers.insert(kind, Box::new(handler));
        self
    }

    pub fn handles(&self, kind: FileKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Wait for one request on `server` and dispatch it.
    pub async fn serve_next<S: ExchangeServer>(&self, server: &S) -> Result<Disposition, DispatchError> {
        match server.wait_for_request().await {
            Some(name) => self.dispatch(server, name).await,
            None => Ok(Disposition::Idle),
        }
    }

    /// Dispatch a request `server` has just received.
    pub async fn dispatch<S: ExchangeServer>(
        &self,
        server: &S,
        name: String,
    ) -> Result<Disposition, DispatchError> {
        let Some((stem, kind)) = split_name(&name) else {
            debug!(name, "ignoring request with unrecognised suffix");
            return Ok(Disposition::Unrecognized(name));
        };
        let request = InboundRequest {
            stem: stem.to_string(),
            kind,
            peer: server.client_address(),
            name: name.clone(),
        };

        let Some(handler) = self.handlers.get(&kind) else {
            debug!(name, %kind, "no handler for kind");
            return Ok(Disposition::Unhandled(request));
        };
        if server.should_abort() {
            info!(name, peer = ?request.peer, "refusing request");
            return Ok(Disposition::Aborted(request));
        }

        handler.handle(&request, server).await?;
        Ok(Disposition::Handled(request))
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
