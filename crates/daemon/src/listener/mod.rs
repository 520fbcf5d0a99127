// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for inbound exchange requests.
//!
//! The Listener runs in a spawned task, taking one request at a time from
//! the exchange server and routing it by file kind. Info requests start poll
//! sessions through the [`SessionLauncher`]; sessions run on their own tasks
//! so a slow station never blocks the accept loop.

use std::sync::Arc;

use lcx_adapters::ExchangeServer;
use lcx_core::{FileKind, LineConfigRecord};
use lcx_engine::{
    DispatchError, Disposition, FullListHandler, InfoHandler, Router, SessionLauncher,
    StatusHandler,
};
use lcx_storage::FileStore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Routes for every file kind the daemon serves.
pub fn build_router(
    store: FileStore,
    line_config: LineConfigRecord,
    launcher: Arc<dyn SessionLauncher>,
) -> Router {
    Router::new()
        .route(FileKind::Info, InfoHandler::new(store.clone(), launcher))
        .route(FileKind::FullList, FullListHandler::new(store, line_config))
        .route(FileKind::Status, StatusHandler)
}

/// Accept loop over an exchange server.
pub struct Listener<S> {
    server: Arc<S>,
    router: Router,
    cancel: CancellationToken,
}

impl<S: ExchangeServer> Listener<S> {
    pub fn new(server: Arc<S>, router: Router, cancel: CancellationToken) -> Self {
        Self { server, router, cancel }
    }

    /// Serve requests until cancelled. Failed requests are logged and skipped.
    pub async fn run(self) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!("Listener cancelled");
                    return;
                }
                result = self.router.serve_next(&*self.server) => {
                    match result {
                        Ok(Disposition::Idle) => tokio::task::yield_now().await,
                        Ok(disposition) => log_disposition(&disposition),
                        Err(e) => log_dispatch_error(e),
                    }
                }
            }
        }
    }
}

fn log_disposition(disposition: &Disposition) {
    match disposition {
        Disposition::Idle => {}
        Disposition::Unrecognized(name) => debug!(name, "Dropped request"),
        Disposition::Unhandled(request) => {
            debug!(name = %request.name, kind = %request.kind, "No route for request")
        }
        Disposition::Aborted(request) => {
            info!(name = %request.name, peer = ?request.peer, "Request refused")
        }
        Disposition::Handled(request) => {
            debug!(name = %request.name, peer = ?request.peer, "Request served")
        }
    }
}

fn log_dispatch_error(e: DispatchError) {
    match e {
        DispatchError::Transfer(e) => warn!("Transfer failed: {}", e),
        DispatchError::Store(e) => warn!("Store error: {}", e),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
