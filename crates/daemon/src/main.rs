// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! lcxd entry point.

use std::process::ExitCode;

use lcx_daemon::{env, logging, Config, Daemon, LifecycleError};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("lcxd: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), LifecycleError> {
    let config = Config::load()?;
    let _log_guard = logging::init(&config.log_path, &env::log_filter())?;

    let daemon = match Daemon::start(config).await {
        Ok(daemon) => daemon,
        Err(e) => {
            error!("Startup failed: {}", e);
            return Err(e);
        }
    };

    wait_for_shutdown_signal().await;
    info!("Shutdown signal received");

    for report in daemon.shutdown().await? {
        match report.report {
            Some(r) => info!(station = %report.stem, outcome = ?r.outcome, iterations = r.iterations, "Session summary"),
            None => info!(station = %report.stem, "Session cancelled before completion"),
        }
    }
    Ok(())
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = &mut ctrl_c => {}
                _ = term.recv() => {}
            }
        }
        Err(e) => {
            error!("Failed to install SIGTERM handler: {}", e);
            let _ = ctrl_c.await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
