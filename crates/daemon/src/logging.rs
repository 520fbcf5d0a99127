// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup: daemon log file plus stderr.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::lifecycle::LifecycleError;

/// Install the global subscriber. Keep the guard alive for the life of the
/// process; dropping it flushes and stops the file writer.
pub fn init(log_path: &Path, filter: &str) -> Result<WorkerGuard, LifecycleError> {
    let dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;
    let file_name = log_path.file_name().unwrap_or_else(|| "lcxd.log".as_ref());

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));

    // Fall back to info rather than refusing to start over a bad directive
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| LifecycleError::Logging(e.to_string()))?;

    Ok(guard)
}
