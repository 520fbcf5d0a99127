// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-station session configuration and the state that evolves across polls.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use lcx_core::{FileKind, SequenceCounter};

/// Delay between poll iterations unless configured otherwise.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Bounds on how long a session keeps polling without a terminal status.
///
/// The default has no bounds: the session polls until the remote reports
/// completion, continuing through every failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContinuationPolicy {
    /// Stop after this many failed cycles in a row
    pub max_consecutive_errors: Option<u32>,
    /// Stop after this many poll iterations
    pub max_iterations: Option<u64>,
}

impl ContinuationPolicy {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub(crate) fn escalates(&self, consecutive_errors: u32) -> bool {
        self.max_consecutive_errors.is_some_and(|max| consecutive_errors >= max)
    }

    pub(crate) fn exhausted(&self, iterations: u64) -> bool {
        self.max_iterations.is_some_and(|max| iterations >= max)
    }
}

/// Immutable description of one station's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Where uploads go
    pub endpoint: SocketAddr,
    /// File store directory
    pub directory: PathBuf,
    /// Station namespace; every file name below derives from it
    pub stem: String,
    pub full_list_name: String,
    pub status_name: String,
    pub info_name: String,
    pub poll_interval: Duration,
    pub policy: ContinuationPolicy,
}

impl SessionConfig {
    /// Session for the station identified by `stem`, with its own file names.
    pub fn for_station(
        endpoint: SocketAddr,
        directory: impl Into<PathBuf>,
        stem: impl Into<String>,
    ) -> Self {
        let stem = stem.into();
        Self {
            endpoint,
            directory: directory.into(),
            full_list_name: FileKind::FullList.file_name(&stem),
            status_name: FileKind::Status.file_name(&stem),
            info_name: FileKind::Info.file_name(&stem),
            stem,
            poll_interval: DEFAULT_POLL_INTERVAL,
            policy: ContinuationPolicy::default(),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_policy(mut self, policy: ContinuationPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// The only state that changes between poll iterations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollState {
    /// Sequence written into the next status record
    pub sequence: SequenceCounter,
    /// Completed poll iterations
    pub iterations: u64,
    /// Failed cycles since the last clean one
    pub consecutive_errors: u32,
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
