// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status poll controller.
//!
//! Pushes the full line list once, then repeatedly pushes a status record and
//! reads back the station's info file until it reports completion. Failures
//! inside a cycle are logged and polling continues; only the configured
//! [`ContinuationPolicy`] bounds can end a session early.

use std::time::{Duration, Instant};

use lcx_adapters::{ExchangeClient, TransferError};
use lcx_core::{Clock, InfoRecord, LineConfigRecord, StatusCode, StatusRecord};
use lcx_storage::{FileStore, StoreError};
use lcx_wire::Record;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::session::{ContinuationPolicy, PollState, SessionConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    Idle,
    AwaitingInitialUpload,
    Polling,
    Done,
}

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The station reported completion
    Done,
    /// `max_consecutive_errors` reached
    Escalated,
    /// `max_iterations` reached
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    pub outcome: PollOutcome,
    pub iterations: u64,
    pub uploads_attempted: u64,
    pub uploads_failed: u64,
    /// Status of the last info file that decoded
    pub last_status: Option<StatusCode>,
    /// Time from the initial upload to the outcome
    pub elapsed: Duration,
}

/// A failed step inside one cycle. Logged, never returned from [`PollController::run`].
#[derive(Debug, Error)]
pub enum PollError {
    #[error("store: {0}")]
    Store(#[from] StoreError),

    #[error("transfer: {0}")]
    Transfer(#[from] TransferError),
}

pub struct PollController<C, K> {
    config: SessionConfig,
    line_config: LineConfigRecord,
    client: C,
    clock: K,
    store: FileStore,
    phase: PollPhase,
    state: PollState,
    uploads_attempted: u64,
    uploads_failed: u64,
    last_status: Option<StatusCode>,
    started: Option<Instant>,
}

impl<C: ExchangeClient, K: Clock> PollController<C, K> {
    pub fn new(config: SessionConfig, line_config: LineConfigRecord, client: C, clock: K) -> Self {
        let store = FileStore::new(&config.directory);
        Self {
            config,
            line_config,
            client,
            clock,
            store,
            phase: PollPhase::Idle,
            state: PollState::default(),
            uploads_attempted: 0,
            uploads_failed: 0,
            last_status: None,
            started: None,
        }
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Drive the session to an outcome.
    pub async fn run(&mut self) -> PollReport {
        if self.phase == PollPhase::Idle {
            self.start().await;
        }
        loop {
            if let Some(outcome) = self.poll_once().await {
                return self.report(outcome);
            }
        }
    }

    /// Push the full list. Its outcome does not gate polling.
    pub async fn start(&mut self) {
        self.phase = PollPhase::AwaitingInitialUpload;
        self.started = Some(self.clock.now());
        let name = self.config.full_list_name.clone();
        let record = self.line_config.clone();
        match self.push(&name, &record).await {
            Ok(()) => info!(station = %self.config.stem, name, "initial list uploaded"),
            Err(e) => warn!(station = %self.config.stem, name, error = %e, "initial upload failed"),
        }
        self.phase = PollPhase::Polling;
    }

    /// One poll iteration. Returns the outcome once the session should stop;
    /// otherwise advances the sequence and waits out the poll interval.
    pub async fn poll_once(&mut self) -> Option<PollOutcome> {
        self.state.iterations += 1;
        let sequence = self.state.sequence;
        let station = self.config.stem.clone();

        let name = self.config.status_name.clone();
        let pushed = self.push(&name, &StatusRecord::probe(sequence)).await;
        if let Err(e) = &pushed {
            warn!(%station, %sequence, error = %e, "status upload failed");
        }

        let read = match self.store.parse::<InfoRecord>(&self.config.info_name) {
            Ok(info) => {
                self.last_status = Some(info.status);
                if info.is_terminal() {
                    let iterations = self.state.iterations;
                    info!(%station, %sequence, iterations, "station reported completion");
                    self.phase = PollPhase::Done;
                    return Some(PollOutcome::Done);
                }
                debug!(%station, %sequence, status = %info.status, "not yet complete");
                true
            }
            // The station has not replied yet
            Err(StoreError::NotFound { .. }) => true,
            Err(e) => {
                warn!(%station, %sequence, error = %e, "info file unreadable");
                false
            }
        };

        if pushed.is_ok() && read {
            self.state.consecutive_errors = 0;
        } else {
            self.state.consecutive_errors = self.state.consecutive_errors.saturating_add(1);
        }

        let policy: ContinuationPolicy = self.config.policy;
        if policy.escalates(self.state.consecutive_errors) {
            warn!(%station, errors = self.state.consecutive_errors, "too many consecutive failures");
            return Some(PollOutcome::Escalated);
        }
        if policy.exhausted(self.state.iterations) {
            warn!(%station, iterations = self.state.iterations, "iteration limit reached");
            return Some(PollOutcome::Exhausted);
        }

        self.state.sequence = sequence.next();
        self.clock.sleep(self.config.poll_interval).await;
        None
    }

    /// Generate `record` as `name` and upload it.
    async fn push<R: Record>(&mut self, name: &str, record: &R) -> Result<(), PollError> {
        self.store.generate(name, record)?;
        self.uploads_attempted += 1;
        let result = self.client.upload(name).await;
        if result.is_err() {
            self.uploads_failed += 1;
        }
        Ok(result?)
    }

    fn report(&self, outcome: PollOutcome) -> PollReport {
        PollReport {
            outcome,
            iterations: self.state.iterations,
            uploads_attempted: self.uploads_attempted,
            uploads_failed: self.uploads_failed,
            last_status: self.last_status,
            elapsed: self
                .started
                .map(|t| self.clock.now().saturating_duration_since(t))
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
