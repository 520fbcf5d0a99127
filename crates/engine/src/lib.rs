// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Poll controller and request dispatch for line configuration exchange

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod controller;
pub mod dispatch;
pub mod session;

pub use controller::{PollController, PollError, PollOutcome, PollPhase, PollReport};
pub use dispatch::{
    DispatchError, Disposition, FullListHandler, InfoHandler, InboundRequest, RequestHandler,
    Router, SessionLauncher, StatusHandler,
};
pub use session::{ContinuationPolicy, PollState, SessionConfig, DEFAULT_POLL_INTERVAL};
