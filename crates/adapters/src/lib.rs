// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapters for moving files between the controller and a remote station

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod exchange;
pub mod tftp;

pub use exchange::{ExchangeClient, ExchangeServer, TransferError};
pub use tftp::{TftpClient, TftpServer, TransferConfig};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use exchange::{FakeExchangeClient, FakeExchangeServer};
