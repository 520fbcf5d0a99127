// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! lcxd: serves line configuration files to stations and polls each
//! announcing station until it reports completion.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod env;
pub mod lifecycle;
pub mod listener;
pub mod logging;
pub mod sessions;

pub use config::{load_line_config, parse_line_config, ConfigError, DEFAULT_LINES};
pub use lifecycle::{startup, Config, Daemon, LifecycleError, StartupResult};
pub use listener::{build_router, Listener};
pub use sessions::{run_until_cancelled, SessionReport, SessionSettings, Sessions};
