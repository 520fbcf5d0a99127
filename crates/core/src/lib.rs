// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lcx-core: record model shared by every line configuration exchange crate

pub mod clock;
pub mod entry;
pub mod kind;
pub mod record;
pub mod tag;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use entry::{LineEntry, PartEntry, RecordError, TextField, MAX_ENTRIES};
pub use kind::{split_name, FileKind};
pub use record::{InfoRecord, LineConfigRecord, StatusRecord};
pub use tag::{SchemaTag, SequenceCounter, StatusCode};
