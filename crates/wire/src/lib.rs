// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binary codec for line configuration files.
//!
//! Wire format (all integers big-endian):
//!
//! ```text
//! file_length       u32   total length including this field
//! protocol_version  u16
//! line_count        u16
//! line entry * line_count:
//!   u8  len + line name + NUL
//!   u8  len + serial number + NUL
//!   u16 part_count
//!   part entry * part_count:
//!     u8  len + part number + NUL
//!     u8  len + assembly name + NUL
//!     u16 len + description + NUL
//! ```

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod codec;
mod error;
mod frame;

pub use codec::{decode, decode_record, encode, encode_record, HEADER_LEN};
pub use error::{Counted, DecodeError, Field};
pub use frame::{Frame, Record};
