// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Semantic views of the 16-bit protocol version slot.
//!
//! Every file carries one `protocol_version` field. Depending on the file
//! kind it holds a schema tag (full list), a rolling sequence (status), or a
//! status code (info). Each meaning gets its own type here; they only meet
//! at the wire boundary.

use std::fmt;

/// Schema revision tag of a full line configuration list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaTag(pub u16);

impl SchemaTag {
    /// Schema revision written for line configuration lists.
    pub const LINE_CONFIG: SchemaTag = SchemaTag(59);
}

impl Default for SchemaTag {
    fn default() -> Self {
        Self::LINE_CONFIG
    }
}

/// 4-bit rolling counter embedded in successive status records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SequenceCounter(u8);

impl SequenceCounter {
    /// Counter values wrap at this modulus (0..=15).
    pub const MODULUS: u8 = 16;
    /// Wire version of a status record with sequence 0.
    pub const BASE_VERSION: u16 = 60;

    /// Returns `None` when `value` is outside 0..16.
    pub fn new(value: u8) -> Option<Self> {
        (value < Self::MODULUS).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// The following counter value, wrapping 15 -> 0.
    #[must_use]
    pub fn next(self) -> Self {
        Self((self.0 + 1) % Self::MODULUS)
    }

    pub fn protocol_version(self) -> u16 {
        Self::BASE_VERSION + u16::from(self.0)
    }

    /// Inverse of [`protocol_version`](Self::protocol_version).
    pub fn from_protocol_version(version: u16) -> Option<Self> {
        let offset = version.checked_sub(Self::BASE_VERSION)?;
        u8::try_from(offset).ok().and_then(Self::new)
    }
}

impl fmt::Display for SequenceCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status code reported by the remote in an info/ack file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// The remote has finished; polling stops.
    pub const COMPLETE: StatusCode = StatusCode(3);
    /// Written into a freshly served info file before the remote reports.
    pub const ACCEPTED: StatusCode = StatusCode(59);

    pub fn is_terminal(self) -> bool {
        self == Self::COMPLETE
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

#[cfg(test)]
#[path = "tag_tests.rs"]
mod tests;
