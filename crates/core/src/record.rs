// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The three file kinds as typed records.
//!
//! Records are built fresh for each transfer and never mutated after
//! encoding. All three share one wire shape (a version slot plus line
//! entries); see [`crate::tag`] for how the slot is interpreted per kind.

use crate::entry::{checked_count, LineEntry, PartEntry, RecordError};
use crate::tag::{SchemaTag, SequenceCounter, StatusCode};

/// Full line configuration list pushed once at the start of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineConfigRecord {
    pub schema_tag: SchemaTag,
    lines: Vec<LineEntry>,
}

impl LineConfigRecord {
    pub fn new(schema_tag: SchemaTag, lines: Vec<LineEntry>) -> Result<Self, RecordError> {
        checked_count("line entries", lines.len())?;
        Ok(Self { schema_tag, lines })
    }

    #[cfg(any(test, feature = "test-support"))]
    pub(crate) fn trusted(schema_tag: SchemaTag, lines: Vec<LineEntry>) -> Self {
        Self { schema_tag, lines }
    }

    pub fn lines(&self) -> &[LineEntry] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<LineEntry> {
        self.lines
    }
}

/// Periodic status probe; the sequence distinguishes poll iterations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    pub sequence: SequenceCounter,
    pub line: LineEntry,
}

impl StatusRecord {
    pub fn new(sequence: SequenceCounter, line: LineEntry) -> Self {
        Self { sequence, line }
    }

    /// The status payload sent on every poll iteration.
    pub fn probe(sequence: SequenceCounter) -> Self {
        let part = PartEntry::trusted("Status", "Generated", "Status Description");
        Self { sequence, line: LineEntry::trusted("LineStatus", "StatusSerial", vec![part]) }
    }
}

/// Info/ack file written by the remote; its status code governs polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoRecord {
    pub status: StatusCode,
    lines: Vec<LineEntry>,
}

impl InfoRecord {
    pub fn new(status: StatusCode, lines: Vec<LineEntry>) -> Result<Self, RecordError> {
        checked_count("line entries", lines.len())?;
        Ok(Self { status, lines })
    }

    /// An info file carrying only a status code.
    pub fn acknowledgement(status: StatusCode) -> Self {
        Self { status, lines: Vec::new() }
    }

    pub fn lines(&self) -> &[LineEntry] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<LineEntry> {
        self.lines
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
