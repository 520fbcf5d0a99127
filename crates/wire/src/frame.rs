// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The wire shape shared by all file kinds, and the typed record mapping.

use lcx_core::{
    FileKind, InfoRecord, LineConfigRecord, LineEntry, RecordError, SchemaTag, SequenceCounter,
    StatusCode, StatusRecord, MAX_ENTRIES,
};

use crate::error::DecodeError;

/// Raw file content: the protocol version slot plus ordered line entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    protocol_version: u16,
    lines: Vec<LineEntry>,
}

impl Frame {
    pub fn new(protocol_version: u16, lines: Vec<LineEntry>) -> Result<Self, RecordError> {
        if lines.len() > MAX_ENTRIES {
            return Err(RecordError::TooManyEntries {
                what: "line entries",
                count: lines.len(),
                limit: MAX_ENTRIES,
            });
        }
        Ok(Self { protocol_version, lines })
    }

    // Callers guarantee lines.len() <= MAX_ENTRIES
    pub(crate) fn from_valid(protocol_version: u16, lines: Vec<LineEntry>) -> Self {
        Self { protocol_version, lines }
    }

    pub fn protocol_version(&self) -> u16 {
        self.protocol_version
    }

    pub fn lines(&self) -> &[LineEntry] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<LineEntry> {
        self.lines
    }
}

/// A typed file kind mapped onto the shared [`Frame`].
pub trait Record: Sized {
    const KIND: FileKind;

    fn to_frame(&self) -> Frame;

    fn from_frame(frame: Frame) -> Result<Self, DecodeError>;
}

impl Record for LineConfigRecord {
    const KIND: FileKind = FileKind::FullList;

    fn to_frame(&self) -> Frame {
        Frame::from_valid(self.schema_tag.0, self.lines().to_vec())
    }

    fn from_frame(frame: Frame) -> Result<Self, DecodeError> {
        let tag = SchemaTag(frame.protocol_version);
        Ok(LineConfigRecord::new(tag, frame.into_lines())?)
    }
}

impl Record for StatusRecord {
    const KIND: FileKind = FileKind::Status;

    fn to_frame(&self) -> Frame {
        Frame::from_valid(self.sequence.protocol_version(), vec![self.line.clone()])
    }

    fn from_frame(frame: Frame) -> Result<Self, DecodeError> {
        let version = frame.protocol_version;
        let sequence = SequenceCounter::from_protocol_version(version)
            .ok_or(DecodeError::UnexpectedVersion { kind: Self::KIND, version })?;

        let mut lines = frame.into_lines();
        if lines.len() != 1 {
            return Err(DecodeError::UnexpectedShape {
                kind: Self::KIND,
                expected: 1,
                found: lines.len(),
            });
        }
        let line = lines.remove(0);
        Ok(StatusRecord::new(sequence, line))
    }
}

impl Record for InfoRecord {
    const KIND: FileKind = FileKind::Info;

    fn to_frame(&self) -> Frame {
        Frame::from_valid(self.status.0, self.lines().to_vec())
    }

    fn from_frame(frame: Frame) -> Result<Self, DecodeError> {
        let status = StatusCode(frame.protocol_version);
        Ok(InfoRecord::new(status, frame.into_lines())?)
    }
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
