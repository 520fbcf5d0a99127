// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

use lcx_core::{FileKind, RecordError, TextField};
use thiserror::Error;

/// A length-prefixed field of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FileLength,
    Text(TextField),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::FileLength => f.write_str("file length"),
            Field::Text(field) => field.fmt(f),
        }
    }
}

/// What a count field counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counted {
    Lines,
    Parts,
}

impl fmt::Display for Counted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Counted::Lines => f.write_str("line entry"),
            Counted::Parts => f.write_str("part entry"),
        }
    }
}

/// Errors from decoding a file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Fewer bytes than the file declares.
    #[error("truncated file: {declared} bytes declared, {available} available")]
    Truncated { declared: usize, available: usize },

    /// A length field disagrees with the content it describes.
    #[error("{field} length mismatch at offset {offset}: declared {declared}, found {found}")]
    LengthMismatch { field: Field, offset: usize, declared: usize, found: usize },

    /// A count field disagrees with the number of entries present.
    #[error("{what} count {declared} does not match content at offset {offset}")]
    CountMismatch { what: Counted, declared: usize, offset: usize },

    #[error("{field} at offset {offset} is not valid UTF-8")]
    InvalidText { field: TextField, offset: usize },

    #[error("protocol version {version} is not valid for {kind} files")]
    UnexpectedVersion { kind: FileKind, version: u16 },

    #[error("{kind} files carry {expected} line entries, found {found}")]
    UnexpectedShape { kind: FileKind, expected: usize, found: usize },

    #[error("decoded content out of range: {0}")]
    Record(#[from] RecordError),
}
