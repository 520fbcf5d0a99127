// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line and part entries, the payload carried by every file kind.
//!
//! Text lengths and child counts are derived from the owned values, so the
//! redundant length/count fields of the file format can never disagree with
//! an in-memory entry. Constructors enforce the field widths of the format.

use std::fmt;

use thiserror::Error;

/// Maximum number of line entries per file, or part entries per line.
pub const MAX_ENTRIES: usize = u16::MAX as usize;

/// The text fields of a line or part entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    LineName,
    SerialNumber,
    PartNumber,
    AssemblyName,
    Description,
}

impl TextField {
    /// Largest byte length the field can carry on the wire.
    pub fn max_len(self) -> usize {
        match self {
            TextField::Description => u16::MAX as usize,
            _ => u8::MAX as usize,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextField::LineName => "line name",
            TextField::SerialNumber => "serial number",
            TextField::PartNumber => "part number",
            TextField::AssemblyName => "assembly name",
            TextField::Description => "description",
        }
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from constructing entries or records that the file format cannot hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("{field} is {len} bytes, limit is {limit}")]
    TooLong { field: TextField, len: usize, limit: usize },

    #[error("{field} contains a NUL byte")]
    InteriorNul { field: TextField },

    #[error("too many {what}: {count} exceeds {limit}")]
    TooManyEntries { what: &'static str, count: usize, limit: usize },
}

fn checked_text(field: TextField, value: impl Into<String>) -> Result<String, RecordError> {
    let value = value.into();
    if value.len() > field.max_len() {
        return Err(RecordError::TooLong { field, len: value.len(), limit: field.max_len() });
    }
    if value.as_bytes().contains(&0) {
        return Err(RecordError::InteriorNul { field });
    }
    Ok(value)
}

pub(crate) fn checked_count(what: &'static str, count: usize) -> Result<(), RecordError> {
    if count > MAX_ENTRIES {
        return Err(RecordError::TooManyEntries { what, count, limit: MAX_ENTRIES });
    }
    Ok(())
}

/// One part: number, assembly name and description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartEntry {
    part_number: String,
    assembly_name: String,
    description: String,
}

impl PartEntry {
    pub fn new(
        part_number: impl Into<String>,
        assembly_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, RecordError> {
        Ok(Self {
            part_number: checked_text(TextField::PartNumber, part_number)?,
            assembly_name: checked_text(TextField::AssemblyName, assembly_name)?,
            description: checked_text(TextField::Description, description)?,
        })
    }

    /// Build from values known to satisfy the field limits.
    pub(crate) fn trusted(
        part_number: impl Into<String>,
        assembly_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            part_number: part_number.into(),
            assembly_name: assembly_name.into(),
            description: description.into(),
        }
    }

    pub fn part_number(&self) -> &str {
        &self.part_number
    }

    pub fn assembly_name(&self) -> &str {
        &self.assembly_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// One production line: identity plus its ordered part entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEntry {
    line_name: String,
    serial_number: String,
    parts: Vec<PartEntry>,
}

impl LineEntry {
    /// Create a line with no parts.
    pub fn new(
        line_name: impl Into<String>,
        serial_number: impl Into<String>,
    ) -> Result<Self, RecordError> {
        Self::with_parts(line_name, serial_number, Vec::new())
    }

    pub fn with_parts(
        line_name: impl Into<String>,
        serial_number: impl Into<String>,
        parts: Vec<PartEntry>,
    ) -> Result<Self, RecordError> {
        checked_count("part entries", parts.len())?;
        Ok(Self {
            line_name: checked_text(TextField::LineName, line_name)?,
            serial_number: checked_text(TextField::SerialNumber, serial_number)?,
            parts,
        })
    }

    pub(crate) fn trusted(
        line_name: impl Into<String>,
        serial_number: impl Into<String>,
        parts: Vec<PartEntry>,
    ) -> Self {
        Self { line_name: line_name.into(), serial_number: serial_number.into(), parts }
    }

    pub fn line_name(&self) -> &str {
        &self.line_name
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn parts(&self) -> &[PartEntry] {
        &self.parts
    }

    /// Number of parts; always fits the 16-bit count field.
    pub fn part_count(&self) -> u16 {
        self.parts.len() as u16
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
