// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line list configuration file (TOML).
//!
//! ```toml
//! schema_tag = 59
//!
//! [[line]]
//! name = "Line001"
//! serial = "Serial001"
//!
//! [[line.part]]
//! number = "PartA"
//! assembly = "AssemblyA"
//! description = "Part Description A"
//! ```

use std::path::Path;

use lcx_core::{LineConfigRecord, LineEntry, PartEntry, RecordError, SchemaTag};
use serde::Deserialize;
use thiserror::Error;

/// Built-in line list, used when no file is configured.
pub const DEFAULT_LINES: &str = include_str!("default_lines.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {origin}: {source}")]
    Read {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid line list in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("line list in {origin} out of range: {source}")]
    Record {
        origin: String,
        #[source]
        source: RecordError,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LineListFile {
    #[serde(default = "default_schema_tag")]
    schema_tag: u16,
    #[serde(default, rename = "line")]
    lines: Vec<LineTable>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LineTable {
    name: String,
    serial: String,
    #[serde(default, rename = "part")]
    parts: Vec<PartTable>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartTable {
    number: String,
    assembly: String,
    #[serde(default)]
    description: String,
}

fn default_schema_tag() -> u16 {
    SchemaTag::LINE_CONFIG.0
}

impl LineListFile {
    fn into_record(self) -> Result<LineConfigRecord, RecordError> {
        let lines = self
            .lines
            .into_iter()
            .map(|line| {
                let parts = line
                    .parts
                    .into_iter()
                    .map(|p| PartEntry::new(p.number, p.assembly, p.description))
                    .collect::<Result<Vec<_>, _>>()?;
                LineEntry::with_parts(line.name, line.serial, parts)
            })
            .collect::<Result<Vec<_>, _>>()?;
        LineConfigRecord::new(SchemaTag(self.schema_tag), lines)
    }
}

/// Parse a line list. `origin` names the source in errors.
pub fn parse_line_config(text: &str, origin: &str) -> Result<LineConfigRecord, ConfigError> {
    let file: LineListFile = toml::from_str(text)
        .map_err(|source| ConfigError::Parse { origin: origin.to_string(), source })?;
    file.into_record().map_err(|source| ConfigError::Record { origin: origin.to_string(), source })
}

/// Load the line list from `path`, or the built-in list when `None`.
pub fn load_line_config(path: Option<&Path>) -> Result<LineConfigRecord, ConfigError> {
    let Some(path) = path else {
        return parse_line_config(DEFAULT_LINES, "built-in line list");
    };
    let origin = path.display().to_string();
    let text = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { origin: origin.clone(), source })?;
    parse_line_config(&text, &origin)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
