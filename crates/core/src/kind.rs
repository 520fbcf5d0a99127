// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File kinds, identified by file name suffix.

use std::fmt;

/// The three kinds of file exchanged with a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Full line configuration list (`.LCL`)
    FullList,
    /// Per-iteration status probe (`.LCS`)
    Status,
    /// Info/acknowledgement from the remote (`.LCI`)
    Info,
}

impl FileKind {
    pub const ALL: [FileKind; 3] = [FileKind::FullList, FileKind::Status, FileKind::Info];

    pub fn suffix(self) -> &'static str {
        match self {
            FileKind::FullList => "LCL",
            FileKind::Status => "LCS",
            FileKind::Info => "LCI",
        }
    }

    /// Classify a file name by the text after its last `.` (ASCII case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        split_name(name).map(|(_, kind)| kind)
    }

    /// `<stem>.<SUFFIX>`
    pub fn file_name(self, stem: &str) -> String {
        format!("{}.{}", stem, self.suffix())
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Split a file name into its stem and kind, e.g. `"ST1.LCI"` -> `("ST1", Info)`.
pub fn split_name(name: &str) -> Option<(&str, FileKind)> {
    let (stem, ext) = name.rsplit_once('.')?;
    let kind = FileKind::ALL.into_iter().find(|k| k.suffix().eq_ignore_ascii_case(ext))?;
    Some((stem, kind))
}

#[cfg(test)]
#[path = "kind_tests.rs"]
mod tests;
