// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named files under a single directory.
//!
//! Writes go to a temporary sibling and are renamed into place, so a reader
//! observes either the previous or the new complete content.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use lcx_wire::{decode_record, encode_record, DecodeError, Record};
use thiserror::Error;
use tracing::debug;

/// Errors from store operations, tagged with the file name involved.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{name}: no such file")]
    NotFound { name: String },

    #[error("invalid file name: {name:?}")]
    InvalidName { name: String },

    #[error("{name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: DecodeError,
    },
}

impl StoreError {
    fn io(name: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            StoreError::NotFound { name: name.to_string() }
        } else {
            StoreError::Io { name: name.to_string(), source }
        }
    }
}

/// Reject names that are empty or could escape the store directory.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let escapes = name.is_empty()
        || name == "."
        || name.contains(['/', '\\', '\0'])
        || name.contains("..");
    if escapes {
        return Err(StoreError::InvalidName { name: name.to_string() });
    }
    Ok(())
}

// Distinguishes temporaries of concurrent writers to the same name
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Create or replace `directory/name` with `bytes`.
pub fn write(directory: &Path, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
    validate_name(name)?;
    let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let tmp = directory.join(format!(".{name}.{seq}.tmp"));
    let path = directory.join(name);

    fs::write(&tmp, bytes).map_err(|e| StoreError::io(name, e))?;
    if let Err(e) = fs::rename(&tmp, &path) {
        let _ = fs::remove_file(&tmp);
        return Err(StoreError::io(name, e));
    }
    debug!(name, len = bytes.len(), "wrote file");
    Ok(())
}

/// Read the complete content of `directory/name`.
pub fn read(directory: &Path, name: &str) -> Result<Vec<u8>, StoreError> {
    validate_name(name)?;
    fs::read(directory.join(name)).map_err(|e| StoreError::io(name, e))
}

/// A file store rooted at one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Use `root` as the store without touching the filesystem.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Use `root` as the store, creating it if missing.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| StoreError::io(&root.display().to_string(), e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    pub fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        write(&self.root, name, bytes)
    }

    pub fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        read(&self.root, name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_of(name).map(|path| path.is_file()).unwrap_or(false)
    }

    /// Encode `record` and store it as `name`. Returns the encoded length.
    pub fn generate<R: Record>(&self, name: &str, record: &R) -> Result<usize, StoreError> {
        let bytes = encode_record(record);
        self.write(name, &bytes)?;
        Ok(bytes.len())
    }

    /// Read `name` and decode it as `R`.
    pub fn parse<R: Record>(&self, name: &str) -> Result<R, StoreError> {
        let bytes = self.read(name)?;
        decode_record(&bytes)
            .map_err(|source| StoreError::Decode { name: name.to_string(), source })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
