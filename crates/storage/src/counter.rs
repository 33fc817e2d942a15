// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Monotonic counter backed by a single text file (`batches/.counter`).
//!
//! The counter is never rolled back: once a sequence number is handed out
//! it stays retired even if the thing it named is later deleted.

use crate::atomic::StorageError;
use std::fs;
use std::path::Path;

/// Read the counter at `path`, increment it, persist the new value, and
/// return the new value. If the file does not exist yet, `fallback_scan`
/// is called once to seed the counter from existing on-disk state (e.g.
/// the highest `batch-NNN.json` already present) before incrementing.
pub fn next(path: &Path, fallback_scan: impl FnOnce() -> u64) -> Result<u64, StorageError> {
    let current = match fs::read_to_string(path) {
        Ok(contents) => contents.trim().parse::<u64>().unwrap_or(0),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => fallback_scan(),
        Err(e) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let next_value = current + 1;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, next_value.to_string()).map_err(|e| StorageError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(next_value)
}

#[cfg(test)]
#[path = "counter_tests.rs"]
mod tests;
