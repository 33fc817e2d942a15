// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Whole-file JSON persistence: every write replaces the entire file via a
//! temp-then-rename swap, and every read re-parses from disk. There is no
//! in-memory cache anywhere in this crate — callers that want caching own
//! that decision themselves.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON at {path}: {source}")]
    Json {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn io_err(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn json_err(path: &Path, source: serde_json::Error) -> StorageError {
    StorageError::Json {
        path: path.to_path_buf(),
        source,
    }
}

/// Write `value` to `path` atomically: serialize to `path.tmp`, `sync_all`,
/// then rename over the destination. Creates parent directories as needed.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let tmp_path = path.with_extension("tmp");
    {
        let file = File::create(&tmp_path).map_err(|e| io_err(&tmp_path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value).map_err(|e| json_err(path, e))?;
        let file = writer
            .into_inner()
            .map_err(|e| io_err(&tmp_path, e.into_error()))?;
        file.sync_all().map_err(|e| io_err(&tmp_path, e))?;
    }
    fs::rename(&tmp_path, path).map_err(|e| io_err(path, e))?;
    Ok(())
}

/// Read and parse `path`. Returns `Ok(None)` if it does not exist.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    match File::open(path) {
        Ok(file) => {
            let reader = BufReader::new(file);
            serde_json::from_reader(reader)
                .map(Some)
                .map_err(|e| json_err(path, e))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_err(path, e)),
    }
}

/// Read and parse `path`, treating a missing *or malformed* file as
/// `Ok(None)` rather than an error. Used where the spec calls for
/// skip-not-raise semantics (e.g. batch file listing).
pub fn load_json_lenient<T: DeserializeOwned>(path: &Path) -> Option<T> {
    match load_json(path) {
        Ok(value) => value,
        Err(StorageError::Json { path, source }) => {
            warn!(path = %path.display(), error = %source, "skipping malformed file");
            None
        }
        Err(StorageError::Io { path, source }) => {
            warn!(path = %path.display(), error = %source, "skipping unreadable file");
            None
        }
    }
}

#[cfg(test)]
#[path = "atomic_tests.rs"]
mod tests;
