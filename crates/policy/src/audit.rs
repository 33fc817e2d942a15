// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only audit log (`auto-approve-audit.jsonl`, spec.md §3, §6). One
//! JSONL record per evaluated request; never truncated or rewritten, since
//! the engine's delivery contract depends on appends never losing prior
//! entries.

use genie_core::AuditEntry;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("failed to open audit log at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write audit entry at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize audit entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Append one [`AuditEntry`] to `path` as a single JSONL line.
pub fn append_entry(path: &Path, entry: &AuditEntry) -> Result<(), AuditError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| AuditError::Open {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| AuditError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let line = serde_json::to_string(entry)?;
    writeln!(file, "{line}").map_err(|source| AuditError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    file.sync_all().map_err(|source| AuditError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
#[path = "audit_tests.rs"]
mod tests;
