// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Batch / lifecycle manager (spec.md §4.4).

use genie_core::{Batch, BatchId, BatchOptions, BatchStatus, BatchSummary};
use genie_storage::{counters, load_json_lenient, save_json, GenieLayout, StorageError};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("batch not found: {0}")]
    NotFound(String),
    #[error("invalid batch id: {0:?}")]
    InvalidId(String),
}

fn check_id(id: &str) -> Result<(), BatchError> {
    if BatchId::is_valid(id) {
        Ok(())
    } else {
        Err(BatchError::InvalidId(id.to_string()))
    }
}

#[allow(clippy::unwrap_used)]
fn batch_filename_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^batch-\d+\.json$").unwrap())
}

/// Result of [`BatchManager::check_completion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionStatus {
    pub complete: bool,
    pub summary: BatchSummary,
}

pub struct BatchManager {
    layout: GenieLayout,
}

impl BatchManager {
    pub fn new(layout: GenieLayout) -> Self {
        Self { layout }
    }

    fn allocate_id(&self) -> Result<BatchId, BatchError> {
        let counter_path = self.layout.batches_counter_file();
        let dir = self.layout.batches_dir();
        let seq = counters::next(&counter_path, || highest_existing_seq(&dir))?;
        Ok(BatchId::from_seq(seq))
    }

    pub fn create_batch(
        &self,
        wish_ids: Vec<String>,
        options: BatchOptions,
        created_at_ms: u64,
    ) -> Result<Batch, BatchError> {
        // Counter is advanced before the batch file is written, per
        // spec.md §4.4: a batch that fails to persist still retires its id.
        let id = self.allocate_id()?;
        let batch = Batch {
            id: id.clone(),
            created_at_ms,
            status: BatchStatus::Active,
            wish_ids,
            worker_states: Default::default(),
            options,
        };
        save_json(&self.layout.batch_file(id.as_str()), &batch)?;
        Ok(batch)
    }

    pub fn get_batch(&self, id: &str) -> Result<Option<Batch>, BatchError> {
        check_id(id)?;
        Ok(load_json_lenient(&self.layout.batch_file(id)))
    }

    /// All batches under `batches/`, skipping malformed or non-matching
    /// files rather than raising.
    pub fn list_batches(&self) -> Result<Vec<Batch>, BatchError> {
        let dir = self.layout.batches_dir();
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(BatchError::Storage(StorageError::Io {
                    path: dir,
                    source: e,
                }))
            }
        };

        let mut batches = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !batch_filename_re().is_match(name) {
                continue;
            }
            if let Some(batch) = load_json_lenient::<Batch>(&entry.path()) {
                batches.push(batch);
            }
        }
        batches.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Ok(batches)
    }

    pub fn update_batch(&self, id: &str, f: impl FnOnce(&mut Batch)) -> Result<Batch, BatchError> {
        let mut batch = self
            .get_batch(id)?
            .ok_or_else(|| BatchError::NotFound(id.to_string()))?;
        f(&mut batch);
        save_json(&self.layout.batch_file(id), &batch)?;
        Ok(batch)
    }

    pub fn delete_batch(&self, id: &str) -> Result<(), BatchError> {
        check_id(id)?;
        let path = self.layout.batch_file(id);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BatchError::Storage(StorageError::Io { path, source: e })),
        }
    }

    /// Fold worker statuses into a summary; flips a newly-complete active
    /// batch's persisted status to `complete`.
    pub fn check_completion(&self, id: &str) -> Result<CompletionStatus, BatchError> {
        let batch = self
            .get_batch(id)?
            .ok_or_else(|| BatchError::NotFound(id.to_string()))?;
        let summary = batch.summarize();
        let complete = batch.is_complete();

        if complete && batch.status == BatchStatus::Active {
            self.update_batch(id, |b| b.status = BatchStatus::Complete)?;
        }

        Ok(CompletionStatus { complete, summary })
    }
}

fn highest_existing_seq(dir: &std::path::Path) -> u64 {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .flatten()
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .filter(|name| batch_filename_re().is_match(name))
        .filter_map(|name| {
            name.strip_prefix("batch-")
                .and_then(|s| s.strip_suffix(".json"))
                .and_then(|n| n.parse::<u64>().ok())
        })
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
