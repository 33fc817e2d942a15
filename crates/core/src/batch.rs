// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch identity and worker sub-state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A `batch-NNN` identifier, NNN a zero-padded monotonic counter.
///
/// Unlike the teacher's `define_id!` newtypes this one validates its shape,
/// since the format is load-bearing for spec.md's id-allocation invariant
/// (`^batch-\d{3,}$`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(String);

impl BatchId {
    /// Build a `batch-NNN` id from a sequence number, zero-padded to at
    /// least 3 digits.
    pub fn from_seq(seq: u64) -> Self {
        Self(format!("batch-{:03}", seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if `s` matches `^batch-\d{3,}$`.
    pub fn is_valid(s: &str) -> bool {
        match s.strip_prefix("batch-") {
            Some(digits) => digits.len() >= 3 && digits.bytes().all(|b| b.is_ascii_digit()),
            None => false,
        }
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-wish worker sub-state within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerSubState {
    Queued,
    Spawning,
    Running,
    Waiting,
    Complete,
    Failed,
    Cancelled,
}

impl WorkerSubState {
    /// `{complete, failed, cancelled}` — a worker in one of these never
    /// progresses further within the batch.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            WorkerSubState::Complete | WorkerSubState::Failed | WorkerSubState::Cancelled
        )
    }
}

/// Overall batch status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Active,
    Complete,
    Cancelled,
}

/// Spawn options shared by every worker in a batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_approve: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<u32>,
}

/// A set of wishes scheduled together with shared spawn options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    pub created_at_ms: u64,
    pub status: BatchStatus,
    pub wish_ids: Vec<String>,
    /// Sub-state per wish id. Wishes without a spawned worker yet may be
    /// absent; `checkBatchCompletion` treats a missing entry the same as
    /// an un-terminal one (it hasn't finished).
    #[serde(default)]
    pub worker_states: HashMap<String, WorkerSubState>,
    #[serde(default)]
    pub options: BatchOptions,
}

/// Folded worker-status counts, as produced by `checkBatchCompletion`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub running: usize,
    pub complete: usize,
    pub failed: usize,
    pub queued: usize,
    pub waiting: usize,
    pub cancelled: usize,
}

impl Batch {
    /// Fold `worker_states` into a [`BatchSummary`], counting `spawning`
    /// under `running` per spec.md §4.4.
    pub fn summarize(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.wish_ids.len(),
            ..Default::default()
        };
        for wish_id in &self.wish_ids {
            match self.worker_states.get(wish_id) {
                Some(WorkerSubState::Running) | Some(WorkerSubState::Spawning) => {
                    summary.running += 1
                }
                Some(WorkerSubState::Complete) => summary.complete += 1,
                Some(WorkerSubState::Failed) => summary.failed += 1,
                Some(WorkerSubState::Cancelled) => summary.cancelled += 1,
                Some(WorkerSubState::Waiting) => summary.waiting += 1,
                Some(WorkerSubState::Queued) | None => summary.queued += 1,
            }
        }
        summary
    }

    /// `true` iff every wish is in a terminal sub-state, or the batch has no
    /// wishes at all (vacuously complete).
    pub fn is_complete(&self) -> bool {
        self.wish_ids.iter().all(|wish_id| {
            self.worker_states
                .get(wish_id)
                .is_some_and(|s| s.is_terminal())
        })
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
