// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk layout of a repository's `.genie/` directory (spec.md §6).

use std::path::{Path, PathBuf};

/// Resolves paths under `<repo>/.genie/`.
#[derive(Debug, Clone)]
pub struct GenieLayout {
    repo_root: PathBuf,
}

impl GenieLayout {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    pub fn root(&self) -> PathBuf {
        self.repo_root.join(".genie")
    }

    pub fn workers_file(&self) -> PathBuf {
        self.root().join("workers.json")
    }

    pub fn batches_dir(&self) -> PathBuf {
        self.root().join("batches")
    }

    pub fn batch_file(&self, batch_id: &str) -> PathBuf {
        self.batches_dir().join(format!("{batch_id}.json"))
    }

    pub fn batches_counter_file(&self) -> PathBuf {
        self.batches_dir().join(".counter")
    }

    pub fn mailbox_dir(&self) -> PathBuf {
        self.root().join("mailbox")
    }

    pub fn mailbox_file(&self, worker_id: &str) -> PathBuf {
        self.mailbox_dir().join(format!("{worker_id}.json"))
    }

    pub fn events_dir(&self) -> PathBuf {
        self.root().join("events")
    }

    /// `pane_id` carries its literal `%` prefix (e.g. `%17`).
    pub fn event_file(&self, pane_id: &str) -> PathBuf {
        self.events_dir().join(format!("{pane_id}.jsonl"))
    }

    pub fn auto_approve_file(&self) -> PathBuf {
        self.root().join("auto-approve.yaml")
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
