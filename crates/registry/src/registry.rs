// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Full-file-rewrite worker registry.
//!
//! Every mutation reads the whole `workers.json`, applies the change, and
//! rewrites the whole file. Every read re-parses from disk: there is no
//! in-memory cache, matching the durability property the spec requires
//! (§8 "two independent processes agree after each mutation").

use genie_core::{RunState, Worker};
use genie_storage::{load_json, save_json, GenieLayout, StorageError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("worker id must not be empty or contain ':': {0:?}")]
    InvalidWorkerId(String),
    #[error("worker not found: {0}")]
    NotFound(String),
    #[error("pane index {index} out of range for worker {worker_id} ({count} panes)")]
    PaneIndexOutOfRange {
        worker_id: String,
        index: usize,
        count: usize,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    workers: HashMap<String, Worker>,
}

/// Durable, full-file-rewrite store of [`Worker`] records under
/// `<repo>/.genie/workers.json`.
pub struct WorkerRegistry {
    layout: GenieLayout,
}

impl WorkerRegistry {
    pub fn new(layout: GenieLayout) -> Self {
        Self { layout }
    }

    fn read(&self) -> Result<RegistryFile, RegistryError> {
        Ok(load_json(&self.layout.workers_file())?.unwrap_or_default())
    }

    fn write(&self, file: &RegistryFile) -> Result<(), RegistryError> {
        save_json(&self.layout.workers_file(), file)?;
        Ok(())
    }

    pub fn register(&self, worker: Worker) -> Result<(), RegistryError> {
        if !genie_core::is_valid_worker_id(worker.id.as_str()) {
            return Err(RegistryError::InvalidWorkerId(worker.id.as_str().to_string()));
        }
        let mut file = self.read()?;
        file.workers.insert(worker.id.as_str().to_string(), worker);
        self.write(&file)
    }

    pub fn unregister(&self, id: &str) -> Result<Option<Worker>, RegistryError> {
        let mut file = self.read()?;
        let removed = file.workers.remove(id);
        if removed.is_some() {
            self.write(&file)?;
        }
        Ok(removed)
    }

    pub fn get(&self, id: &str) -> Result<Option<Worker>, RegistryError> {
        Ok(self.read()?.workers.remove(id))
    }

    pub fn list(&self) -> Result<Vec<Worker>, RegistryError> {
        let mut workers: Vec<Worker> = self.read()?.workers.into_values().collect();
        workers.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Ok(workers)
    }

    fn mutate(
        &self,
        id: &str,
        f: impl FnOnce(&mut Worker),
    ) -> Result<Worker, RegistryError> {
        let mut file = self.read()?;
        let worker = file
            .workers
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        f(worker);
        let updated = worker.clone();
        self.write(&file)?;
        Ok(updated)
    }

    pub fn update_state(&self, id: &str, state: RunState, now_ms: u64) -> Result<Worker, RegistryError> {
        self.mutate(id, |w| {
            w.state = state;
            w.last_state_change_ms = now_ms;
        })
    }

    pub fn update(&self, id: &str, f: impl FnOnce(&mut Worker)) -> Result<Worker, RegistryError> {
        self.mutate(id, f)
    }

    pub fn find_by_pane(&self, pane_id: &str) -> Result<Option<Worker>, RegistryError> {
        Ok(self
            .read()?
            .workers
            .into_values()
            .find(|w| w.pane_id == pane_id || w.sub_panes.iter().any(|p| p == pane_id)))
    }

    pub fn find_by_window(&self, window_id: &str) -> Result<Option<Worker>, RegistryError> {
        Ok(self
            .read()?
            .workers
            .into_values()
            .find(|w| w.window_id.as_deref() == Some(window_id)))
    }

    pub fn find_by_task(&self, task_id: &str) -> Result<Option<Worker>, RegistryError> {
        Ok(self
            .read()?
            .workers
            .into_values()
            .find(|w| w.task_id.as_deref() == Some(task_id)))
    }

    pub fn find_all_by_task(&self, task_id: &str) -> Result<Vec<Worker>, RegistryError> {
        Ok(self
            .read()?
            .workers
            .into_values()
            .filter(|w| w.task_id.as_deref() == Some(task_id))
            .collect())
    }

    pub fn find_by_wish(&self, wish_slug: &str) -> Result<Vec<Worker>, RegistryError> {
        Ok(self
            .read()?
            .workers
            .into_values()
            .filter(|w| w.wish_slug.as_deref() == Some(wish_slug))
            .collect())
    }

    pub fn find_by_team(&self, team: &str) -> Result<Vec<Worker>, RegistryError> {
        Ok(self
            .read()?
            .workers
            .into_values()
            .filter(|w| w.team == team)
            .collect())
    }

    pub fn find_by_provider(&self, provider: genie_core::Provider) -> Result<Vec<Worker>, RegistryError> {
        Ok(self
            .read()?
            .workers
            .into_values()
            .filter(|w| w.provider == provider)
            .collect())
    }

    pub fn find_by_session_id(&self, session_id: &str) -> Result<Option<Worker>, RegistryError> {
        Ok(self
            .read()?
            .workers
            .into_values()
            .find(|w| w.external_session_id.as_deref() == Some(session_id)))
    }

    pub fn count_by_task(&self, task_id: &str) -> Result<usize, RegistryError> {
        Ok(self.find_all_by_task(task_id)?.len())
    }

    /// Custom name verbatim; otherwise `taskId` if unused, else
    /// `<taskId>-N` for the smallest unused `N >= existingCount + 1`.
    pub fn generate_worker_id(
        &self,
        task_id: &str,
        custom_name: Option<&str>,
    ) -> Result<String, RegistryError> {
        if let Some(name) = custom_name {
            return Ok(name.to_string());
        }
        let existing = self.find_all_by_task(task_id)?;
        if existing.is_empty() {
            return Ok(task_id.to_string());
        }
        let used: std::collections::HashSet<String> =
            existing.iter().map(|w| w.id.as_str().to_string()).collect();
        let mut n = existing.len() as u64 + 1;
        loop {
            let candidate = format!("{task_id}-{n}");
            if !used.contains(&candidate) {
                return Ok(candidate);
            }
            n += 1;
        }
    }

    pub fn add_sub_pane(&self, id: &str, pane_id: impl Into<String>) -> Result<Worker, RegistryError> {
        let pane_id = pane_id.into();
        self.mutate(id, |w| w.sub_panes.push(pane_id))
    }

    pub fn remove_sub_pane(&self, id: &str, pane_id: &str) -> Result<Worker, RegistryError> {
        let pane_id = pane_id.to_string();
        self.mutate(id, |w| w.sub_panes.retain(|p| p != &pane_id))
    }

    pub fn get_pane(&self, id: &str, index: usize) -> Result<Option<String>, RegistryError> {
        let worker = self.get(id)?.ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        Ok(worker.pane_at(index).map(str::to_string))
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
