// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker identity and lifecycle state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

crate::define_id! {
    /// Unique identifier for a worker instance (typically the task id, with
    /// `-2`, `-3` suffixes when multiple workers share a task).
    pub struct WorkerId;
}

/// The external LLM-agent binary driving a worker's pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Claude,
    Codex,
}

/// The multiplexer transport a worker's panes live on.
///
/// Only `tmux` is implemented by the `adapters` crate today; the field is
/// kept on the record so a future transport doesn't require a schema
/// migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Tmux,
}

/// A worker's run state, as reported by the event stream or set directly by
/// lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Spawning,
    Working,
    Idle,
    Permission,
    Question,
    Done,
    Error,
}

impl RunState {
    /// Terminal states don't transition further without a respawn.
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Done | RunState::Error)
    }
}

/// A long-running child agent process bound to a multiplexer pane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    /// Primary pane handle, e.g. `"%17"`.
    pub pane_id: String,
    /// Sub-panes in creation order; index `k` (1-based) maps to `sub_panes[k-1]`.
    #[serde(default)]
    pub sub_panes: Vec<String>,
    pub session_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<String>,
    pub repo_root: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worktree_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wish_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<u32>,
    pub provider: Provider,
    pub transport: Transport,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
    pub state: RunState,
    pub started_at_ms: u64,
    pub last_state_change_ms: u64,
    /// External session id used to resume the agent binary after a restart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_session_id: Option<String>,
}

impl Worker {
    /// Resolve pane handle at `index`: 0 is the primary pane, `k >= 1` is
    /// `sub_panes[k - 1]`. Returns `None` if `index` is out of range.
    pub fn pane_at(&self, index: usize) -> Option<&str> {
        if index == 0 {
            Some(self.pane_id.as_str())
        } else {
            self.sub_panes.get(index - 1).map(String::as_str)
        }
    }

    /// Total number of addressable panes (primary + sub-panes).
    pub fn pane_count(&self) -> usize {
        1 + self.sub_panes.len()
    }
}

/// A worker id must not contain `:` — resolver Level-2a parses `<id>:<n>` by
/// splitting on the first colon, so an id containing one would be ambiguous
/// with that syntax (see spec.md §9 Open Questions). Registration rejects
/// such ids up front instead of trying to disambiguate later.
pub fn is_valid_worker_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(':')
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
