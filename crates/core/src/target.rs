// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The output of the target resolution chain (spec.md §4.2).

use serde::{Deserialize, Serialize};

/// Which level of the resolution chain produced a [`ResolvedTarget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveMethod {
    Raw,
    Worker,
    #[serde(rename = "session:window")]
    SessionWindow,
    Session,
}

/// A concrete pane handle plus the provenance of how it was found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedTarget {
    pub pane_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pane_index: Option<usize>,
    pub resolved_via: ResolveMethod,
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
