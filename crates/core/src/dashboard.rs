// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-pane state the event aggregator derives from a pane's event stream.

use serde::{Deserialize, Serialize};

/// Folded status for a single pane, per spec.md §4.5's folding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardStatus {
    Running,
    Idle,
    Waiting,
    Stopped,
}

/// The last event folded into a pane's dashboard state, kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastEvent {
    pub event_type: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wish_id: Option<String>,
}

/// Derived, in-memory dashboard state for one pane. May be rebuilt from
/// scratch at any time (the aggregator holds no durable state of its own).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerDashboardState {
    pub pane_id: String,
    pub status: DashboardStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_event: Option<LastEvent>,
    pub event_count: u64,
    pub last_activity_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wish_id: Option<String>,
}

impl WorkerDashboardState {
    pub fn new(pane_id: impl Into<String>) -> Self {
        Self {
            pane_id: pane_id.into(),
            status: DashboardStatus::Idle,
            last_event: None,
            event_count: 0,
            last_activity_ms: 0,
            wish_id: None,
        }
    }
}

#[cfg(test)]
#[path = "dashboard_tests.rs"]
mod tests;
