// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Event aggregator (spec.md §4.5): folds a `NormalizedEvent` stream into
//! per-pane dashboard state. Purely in-memory except for the registry
//! fallback when no event file exists for a pane.

use genie_core::{DashboardStatus, EventType, LastEvent, NormalizedEvent, RunState, Worker, WorkerDashboardState};
use std::collections::HashMap;

/// Accumulates [`WorkerDashboardState`] across an event stream. May be
/// rebuilt from scratch at any time; holds no durable state.
#[derive(Default)]
pub struct EventAggregator {
    states: HashMap<String, WorkerDashboardState>,
}

impl EventAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into its pane's state. Events missing `paneId` are
    /// ignored, per spec.md §4.5.
    pub fn fold(&mut self, event: &NormalizedEvent, now_ms: u64) {
        let Some(pane_id) = event.pane_id.clone() else {
            return;
        };

        let state = self
            .states
            .entry(pane_id.clone())
            .or_insert_with(|| WorkerDashboardState::new(pane_id));

        state.status = match event.event_type {
            EventType::SessionStart => DashboardStatus::Running,
            EventType::ToolCall => DashboardStatus::Running,
            EventType::PermissionRequest => DashboardStatus::Waiting,
            EventType::SessionEnd => DashboardStatus::Stopped,
        };

        state.event_count += 1;
        state.last_activity_ms = now_ms;
        state.last_event = Some(LastEvent {
            event_type: event_type_label(event.event_type).to_string(),
            timestamp: event.timestamp.clone(),
            tool_name: event.tool_name.clone(),
            wish_id: event.wish_id.clone(),
        });

        if let Some(wish_id) = &event.wish_id {
            state.wish_id = Some(wish_id.clone());
        }
    }

    pub fn states(&self) -> Vec<WorkerDashboardState> {
        let mut states: Vec<_> = self.states.values().cloned().collect();
        states.sort_by(|a, b| a.pane_id.cmp(&b.pane_id));
        states
    }

    pub fn state_for_pane(&self, pane_id: &str) -> Option<&WorkerDashboardState> {
        self.states.get(pane_id)
    }

    pub fn reset(&mut self) {
        self.states.clear();
    }

    /// Build a dashboard state directly from the registry when a pane has
    /// no event file yet (spec.md §4.5 fallback mode).
    pub fn from_registry_worker(worker: &Worker) -> WorkerDashboardState {
        let status = match worker.state {
            RunState::Working | RunState::Spawning => DashboardStatus::Running,
            RunState::Idle => DashboardStatus::Idle,
            RunState::Permission | RunState::Question => DashboardStatus::Waiting,
            RunState::Done | RunState::Error => DashboardStatus::Stopped,
        };
        WorkerDashboardState {
            pane_id: worker.pane_id.clone(),
            status,
            last_event: None,
            event_count: 0,
            last_activity_ms: worker.last_state_change_ms,
            wish_id: worker.wish_slug.clone(),
        }
    }
}

fn event_type_label(event_type: EventType) -> &'static str {
    match event_type {
        EventType::SessionStart => "session_start",
        EventType::SessionEnd => "session_end",
        EventType::ToolCall => "tool_call",
        EventType::PermissionRequest => "permission_request",
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
