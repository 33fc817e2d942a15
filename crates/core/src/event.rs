// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The wire schema agents append to `events/<pane>.jsonl`.

use serde::{Deserialize, Serialize};

/// The kind of lifecycle or tool-use event an agent emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SessionStart,
    SessionEnd,
    ToolCall,
    PermissionRequest,
}

/// One line of a pane's `events/<pane>.jsonl` file.
///
/// Every field but `type`, `timestamp`, `sessionId`, and `cwd` is optional;
/// the aggregator and policy engine each read only the subset they need and
/// must not fail on a record missing the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub timestamp: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub cwd: String,
    #[serde(rename = "paneId", default, skip_serializing_if = "Option::is_none")]
    pub pane_id: Option<String>,
    #[serde(rename = "wishId", default, skip_serializing_if = "Option::is_none")]
    pub wish_id: Option<String>,
    #[serde(rename = "toolName", default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(rename = "toolInput", default, skip_serializing_if = "Option::is_none")]
    pub tool_input: Option<serde_json::Value>,
    #[serde(rename = "toolCallId", default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(rename = "exitReason", default, skip_serializing_if = "Option::is_none")]
    pub exit_reason: Option<String>,
}

impl NormalizedEvent {
    /// Parse a single JSONL line. Blank lines (trailing newline, partial
    /// writes) are the caller's concern, not this parser's.
    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
