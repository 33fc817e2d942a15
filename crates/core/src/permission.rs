// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Permission requests and the decisions the policy engine renders for them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The per-tool parameter bag an agent supplies with a `tool_call` or
/// `permission_request` event.
///
/// The source represents this as a dynamically-typed mapping; we model it as
/// a tagged variant per tool this crate understands, plus a catch-all so
/// unknown tools still flow through the engine (and fall to `escalate` by
/// default, per spec.md §9 DESIGN NOTES).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "PascalCase")]
pub enum ToolInput {
    Bash { command: String },
    Read { path: String },
    #[serde(untagged)]
    Other(BTreeMap<String, serde_json::Value>),
}

impl ToolInput {
    /// Extract the bash command string, if this is a `Bash` input.
    pub fn bash_command(&self) -> Option<&str> {
        match self {
            ToolInput::Bash { command } => Some(command.as_str()),
            ToolInput::Other(map) => map.get("command").and_then(|v| v.as_str()),
            _ => None,
        }
    }

    /// Build from a raw JSON mapping plus the tool name that accompanied it,
    /// the shape the event stream actually delivers (`toolName` + `toolInput`
    /// as a bare JSON object, not a pre-tagged enum).
    pub fn from_raw(tool_name: &str, raw: Option<&serde_json::Value>) -> Option<Self> {
        let raw = raw?;
        match tool_name {
            "Bash" => raw
                .get("command")
                .and_then(|v| v.as_str())
                .map(|command| ToolInput::Bash {
                    command: command.to_string(),
                }),
            "Read" => raw
                .get("path")
                .and_then(|v| v.as_str())
                .map(|path| ToolInput::Read {
                    path: path.to_string(),
                }),
            _ => raw.as_object().map(|obj| {
                ToolInput::Other(obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            }),
        }
    }
}

/// A `tool_call` or `permission_request` event awaiting a policy decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionRequest {
    /// Synthetic id, unique per evaluated request (not persisted across
    /// restarts).
    pub id: String,
    pub tool_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_input: Option<ToolInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pane_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wish_id: Option<String>,
    pub session_id: String,
    pub cwd: std::path::PathBuf,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

/// Policy verdict for a [`PermissionRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Approve,
    Deny,
    Escalate,
}

/// An immutable policy verdict plus the reason it was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub action: Action,
    pub reason: String,
}

impl Decision {
    pub fn approve(reason: impl Into<String>) -> Self {
        Self {
            action: Action::Approve,
            reason: reason.into(),
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            action: Action::Deny,
            reason: reason.into(),
        }
    }

    pub fn escalate(reason: impl Into<String>) -> Self {
        Self {
            action: Action::Escalate,
            reason: reason.into(),
        }
    }

    pub fn is_approve(&self) -> bool {
        self.action == Action::Approve
    }
}

/// An append-only audit record for one evaluated request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pane_id: Option<String>,
    pub tool_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wish_id: Option<String>,
    pub action: Action,
    pub reason: String,
    /// Extra classification for entries appended alongside a decision
    /// rather than replacing it, e.g. `"delivery_failure"` (spec.md §4.1
    /// delivery contract).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[cfg(test)]
#[path = "permission_tests.rs"]
mod tests;
