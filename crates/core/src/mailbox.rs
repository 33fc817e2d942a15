// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mailbox message identity.

use serde::{Deserialize, Serialize};

/// Literal sender id used for human-operator-originated messages.
pub const OPERATOR: &str = "operator";

/// A `msg-<epoch-millis>-<counter>` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(epoch_ms: u64, counter: u64) -> Self {
        Self(format!("msg-{}-{}", epoch_ms, counter))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single durable mailbox entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailboxMessage {
    pub id: MessageId,
    /// Sender id, or the literal `"operator"`.
    pub from: String,
    /// Recipient worker id.
    pub to: String,
    pub body: String,
    pub created_at_ms: u64,
    #[serde(default)]
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at_ms: Option<u64>,
}

impl MailboxMessage {
    pub fn is_pending(&self) -> bool {
        self.delivered_at_ms.is_none()
    }

    /// Mark delivered, respecting the once-set-never-unset invariant: a
    /// message already delivered is left untouched.
    pub fn mark_delivered(&mut self, now_ms: u64) {
        if self.delivered_at_ms.is_none() {
            self.delivered_at_ms = Some(now_ms);
        }
    }

    /// Mark read, respecting the false->true-only invariant.
    pub fn mark_read(&mut self) {
        self.read = true;
    }
}

/// Per-recipient ordered list of messages, as persisted to
/// `mailbox/<worker-id>.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerMailbox {
    pub messages: Vec<MailboxMessage>,
    pub last_updated_ms: u64,
}

#[cfg(test)]
#[path = "mailbox_tests.rs"]
mod tests;
