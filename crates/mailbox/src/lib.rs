// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Mailbox + protocol router (spec.md §4.3).

use genie_core::{MailboxMessage, MessageId, WorkerMailbox};
use genie_registry::WorkerRegistry;
use genie_storage::{load_json, save_json, GenieLayout, StorageError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailboxError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Registry(#[from] genie_registry::RegistryError),
}

/// Outcome of [`Mailbox::send`]. A recipient that cannot be resolved is a
/// normal (non-error) result: the message is simply never written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendResult {
    Delivered(MessageId),
    NotDelivered { reason: String },
}

/// Durable message delivery between the operator and workers.
///
/// Invariant DEC-7: `send` persists to the recipient's mailbox file before
/// returning; this module never talks to the multiplexer itself, only the
/// caller (which holds a resolver + multiplexer) performs pane injection.
pub struct Mailbox {
    layout: GenieLayout,
    registry: Arc<WorkerRegistry>,
    counter: AtomicU64,
}

impl Mailbox {
    pub fn new(layout: GenieLayout, registry: Arc<WorkerRegistry>) -> Self {
        Self {
            layout,
            registry,
            counter: AtomicU64::new(0),
        }
    }

    fn read(&self, worker_id: &str) -> Result<WorkerMailbox, MailboxError> {
        Ok(load_json(&self.layout.mailbox_file(worker_id))?.unwrap_or_default())
    }

    fn write(&self, worker_id: &str, mailbox: &WorkerMailbox) -> Result<(), MailboxError> {
        save_json(&self.layout.mailbox_file(worker_id), mailbox)?;
        Ok(())
    }

    /// Resolve `to` against the registry by exact id, then fall back to a
    /// fuzzy match on role or `team:role`.
    fn resolve_recipient(&self, to: &str) -> Result<Option<String>, MailboxError> {
        if self.registry.get(to)?.is_some() {
            return Ok(Some(to.to_string()));
        }
        for worker in self.registry.list()? {
            if worker.role == to {
                return Ok(Some(worker.id.as_str().to_string()));
            }
            if format!("{}:{}", worker.team, worker.role) == to {
                return Ok(Some(worker.id.as_str().to_string()));
            }
        }
        Ok(None)
    }

    pub fn send(
        &self,
        from: impl Into<String>,
        to: &str,
        body: impl Into<String>,
        now_ms: u64,
    ) -> Result<SendResult, MailboxError> {
        let Some(recipient) = self.resolve_recipient(to)? else {
            return Ok(SendResult::NotDelivered {
                reason: format!("no worker matches recipient {to:?}"),
            });
        };

        let counter = self.counter.fetch_add(1, Ordering::SeqCst);
        let id = MessageId::new(now_ms, counter);
        let message = MailboxMessage {
            id: id.clone(),
            from: from.into(),
            to: recipient.clone(),
            body: body.into(),
            created_at_ms: now_ms,
            read: false,
            delivered_at_ms: None,
        };

        let mut mailbox = self.read(&recipient)?;
        mailbox.messages.push(message);
        mailbox.last_updated_ms = now_ms;
        self.write(&recipient, &mailbox)?;

        Ok(SendResult::Delivered(id))
    }

    pub fn inbox(&self, worker_id: &str) -> Result<Vec<MailboxMessage>, MailboxError> {
        Ok(self.read(worker_id)?.messages)
    }

    pub fn unread(&self, worker_id: &str) -> Result<Vec<MailboxMessage>, MailboxError> {
        Ok(self
            .read(worker_id)?
            .messages
            .into_iter()
            .filter(|m| !m.read)
            .collect())
    }

    pub fn pending(&self, worker_id: &str) -> Result<Vec<MailboxMessage>, MailboxError> {
        Ok(self
            .read(worker_id)?
            .messages
            .into_iter()
            .filter(MailboxMessage::is_pending)
            .collect())
    }

    pub fn mark_read(&self, worker_id: &str, msg_id: &str) -> Result<(), MailboxError> {
        let mut mailbox = self.read(worker_id)?;
        if let Some(msg) = mailbox.messages.iter_mut().find(|m| m.id.as_str() == msg_id) {
            msg.mark_read();
        }
        self.write(worker_id, &mailbox)
    }

    pub fn mark_delivered(&self, worker_id: &str, msg_id: &str, now_ms: u64) -> Result<(), MailboxError> {
        let mut mailbox = self.read(worker_id)?;
        if let Some(msg) = mailbox.messages.iter_mut().find(|m| m.id.as_str() == msg_id) {
            msg.mark_delivered(now_ms);
        }
        self.write(worker_id, &mailbox)
    }

    /// Mark every pending message of `worker_id` delivered. Pane injection
    /// is the caller's responsibility; this only flips the durable state
    /// once the caller confirms delivery.
    pub fn flush_pending(&self, worker_id: &str, now_ms: u64) -> Result<Vec<MailboxMessage>, MailboxError> {
        let mut mailbox = self.read(worker_id)?;
        let mut flushed = Vec::new();
        for msg in mailbox.messages.iter_mut() {
            if msg.is_pending() {
                msg.mark_delivered(now_ms);
                flushed.push(msg.clone());
            }
        }
        mailbox.last_updated_ms = now_ms;
        self.write(worker_id, &mailbox)?;
        Ok(flushed)
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
