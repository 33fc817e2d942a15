// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operator mailbox commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use genie_mailbox::{Mailbox, SendResult};

use crate::output::OutputFormat;

#[derive(Args)]
pub struct MailboxArgs {
    #[command(subcommand)]
    pub command: MailboxCommand,
}

#[derive(Subcommand)]
pub enum MailboxCommand {
    /// Show a worker's full inbox
    Inbox {
        /// Worker id
        worker_id: String,
    },
    /// Queue a message for a worker
    Send {
        /// Worker id
        worker_id: String,
        /// Message body
        body: String,
    },
    /// Deliver every pending message for an idle/done worker
    Flush {
        /// Worker id
        worker_id: String,
    },
}

pub fn handle(
    args: MailboxArgs,
    mailbox: &Mailbox,
    now_ms: u64,
    format: OutputFormat,
) -> Result<()> {
    match args.command {
        MailboxCommand::Inbox { worker_id } => inbox(mailbox, &worker_id, format),
        MailboxCommand::Send { worker_id, body } => send(mailbox, &worker_id, &body, now_ms, format),
        MailboxCommand::Flush { worker_id } => flush(mailbox, &worker_id, now_ms, format),
    }
}

fn inbox(mailbox: &Mailbox, worker_id: &str, format: OutputFormat) -> Result<()> {
    let messages = mailbox.inbox(worker_id)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&messages)?),
        OutputFormat::Text => {
            if messages.is_empty() {
                println!("no messages for {worker_id}");
                return Ok(());
            }
            for message in &messages {
                let status = if message.delivered_at_ms.is_some() {
                    "delivered"
                } else if message.read {
                    "read"
                } else {
                    "pending"
                };
                println!("{} [{}] {}: {}", message.id, status, message.from, message.body);
            }
        }
    }
    Ok(())
}

fn send(
    mailbox: &Mailbox,
    worker_id: &str,
    body: &str,
    now_ms: u64,
    format: OutputFormat,
) -> Result<()> {
    let result = mailbox.send(genie_core::OPERATOR, worker_id, body, now_ms)?;
    match &result {
        SendResult::Delivered(id) => match format {
            OutputFormat::Json => println!("{{\"id\":\"{id}\"}}"),
            OutputFormat::Text => println!("queued {id}"),
        },
        SendResult::NotDelivered { reason } => match format {
            OutputFormat::Json => println!("{{\"error\":\"{reason}\"}}"),
            OutputFormat::Text => {
                eprintln!("not queued: {reason}");
                std::process::exit(1);
            }
        },
    }
    Ok(())
}

fn flush(mailbox: &Mailbox, worker_id: &str, now_ms: u64, format: OutputFormat) -> Result<()> {
    let flushed = mailbox.flush_pending(worker_id, now_ms)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&flushed)?),
        OutputFormat::Text => {
            println!("flushed {} message(s) for {worker_id}", flushed.len());
            println!(
                "note: delivery to the worker's pane happens in genied — this only marks them delivered"
            );
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "mailbox_tests.rs"]
mod tests;
