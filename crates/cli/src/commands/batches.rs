// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch lifecycle commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use genie_batch::BatchManager;
use genie_core::BatchOptions;

use crate::output::OutputFormat;

#[derive(Args)]
pub struct BatchesArgs {
    #[command(subcommand)]
    pub command: BatchesCommand,
}

#[derive(Subcommand)]
pub enum BatchesCommand {
    /// List every batch
    List {},
    /// Show one batch's full record and completion summary
    Show {
        /// Batch id, e.g. `batch-001`
        id: String,
    },
    /// Create a batch from a set of wish ids
    Create {
        /// Wish ids to schedule together
        wish_ids: Vec<String>,
        /// Cap on concurrently running workers
        #[arg(long)]
        max_concurrent: Option<u32>,
        /// Auto-approve tool calls for every worker in the batch
        #[arg(long)]
        auto_approve: bool,
    },
}

pub fn handle(
    args: BatchesArgs,
    manager: &BatchManager,
    now_ms: u64,
    format: OutputFormat,
) -> Result<()> {
    match args.command {
        BatchesCommand::List {} => list(manager, format),
        BatchesCommand::Show { id } => show(manager, &id, format),
        BatchesCommand::Create {
            wish_ids,
            max_concurrent,
            auto_approve,
        } => create(manager, wish_ids, max_concurrent, auto_approve, now_ms, format),
    }
}

fn list(manager: &BatchManager, format: OutputFormat) -> Result<()> {
    let batches = manager.list_batches()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&batches)?),
        OutputFormat::Text => {
            if batches.is_empty() {
                println!("no batches");
                return Ok(());
            }
            for batch in &batches {
                let summary = batch.summarize();
                println!(
                    "{:<14} {:<10?} {}/{} complete",
                    batch.id.as_str(),
                    batch.status,
                    summary.complete,
                    summary.total
                );
            }
        }
    }
    Ok(())
}

fn show(manager: &BatchManager, id: &str, format: OutputFormat) -> Result<()> {
    let Some(batch) = manager.get_batch(id)? else {
        eprintln!("batch not found: {id}");
        std::process::exit(1);
    };
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&batch)?),
        OutputFormat::Text => {
            let summary = batch.summarize();
            println!("Batch: {}", batch.id.as_str());
            println!("  Status: {:?}", batch.status);
            println!("  Wishes: {}", batch.wish_ids.join(", "));
            println!(
                "  Summary: {} running, {} complete, {} failed, {} queued, {} waiting, {} cancelled",
                summary.running,
                summary.complete,
                summary.failed,
                summary.queued,
                summary.waiting,
                summary.cancelled
            );
        }
    }
    Ok(())
}

fn create(
    manager: &BatchManager,
    wish_ids: Vec<String>,
    max_concurrent: Option<u32>,
    auto_approve: bool,
    now_ms: u64,
    format: OutputFormat,
) -> Result<()> {
    let options = BatchOptions {
        max_concurrent,
        auto_approve: auto_approve.then_some(true),
        ..Default::default()
    };
    let batch = manager.create_batch(wish_ids, options, now_ms)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&batch)?),
        OutputFormat::Text => println!("created {}", batch.id.as_str()),
    }
    Ok(())
}

#[cfg(test)]
#[path = "batches_tests.rs"]
mod tests;
