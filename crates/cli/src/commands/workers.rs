// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker registry inspection commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use genie_registry::WorkerRegistry;

use crate::output::{format_time_ago, OutputFormat};

#[derive(Args)]
pub struct WorkersArgs {
    #[command(subcommand)]
    pub command: WorkersCommand,
}

#[derive(Subcommand)]
pub enum WorkersCommand {
    /// List every registered worker
    List {},
    /// Show one worker's full record
    Show {
        /// Worker id
        id: String,
    },
}

pub fn handle(args: WorkersArgs, registry: &WorkerRegistry, format: OutputFormat) -> Result<()> {
    match args.command {
        WorkersCommand::List {} => list(registry, format),
        WorkersCommand::Show { id } => show(registry, &id, format),
    }
}

fn list(registry: &WorkerRegistry, format: OutputFormat) -> Result<()> {
    let workers = registry.list()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&workers)?),
        OutputFormat::Text => {
            if workers.is_empty() {
                println!("no workers registered");
                return Ok(());
            }
            for worker in &workers {
                println!(
                    "{:<20} {:<10?} {:<6} {}",
                    worker.id.as_str(),
                    worker.state,
                    worker.pane_id,
                    format_time_ago(worker.last_state_change_ms)
                );
            }
        }
    }
    Ok(())
}

fn show(registry: &WorkerRegistry, id: &str, format: OutputFormat) -> Result<()> {
    let Some(worker) = registry.get(id)? else {
        eprintln!("worker not found: {id}");
        std::process::exit(1);
    };
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&worker)?),
        OutputFormat::Text => {
            println!("Worker: {}", worker.id.as_str());
            println!("  State: {:?}", worker.state);
            println!("  Pane: {}", worker.pane_id);
            println!("  Session: {}", worker.session_name);
            println!("  Repo root: {}", worker.repo_root.display());
            if let Some(task_id) = &worker.task_id {
                println!("  Task: {task_id}");
            }
            if let Some(wish_slug) = &worker.wish_slug {
                println!("  Wish: {wish_slug}");
            }
            println!("  Provider: {:?}", worker.provider);
            println!("  Last state change: {}", format_time_ago(worker.last_state_change_ms));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "workers_tests.rs"]
mod tests;
