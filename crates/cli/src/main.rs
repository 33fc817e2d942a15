// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! genie - operator commands for inspecting and poking genie-harness state.
//!
//! Unlike a daemon-socket client, every subcommand here reads and writes
//! the same `.genie/` on-disk contracts `genied` does directly — there is
//! no IPC layer, so these commands work even with no daemon running.

mod commands;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use genie_batch::BatchManager;
use genie_mailbox::Mailbox;
use genie_registry::WorkerRegistry;
use genie_storage::GenieLayout;

use commands::{batches, mailbox, policy, workers};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "genie", version, about = "Operator commands for genie-harness")]
struct Cli {
    /// Repo root containing `.genie/` (defaults to the current directory)
    #[arg(short = 'C', long = "repo", global = true, value_name = "DIR")]
    repo_root: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Worker registry inspection
    Workers(workers::WorkersArgs),
    /// Batch lifecycle management
    Batches(batches::BatchesArgs),
    /// Operator mailbox
    Mailbox(mailbox::MailboxArgs),
    /// Offline policy evaluation
    Policy(policy::PolicyArgs),
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let repo_root = match cli.repo_root {
        Some(dir) => std::fs::canonicalize(&dir)
            .map_err(|e| anyhow::anyhow!("cannot resolve '{}': {e}", dir.display()))?,
        None => std::env::current_dir()?,
    };
    let layout = GenieLayout::new(&repo_root);
    let format = cli.output;

    match cli.command {
        Commands::Workers(args) => {
            let registry = WorkerRegistry::new(layout.clone());
            workers::handle(args, &registry, format)
        }
        Commands::Batches(args) => {
            let manager = BatchManager::new(layout.clone());
            batches::handle(args, &manager, now_ms(), format)
        }
        Commands::Mailbox(args) => {
            let registry = Arc::new(WorkerRegistry::new(layout.clone()));
            let mailbox = Mailbox::new(layout.clone(), registry);
            mailbox::handle(args, &mailbox, now_ms(), format)
        }
        Commands::Policy(args) => {
            policy::handle(args, layout.repo_root(), &layout.auto_approve_file(), format).await
        }
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
