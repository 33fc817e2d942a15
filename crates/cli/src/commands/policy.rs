// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Offline policy evaluation against the on-disk auto-approve config.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};
use genie_core::ToolInput;
use genie_policy::{config, decide};

use crate::output::OutputFormat;

#[derive(Args)]
pub struct PolicyArgs {
    #[command(subcommand)]
    pub command: PolicyCommand,
}

#[derive(Subcommand)]
pub enum PolicyCommand {
    /// Evaluate a tool call against the merged auto-approve config
    Test {
        /// Tool name, e.g. `Bash` or `Read`
        tool_name: String,
        /// For `Bash`, the command string; for `Read`, the path
        #[arg(long)]
        input: Option<String>,
    },
}

pub async fn handle(
    args: PolicyArgs,
    repo_root: &Path,
    repo_local_path: &Path,
    format: OutputFormat,
) -> Result<()> {
    match args.command {
        PolicyCommand::Test { tool_name, input } => {
            test(&tool_name, input.as_deref(), repo_root, repo_local_path, format).await
        }
    }
}

async fn test(
    tool_name: &str,
    input: Option<&str>,
    repo_root: &Path,
    repo_local_path: &Path,
    format: OutputFormat,
) -> Result<()> {
    let global_path: PathBuf = config::default_global_config_path();
    let config = config::load_layered(&global_path, repo_root, repo_local_path, None);

    let raw_input = input.map(|value| match tool_name {
        "Bash" => serde_json::json!({ "command": value }),
        "Read" => serde_json::json!({ "path": value }),
        _ => serde_json::json!({ "value": value }),
    });
    let tool_input = raw_input
        .as_ref()
        .and_then(|raw| ToolInput::from_raw(tool_name, Some(raw)));

    let decision = decide(tool_name, tool_input.as_ref(), &config).await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&decision)?),
        OutputFormat::Text => println!("{:?}: {}", decision.action, decision.reason),
    }
    Ok(())
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
