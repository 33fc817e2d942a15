// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! genied - the genie-harness orchestration daemon.
//!
//! Tails `events/<pane>.jsonl` for every pane, folds events into dashboard
//! state, evaluates permission requests, advances worker lifecycle state,
//! and flushes idle workers' mailboxes. See spec.md §2 for the data-flow
//! diagram this loop implements.

mod env;
mod orchestrator;
mod tailer;

use std::sync::Arc;

use genie_adapters::TmuxAdapter;
use genie_batch::BatchManager;
use genie_mailbox::Mailbox;
use genie_policy::{config, PolicyEngine};
use genie_registry::{TargetResolver, WorkerRegistry};
use genie_storage::GenieLayout;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::orchestrator::Orchestrator;
use crate::tailer::EventTailer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let repo_root = env::repo_root()?;
    let layout = GenieLayout::new(&repo_root);
    let global_config_path = config::default_global_config_path();

    let multiplexer = Arc::new(TmuxAdapter::new());
    let registry = Arc::new(WorkerRegistry::new(layout.clone()));
    let resolver = TargetResolver::new(registry.clone(), multiplexer.clone()).with_liveness_check(true);
    let mailbox = Mailbox::new(layout.clone(), registry.clone());
    let batch_manager = BatchManager::new(layout.clone());
    let policy = PolicyEngine::new(multiplexer.clone(), layout.root().join("auto-approve-audit.jsonl"));
    policy.start();

    let orchestrator = Orchestrator::new(
        registry,
        resolver,
        mailbox,
        batch_manager,
        policy,
        multiplexer,
    );

    info!(repo = %layout.repo_root().display(), "genied starting");

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut tailer = EventTailer::new();
    let mut tick = tokio::time::interval(env::tail_interval());

    loop {
        tokio::select! {
            _ = tick.tick() => {
                if let Err(error) = run_once(&orchestrator, &mut tailer, &layout, &global_config_path).await {
                    error!(%error, "orchestration tick failed");
                }
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down");
                break;
            }
            _ = sigint.recv() => {
                info!("received SIGINT, shutting down");
                break;
            }
        }
    }

    orchestrator.policy().stop();
    info!("genied stopped");
    Ok(())
}

async fn run_once(
    orchestrator: &Orchestrator<TmuxAdapter>,
    tailer: &mut EventTailer,
    layout: &GenieLayout,
    global_config_path: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let events = tailer.poll(layout)?;
    if events.is_empty() {
        return Ok(());
    }

    let repo_root = layout.repo_root().to_path_buf();
    let repo_local = layout.auto_approve_file();
    let config = config::load_layered(global_config_path, &repo_root, &repo_local, None);

    let now_ms = now_ms();
    for event in &events {
        if let Err(error) = orchestrator.handle_event(event, &config, now_ms).await {
            warn!(%error, "failed to process event");
        }
    }

    if let Err(error) = orchestrator.recheck_batches() {
        warn!(%error, "failed to recheck batch completion");
    }

    Ok(())
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}
