// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestration loop: wires the event tailer into C5 (aggregator), C2
//! (registry/resolver), C1 (policy engine), and C3 (mailbox flush) per the
//! data-flow diagram in spec.md §2.

use std::sync::Arc;

use genie_adapters::MultiplexerDriver;
use genie_aggregator::EventAggregator;
use genie_batch::BatchManager;
use genie_core::{EventType, NormalizedEvent, PermissionRequest, RunState, ToolInput};
use genie_mailbox::Mailbox;
use genie_policy::{AutoApproveConfig, PolicyEngine};
use genie_registry::{TargetResolver, WorkerRegistry};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Registry(#[from] genie_registry::RegistryError),
    #[error(transparent)]
    Mailbox(#[from] genie_mailbox::MailboxError),
}

/// Maps a [`NormalizedEvent`]'s type onto the worker-lifecycle state it
/// implies. `genie_aggregator`'s folding table (spec.md §4.5) covers the
/// dashboard projection; this is the analogous mapping for the registry's
/// `Worker.state`, which the wire schema's four event types don't describe
/// directly — `session_end` is the only event that reaches a terminal
/// state (`done`); nothing in the event stream signals `idle`.
fn run_state_for_event(event_type: EventType) -> Option<RunState> {
    match event_type {
        EventType::SessionStart => Some(RunState::Working),
        EventType::ToolCall => Some(RunState::Working),
        EventType::PermissionRequest => Some(RunState::Permission),
        EventType::SessionEnd => Some(RunState::Done),
    }
}

/// Drives one iteration of the C1-C5 data flow for a batch of freshly
/// tailed events.
pub struct Orchestrator<M: MultiplexerDriver> {
    registry: Arc<WorkerRegistry>,
    resolver: TargetResolver<M>,
    mailbox: Mailbox,
    batch_manager: BatchManager,
    aggregator: Mutex<EventAggregator>,
    policy: PolicyEngine<M>,
    multiplexer: Arc<M>,
}

impl<M: MultiplexerDriver> Orchestrator<M> {
    pub fn new(
        registry: Arc<WorkerRegistry>,
        resolver: TargetResolver<M>,
        mailbox: Mailbox,
        batch_manager: BatchManager,
        policy: PolicyEngine<M>,
        multiplexer: Arc<M>,
    ) -> Self {
        Self {
            registry,
            resolver,
            mailbox,
            batch_manager,
            aggregator: Mutex::new(EventAggregator::new()),
            policy,
            multiplexer,
        }
    }

    pub fn policy(&self) -> &PolicyEngine<M> {
        &self.policy
    }

    pub fn aggregator_states(&self) -> Vec<genie_core::WorkerDashboardState> {
        self.aggregator.lock().states()
    }

    /// Fold one event into dashboard state, advance the owning worker's
    /// lifecycle state, evaluate any permission request it carries, and
    /// flush the worker's mailbox if that leaves it idle or done.
    pub async fn handle_event(
        &self,
        event: &NormalizedEvent,
        config: &AutoApproveConfig,
        now_ms: u64,
    ) -> Result<(), OrchestratorError> {
        self.aggregator.lock().fold(event, now_ms);

        let Some(pane_id) = &event.pane_id else {
            return Ok(());
        };

        let worker = self.registry.find_by_pane(pane_id)?;

        if event.event_type == EventType::PermissionRequest {
            self.evaluate_permission_request(event, config, now_ms).await;
        }

        let Some(worker) = worker else {
            return Ok(());
        };

        let new_state = match run_state_for_event(event.event_type) {
            Some(state) => self.registry.update_state(worker.id.as_str(), state, now_ms)?,
            None => worker,
        };

        if matches!(new_state.state, RunState::Idle | RunState::Done) {
            self.flush_mailbox(new_state.id.as_str(), now_ms).await?;
        }

        Ok(())
    }

    async fn evaluate_permission_request(
        &self,
        event: &NormalizedEvent,
        config: &AutoApproveConfig,
        now_ms: u64,
    ) {
        let Some(tool_name) = &event.tool_name else {
            warn!("permission_request event missing toolName");
            return;
        };
        let tool_input = ToolInput::from_raw(tool_name, event.tool_input.as_ref());
        let request = PermissionRequest {
            id: uuid::Uuid::new_v4().to_string(),
            tool_name: tool_name.clone(),
            tool_input,
            pane_id: event.pane_id.clone(),
            wish_id: event.wish_id.clone(),
            session_id: event.session_id.clone(),
            cwd: std::path::PathBuf::from(&event.cwd),
            timestamp: event.timestamp.clone(),
            tool_call_id: event.tool_call_id.clone(),
        };
        let decision = self.policy.evaluate_request(&request, config, now_ms).await;
        debug!(action = ?decision.action, tool = %tool_name, "evaluated permission request");
    }

    /// Flush `worker_id`'s pending mailbox messages and deliver each one
    /// by keying it into the worker's resolved pane.
    async fn flush_mailbox(&self, worker_id: &str, now_ms: u64) -> Result<(), OrchestratorError> {
        let flushed = self.mailbox.flush_pending(worker_id, now_ms)?;
        if flushed.is_empty() {
            return Ok(());
        }
        let target = match self.resolver.resolve(worker_id).await {
            Ok(target) => target,
            Err(error) => {
                warn!(%error, worker_id, "could not resolve pane for mailbox flush");
                return Ok(());
            }
        };
        for message in &flushed {
            if let Err(error) = self
                .multiplexer
                .send_keys(&target.pane_id, &format!("{}\n", message.body))
                .await
            {
                warn!(%error, worker_id, "mailbox delivery failed");
            }
        }
        Ok(())
    }

    /// Recompute every batch's completion status; a worker that reached a
    /// terminal state may have just completed the batch that tracks it.
    pub fn recheck_batches(&self) -> Result<(), genie_batch::BatchError> {
        for batch in self.batch_manager.list_batches()? {
            self.batch_manager.check_completion(batch.id.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
