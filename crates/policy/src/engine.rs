// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Policy engine lifecycle and the delivery contract (spec.md §4.1).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use genie_adapters::MultiplexerDriver;
use genie_core::{Action, AuditEntry, Decision, PermissionRequest};
use parking_lot::Mutex;
use regex::Regex;
use tracing::warn;

use crate::audit;
use crate::config::AutoApproveConfig;
use crate::decision;

fn pane_handle_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::unwrap_used)]
    RE.get_or_init(|| Regex::new(r"^%\d+$").unwrap())
}

/// True if `pane_id` matches `^%\d+$` (spec.md §4.1 pane-handle validation).
pub fn is_valid_pane_handle(pane_id: &str) -> bool {
    pane_handle_re().is_match(pane_id)
}

/// Counters reset on every [`PolicyEngine::start`] (spec.md §4.1
/// `getStats`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub approved: u64,
    pub denied: u64,
    pub escalated: u64,
    pub total: u64,
}

/// Evaluates permission requests and delivers approvals via a
/// [`MultiplexerDriver`] (the injected approval-delivery capability is just
/// "send Enter to the pane", per spec.md §4.1).
pub struct PolicyEngine<M: MultiplexerDriver> {
    multiplexer: Arc<M>,
    audit_path: PathBuf,
    running: AtomicBool,
    stats: Mutex<EngineStats>,
}

impl<M: MultiplexerDriver> PolicyEngine<M> {
    pub fn new(multiplexer: Arc<M>, audit_path: impl Into<PathBuf>) -> Self {
        Self {
            multiplexer,
            audit_path: audit_path.into(),
            running: AtomicBool::new(false),
            stats: Mutex::new(EngineStats::default()),
        }
    }

    /// Idempotent; also resets [`EngineStats`].
    pub fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
        *self.stats.lock() = EngineStats::default();
    }

    /// Idempotent. In-flight evaluations still complete; all calls after
    /// this point short-circuit to `escalate`.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> EngineStats {
        *self.stats.lock()
    }

    pub fn audit_path(&self) -> &Path {
        &self.audit_path
    }

    /// Evaluate `request` against `config`, persist an audit entry, and
    /// deliver approvals. `now_ms` is supplied by the caller so evaluation
    /// stays deterministic in tests.
    pub async fn evaluate_request(
        &self,
        request: &PermissionRequest,
        config: &AutoApproveConfig,
        now_ms: u64,
    ) -> Decision {
        if !self.is_running() {
            return Decision::escalate("engine not running");
        }

        let mut decision = decision::decide(&request.tool_name, request.tool_input.as_ref(), config).await;

        if decision.is_approve() {
            if let Some(pane_id) = &request.pane_id {
                if !is_valid_pane_handle(pane_id) {
                    decision = Decision::escalate(format!("invalid pane handle: {pane_id:?}"));
                }
            }
        }

        self.persist_and_deliver(request, decision, now_ms).await
    }

    async fn persist_and_deliver(
        &self,
        request: &PermissionRequest,
        decision: Decision,
        now_ms: u64,
    ) -> Decision {
        let entry = build_entry(request, &decision, now_ms, None);
        let mut decision = decision;

        match audit::append_entry(&self.audit_path, &entry) {
            Ok(()) => {
                if decision.is_approve() {
                    if let Some(pane_id) = &request.pane_id {
                        if let Err(error) = self.multiplexer.send_keys(pane_id, "\n").await {
                            warn!(%error, pane_id, "approval delivery failed");
                            let failure_entry =
                                build_entry(request, &decision, now_ms, Some("delivery_failure"));
                            if let Err(audit_error) = audit::append_entry(&self.audit_path, &failure_entry)
                            {
                                warn!(%audit_error, "failed to record delivery-failure audit entry");
                            }
                        }
                    }
                }
            }
            Err(error) => {
                warn!(%error, "audit append failed");
                if decision.is_approve() {
                    decision = Decision::escalate(
                        "audit log write failed; cannot approve without an audit trail",
                    );
                }
            }
        }

        self.record(decision.action);
        decision
    }

    fn record(&self, action: Action) {
        let mut stats = self.stats.lock();
        stats.total += 1;
        match action {
            Action::Approve => stats.approved += 1,
            Action::Deny => stats.denied += 1,
            Action::Escalate => stats.escalated += 1,
        }
    }
}

fn build_entry(
    request: &PermissionRequest,
    decision: &Decision,
    now_ms: u64,
    category: Option<&str>,
) -> AuditEntry {
    AuditEntry {
        timestamp_ms: now_ms,
        pane_id: request.pane_id.clone(),
        tool_name: request.tool_name.clone(),
        wish_id: request.wish_id.clone(),
        action: decision.action,
        reason: decision.reason.clone(),
        category: category.map(str::to_string),
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
