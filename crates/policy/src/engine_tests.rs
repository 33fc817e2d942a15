// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use genie_adapters::{FakeMultiplexer, MultiplexerCall};
use std::collections::HashSet;
use tempfile::tempdir;

fn request(tool_name: &str, pane_id: Option<&str>) -> PermissionRequest {
    PermissionRequest {
        id: "req-1".to_string(),
        tool_name: tool_name.to_string(),
        tool_input: None,
        pane_id: pane_id.map(str::to_string),
        wish_id: None,
        session_id: "sess-1".to_string(),
        cwd: std::path::PathBuf::from("/repo"),
        timestamp: "2026-01-01T00:00:00Z".to_string(),
        tool_call_id: None,
    }
}

fn allow(tools: &[&str]) -> AutoApproveConfig {
    AutoApproveConfig {
        allow: tools.iter().map(|s| s.to_string()).collect(),
        deny: HashSet::new(),
        bash_allow_patterns: Vec::new(),
        bash_deny_patterns: Vec::new(),
    }
}

fn engine(audit_path: &Path) -> (Arc<FakeMultiplexer>, PolicyEngine<FakeMultiplexer>) {
    let multiplexer = Arc::new(FakeMultiplexer::new());
    let engine = PolicyEngine::new(multiplexer.clone(), audit_path.to_path_buf());
    (multiplexer, engine)
}

// spec.md §8 S1
#[tokio::test]
async fn s1_approve_writes_audit_and_delivers_once() {
    let dir = tempdir().unwrap();
    let audit_path = dir.path().join("audit.jsonl");
    let (multiplexer, engine) = engine(&audit_path);
    engine.start();

    let req = request("Read", Some("%42"));
    let cfg = allow(&["Read", "Glob", "Grep"]);
    let decision = engine.evaluate_request(&req, &cfg, 1_000).await;

    assert_eq!(decision.action, Action::Approve);
    assert_eq!(
        multiplexer.calls(),
        vec![MultiplexerCall::SendKeys {
            pane_id: "%42".to_string(),
            keys: "\n".to_string(),
        }]
    );

    let lines: Vec<String> = std::fs::read_to_string(&audit_path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    assert_eq!(lines.len(), 1);
    let entry: AuditEntry = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(entry.action, Action::Approve);
    assert_eq!(entry.tool_name, "Read");
    assert_eq!(entry.pane_id.as_deref(), Some("%42"));
}

// spec.md §8 S2
#[tokio::test]
async fn s2_deny_skips_delivery() {
    let dir = tempdir().unwrap();
    let audit_path = dir.path().join("audit.jsonl");
    let (multiplexer, engine) = engine(&audit_path);
    engine.start();

    let mut cfg = allow(&["Read"]);
    cfg.deny.insert("Write".to_string());
    let req = request("Write", Some("%42"));
    let decision = engine.evaluate_request(&req, &cfg, 1_000).await;

    assert_eq!(decision.action, Action::Deny);
    assert!(multiplexer.calls().is_empty());
}

#[tokio::test]
async fn invalid_pane_handle_downgrades_approve_to_escalate() {
    let dir = tempdir().unwrap();
    let audit_path = dir.path().join("audit.jsonl");
    let (multiplexer, engine) = engine(&audit_path);
    engine.start();

    let req = request("Read", Some("not-a-pane"));
    let cfg = allow(&["Read"]);
    let decision = engine.evaluate_request(&req, &cfg, 1_000).await;

    assert_eq!(decision.action, Action::Escalate);
    assert!(decision.reason.contains("invalid pane"));
    assert!(multiplexer.calls().is_empty());
}

// spec.md §8 S8
#[tokio::test]
async fn s8_unwritable_audit_dir_downgrades_to_escalate() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let audit_path = blocker.join("audit.jsonl");
    let (multiplexer, engine) = engine(&audit_path);
    engine.start();

    let req = request("Read", None);
    let cfg = allow(&["Read"]);
    let decision = engine.evaluate_request(&req, &cfg, 1_000).await;

    assert_eq!(decision.action, Action::Escalate);
    assert!(decision.reason.contains("audit"));
    assert!(multiplexer.calls().is_empty());
}

#[tokio::test]
async fn delivery_failure_keeps_approve_and_adds_audit_entry() {
    let dir = tempdir().unwrap();
    let audit_path = dir.path().join("audit.jsonl");
    let (multiplexer, engine) = engine(&audit_path);
    engine.start();
    multiplexer.kill_pane("%42");

    let req = request("Read", Some("%42"));
    let cfg = allow(&["Read"]);
    let decision = engine.evaluate_request(&req, &cfg, 1_000).await;

    assert_eq!(decision.action, Action::Approve);
    let lines: Vec<String> = std::fs::read_to_string(&audit_path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    assert_eq!(lines.len(), 2);
    let failure: AuditEntry = serde_json::from_str(&lines[1]).unwrap();
    assert_eq!(failure.category.as_deref(), Some("delivery_failure"));
    assert_eq!(failure.action, Action::Approve);
}

#[tokio::test]
async fn stopped_engine_always_escalates_without_delivery() {
    let dir = tempdir().unwrap();
    let audit_path = dir.path().join("audit.jsonl");
    let (multiplexer, engine) = engine(&audit_path);
    // never started

    let req = request("Read", Some("%42"));
    let cfg = allow(&["Read"]);
    let decision = engine.evaluate_request(&req, &cfg, 1_000).await;

    assert_eq!(decision.action, Action::Escalate);
    assert_eq!(decision.reason, "engine not running");
    assert!(multiplexer.calls().is_empty());
    assert!(!audit_path.exists());
}

#[tokio::test]
async fn start_is_idempotent_and_resets_stats() {
    let dir = tempdir().unwrap();
    let audit_path = dir.path().join("audit.jsonl");
    let (_multiplexer, engine) = engine(&audit_path);
    engine.start();
    engine.start();

    let req = request("Read", None);
    let cfg = allow(&["Read"]);
    engine.evaluate_request(&req, &cfg, 1_000).await;
    assert_eq!(engine.stats().total, 1);

    engine.start();
    assert_eq!(engine.stats(), EngineStats::default());
}

#[tokio::test]
async fn stop_is_idempotent() {
    let dir = tempdir().unwrap();
    let audit_path = dir.path().join("audit.jsonl");
    let (_multiplexer, engine) = engine(&audit_path);
    engine.start();
    engine.stop();
    engine.stop();
    assert!(!engine.is_running());
}

#[tokio::test]
async fn stats_count_every_action() {
    let dir = tempdir().unwrap();
    let audit_path = dir.path().join("audit.jsonl");
    let (_multiplexer, engine) = engine(&audit_path);
    engine.start();

    let mut cfg = allow(&["Read"]);
    cfg.deny.insert("Write".to_string());

    engine.evaluate_request(&request("Read", None), &cfg, 1).await;
    engine.evaluate_request(&request("Write", None), &cfg, 1).await;
    engine.evaluate_request(&request("Unknown", None), &cfg, 1).await;

    let stats = engine.stats();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.approved, 1);
    assert_eq!(stats.denied, 1);
    assert_eq!(stats.escalated, 1);
}

#[test]
fn pane_handle_validation() {
    assert!(is_valid_pane_handle("%17"));
    assert!(!is_valid_pane_handle("17"));
    assert!(!is_valid_pane_handle("%17; rm -rf /"));
}
