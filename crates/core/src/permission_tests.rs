// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn from_raw_bash_extracts_command() {
    let raw = serde_json::json!({"command": "git status"});
    let input = ToolInput::from_raw("Bash", Some(&raw)).unwrap();
    assert_eq!(input.bash_command(), Some("git status"));
}

#[test]
fn from_raw_read_extracts_path() {
    let raw = serde_json::json!({"path": "/tmp/foo.txt"});
    let input = ToolInput::from_raw("Read", Some(&raw)).unwrap();
    assert_eq!(input, ToolInput::Read { path: "/tmp/foo.txt".to_string() });
}

#[test]
fn from_raw_unknown_tool_falls_back_to_other() {
    let raw = serde_json::json!({"query": "select 1"});
    let input = ToolInput::from_raw("Sql", Some(&raw)).unwrap();
    match input {
        ToolInput::Other(map) => assert_eq!(map.get("query").and_then(|v| v.as_str()), Some("select 1")),
        _ => panic!("expected Other"),
    }
}

#[test]
fn from_raw_missing_returns_none() {
    assert!(ToolInput::from_raw("Bash", None).is_none());
}

#[test]
fn decision_constructors_set_action() {
    assert_eq!(Decision::approve("ok").action, Action::Approve);
    assert_eq!(Decision::deny("no").action, Action::Deny);
    assert_eq!(Decision::escalate("ask").action, Action::Escalate);
}

#[test]
fn is_approve_only_true_for_approve() {
    assert!(Decision::approve("ok").is_approve());
    assert!(!Decision::deny("no").is_approve());
    assert!(!Decision::escalate("ask").is_approve());
}
