// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use genie_core::Action;
use tempfile::tempdir;

fn entry(action: Action) -> AuditEntry {
    AuditEntry {
        timestamp_ms: 1,
        pane_id: Some("%42".to_string()),
        tool_name: "Read".to_string(),
        wish_id: None,
        action,
        reason: "test".to_string(),
        category: None,
    }
}

#[test]
fn appends_one_line_per_entry() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    append_entry(&path, &entry(Action::Approve)).unwrap();
    append_entry(&path, &entry(Action::Deny)).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: AuditEntry = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first.action, Action::Approve);
    let second: AuditEntry = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second.action, Action::Deny);
}

#[test]
fn creates_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/dir/audit.jsonl");
    append_entry(&path, &entry(Action::Escalate)).unwrap();
    assert!(path.exists());
}

#[test]
fn unwritable_path_returns_error() {
    // A path with a regular file as one of its "parent directories"
    // component can never be created, mirroring an unwritable audit
    // directory (spec.md §8 S8).
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let path = blocker.join("audit.jsonl");
    assert!(append_entry(&path, &entry(Action::Approve)).is_err());
}
