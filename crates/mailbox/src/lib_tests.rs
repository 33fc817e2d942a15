// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use genie_core::{Provider, RunState, Transport, Worker, WorkerId};
use tempfile::tempdir;

fn worker(id: &str, team: &str, role: &str) -> Worker {
    Worker {
        id: WorkerId::new(id),
        pane_id: "%1".to_string(),
        sub_panes: vec![],
        session_name: "genie-1".to_string(),
        window_id: None,
        repo_root: "/repo".into(),
        worktree_path: None,
        task_id: None,
        task_title: None,
        wish_slug: None,
        group: None,
        provider: Provider::Claude,
        transport: Transport::Tmux,
        team: team.to_string(),
        role: role.to_string(),
        skill: None,
        state: RunState::Idle,
        started_at_ms: 0,
        last_state_change_ms: 0,
        external_session_id: None,
    }
}

fn setup() -> (tempfile::TempDir, Mailbox) {
    let dir = tempdir().unwrap();
    let layout = GenieLayout::new(dir.path());
    let registry = Arc::new(WorkerRegistry::new(layout.clone()));
    (dir, Mailbox::new(layout, registry))
}

#[test]
fn send_to_unknown_recipient_is_not_delivered_and_writes_nothing() {
    let (dir, mailbox) = setup();
    let result = mailbox.send("operator", "ghost", "hi", 1).unwrap();
    assert!(matches!(result, SendResult::NotDelivered { .. }));
    assert!(!dir.path().join(".genie/mailbox/ghost.json").exists());
}

#[test]
fn send_to_exact_id_persists_before_returning() {
    let (_dir, mailbox) = setup();
    mailbox
        .registry
        .register(worker("bd-1", "t", "r"))
        .unwrap();
    mailbox.send("operator", "bd-1", "hi", 1).unwrap();
    let inbox = mailbox.inbox("bd-1").unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].body, "hi");
}

#[test]
fn send_fuzzy_matches_role_and_team_role() {
    let (_dir, mailbox) = setup();
    mailbox
        .registry
        .register(worker("bd-1", "alpha", "builder"))
        .unwrap();
    let r1 = mailbox.send("operator", "builder", "a", 1).unwrap();
    assert!(matches!(r1, SendResult::Delivered(_)));
    let r2 = mailbox.send("operator", "alpha:builder", "b", 2).unwrap();
    assert!(matches!(r2, SendResult::Delivered(_)));
    assert_eq!(mailbox.inbox("bd-1").unwrap().len(), 2);
}

#[test]
fn unread_and_pending_filters() {
    let (_dir, mailbox) = setup();
    mailbox.registry.register(worker("bd-1", "t", "r")).unwrap();
    let SendResult::Delivered(id) = mailbox.send("operator", "bd-1", "hi", 1).unwrap() else {
        panic!("expected delivered")
    };
    assert_eq!(mailbox.unread("bd-1").unwrap().len(), 1);
    assert_eq!(mailbox.pending("bd-1").unwrap().len(), 1);

    mailbox.mark_read("bd-1", id.as_str()).unwrap();
    assert!(mailbox.unread("bd-1").unwrap().is_empty());

    mailbox.mark_delivered("bd-1", id.as_str(), 50).unwrap();
    assert!(mailbox.pending("bd-1").unwrap().is_empty());
}

#[test]
fn flush_pending_delivers_all_and_is_idempotent() {
    let (_dir, mailbox) = setup();
    mailbox.registry.register(worker("bd-1", "t", "r")).unwrap();
    mailbox.send("operator", "bd-1", "a", 1).unwrap();
    mailbox.send("operator", "bd-1", "b", 2).unwrap();

    let flushed = mailbox.flush_pending("bd-1", 100).unwrap();
    assert_eq!(flushed.len(), 2);
    assert!(mailbox.pending("bd-1").unwrap().is_empty());

    let flushed_again = mailbox.flush_pending("bd-1", 200).unwrap();
    assert!(flushed_again.is_empty());
}

#[test]
fn message_ids_are_unique_within_a_mailbox_instance() {
    let (_dir, mailbox) = setup();
    mailbox.registry.register(worker("bd-1", "t", "r")).unwrap();
    let SendResult::Delivered(id1) = mailbox.send("operator", "bd-1", "a", 1).unwrap() else {
        panic!()
    };
    let SendResult::Delivered(id2) = mailbox.send("operator", "bd-1", "b", 1).unwrap() else {
        panic!()
    };
    assert_ne!(id1, id2);
}
