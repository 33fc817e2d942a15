// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn find_session_by_name_respects_registered_sessions() {
    let fake = FakeMultiplexer::new();
    fake.with_session("main", vec![]);
    assert_eq!(
        fake.find_session_by_name("main").await.unwrap(),
        Some("main".to_string())
    );
    assert_eq!(fake.find_session_by_name("other").await.unwrap(), None);
}

#[tokio::test]
async fn dead_pane_fails_capture_and_liveness() {
    let fake = FakeMultiplexer::new();
    fake.kill_pane("%1");
    assert!(fake.capture_pane_content("%1", 10).await.is_err());
    assert!(!fake.is_pane_alive("%1").await.unwrap());
    assert!(fake.is_pane_alive("%2").await.unwrap());
}

#[tokio::test]
async fn send_keys_fails_for_dead_pane() {
    let fake = FakeMultiplexer::new();
    fake.kill_pane("%1");
    assert!(fake.send_keys("%1", "\n").await.is_err());
    assert_eq!(
        fake.calls(),
        vec![MultiplexerCall::SendKeys {
            pane_id: "%1".to_string(),
            keys: "\n".to_string(),
        }]
    );
}

#[tokio::test]
async fn send_keys_is_recorded() {
    let fake = FakeMultiplexer::new();
    fake.send_keys("%1", "\n").await.unwrap();
    assert_eq!(
        fake.calls(),
        vec![MultiplexerCall::SendKeys {
            pane_id: "%1".to_string(),
            keys: "\n".to_string(),
        }]
    );
}
