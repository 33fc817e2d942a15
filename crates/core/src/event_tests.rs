// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn round_trips_minimal_session_start() {
    let line = r#"{"type":"session_start","timestamp":"2026-07-27T00:00:00Z","sessionId":"s1","cwd":"/repo"}"#;
    let event = NormalizedEvent::from_line(line).unwrap();
    assert_eq!(event.event_type, EventType::SessionStart);
    assert!(event.pane_id.is_none());
    assert!(event.tool_input.is_none());
}

#[test]
fn parses_tool_call_with_pane_and_input() {
    let line = r#"{"type":"tool_call","timestamp":"t","sessionId":"s1","cwd":"/repo","paneId":"%42","wishId":"fix-bug","toolName":"Bash","toolInput":{"command":"ls"},"toolCallId":"call-1"}"#;
    let event = NormalizedEvent::from_line(line).unwrap();
    assert_eq!(event.pane_id.as_deref(), Some("%42"));
    assert_eq!(event.wish_id.as_deref(), Some("fix-bug"));
    assert_eq!(event.tool_name.as_deref(), Some("Bash"));
    assert_eq!(event.tool_call_id.as_deref(), Some("call-1"));
    assert_eq!(
        event.tool_input.unwrap().get("command").and_then(|v| v.as_str()),
        Some("ls")
    );
}

#[test]
fn session_end_carries_exit_reason() {
    let line = r#"{"type":"session_end","timestamp":"t","sessionId":"s1","cwd":"/repo","exitReason":"completed"}"#;
    let event = NormalizedEvent::from_line(line).unwrap();
    assert_eq!(event.event_type, EventType::SessionEnd);
    assert_eq!(event.exit_reason.as_deref(), Some("completed"));
}

#[test]
fn missing_required_field_fails() {
    let line = r#"{"type":"tool_call","sessionId":"s1","cwd":"/repo"}"#;
    assert!(NormalizedEvent::from_line(line).is_err());
}

#[test]
fn round_trip_preserves_optional_fields() {
    let event = NormalizedEvent {
        event_type: EventType::PermissionRequest,
        timestamp: "t".to_string(),
        session_id: "s1".to_string(),
        cwd: "/repo".to_string(),
        pane_id: Some("%1".to_string()),
        wish_id: None,
        tool_name: Some("Write".to_string()),
        tool_input: None,
        tool_call_id: None,
        exit_reason: None,
    };
    let line = event.to_line().unwrap();
    let parsed = NormalizedEvent::from_line(&line).unwrap();
    assert_eq!(parsed.pane_id, event.pane_id);
    assert_eq!(parsed.tool_name, event.tool_name);
    assert!(!line.contains("wishId"));
}
