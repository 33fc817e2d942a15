// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;
use tempfile::tempdir;

fn event_line(pane: &str) -> String {
    format!(
        "{{\"type\":\"session_start\",\"timestamp\":\"2026-01-01T00:00:00Z\",\"sessionId\":\"s1\",\"cwd\":\"/repo\",\"paneId\":\"{pane}\"}}\n"
    )
}

#[test]
fn returns_nothing_when_events_dir_missing() {
    let dir = tempdir().unwrap();
    let layout = GenieLayout::new(dir.path());
    let mut tailer = EventTailer::new();
    assert!(tailer.poll(&layout).unwrap().is_empty());
}

#[test]
fn reads_new_lines_once() {
    let dir = tempdir().unwrap();
    let layout = GenieLayout::new(dir.path());
    std::fs::create_dir_all(layout.events_dir()).unwrap();
    let path = layout.event_file("%1");
    std::fs::write(&path, event_line("%1")).unwrap();

    let mut tailer = EventTailer::new();
    let first = tailer.poll(&layout).unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].pane_id.as_deref(), Some("%1"));

    // no new data since last poll
    assert!(tailer.poll(&layout).unwrap().is_empty());
}

#[test]
fn only_consumes_complete_lines() {
    let dir = tempdir().unwrap();
    let layout = GenieLayout::new(dir.path());
    std::fs::create_dir_all(layout.events_dir()).unwrap();
    let path = layout.event_file("%2");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, "{}", event_line("%2")).unwrap();
    // partial line, no trailing newline yet
    write!(file, "{{\"type\":\"tool_call\"").unwrap();
    drop(file);

    let mut tailer = EventTailer::new();
    let events = tailer.poll(&layout).unwrap();
    assert_eq!(events.len(), 1);

    // completing the partial line surfaces it on the next poll
    let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
    write!(
        file,
        ",\"timestamp\":\"2026-01-01T00:00:01Z\",\"sessionId\":\"s1\",\"cwd\":\"/repo\",\"paneId\":\"%2\"}}\n"
    )
    .unwrap();
    drop(file);

    let events = tailer.poll(&layout).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].pane_id.as_deref(), Some("%2"));
}

#[test]
fn malformed_lines_are_skipped() {
    let dir = tempdir().unwrap();
    let layout = GenieLayout::new(dir.path());
    std::fs::create_dir_all(layout.events_dir()).unwrap();
    let path = layout.event_file("%3");
    std::fs::write(&path, "not json\n".to_string() + &event_line("%3")).unwrap();

    let mut tailer = EventTailer::new();
    let events = tailer.poll(&layout).unwrap();
    assert_eq!(events.len(), 1);
}

#[test]
fn multiple_panes_are_all_polled() {
    let dir = tempdir().unwrap();
    let layout = GenieLayout::new(dir.path());
    std::fs::create_dir_all(layout.events_dir()).unwrap();
    std::fs::write(layout.event_file("%1"), event_line("%1")).unwrap();
    std::fs::write(layout.event_file("%2"), event_line("%2")).unwrap();

    let mut tailer = EventTailer::new();
    let events = tailer.poll(&layout).unwrap();
    assert_eq!(events.len(), 2);
}
