// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn s5_scenario_resolved_via_worker() {
    // spec.md S5: worker bd-42 at paneId %17, target "bd-42:2"
    let target = ResolvedTarget {
        pane_id: "%23".to_string(),
        session: None,
        worker_id: Some("bd-42".to_string()),
        pane_index: Some(2),
        resolved_via: ResolveMethod::Worker,
    };
    assert_eq!(target.resolved_via, ResolveMethod::Worker);
    assert_eq!(target.pane_index, Some(2));
}

#[test]
fn serializes_session_window_with_colon() {
    let target = ResolvedTarget {
        pane_id: "%1".to_string(),
        session: Some("main".to_string()),
        worker_id: None,
        pane_index: None,
        resolved_via: ResolveMethod::SessionWindow,
    };
    let json = serde_json::to_string(&target).unwrap();
    assert!(json.contains("\"session:window\""));
}
