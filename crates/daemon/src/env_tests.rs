// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use std::time::Duration;

#[test]
#[serial] // mutates the process-wide GENIE_TAIL_INTERVAL_MS env var
fn tail_interval_defaults_when_unset() {
    std::env::remove_var("GENIE_TAIL_INTERVAL_MS");
    assert_eq!(tail_interval(), Duration::from_millis(250));
}

#[test]
#[serial] // mutates the process-wide GENIE_TAIL_INTERVAL_MS env var
fn tail_interval_respects_override() {
    std::env::set_var("GENIE_TAIL_INTERVAL_MS", "10");
    assert_eq!(tail_interval(), Duration::from_millis(10));
    std::env::remove_var("GENIE_TAIL_INTERVAL_MS");
}
