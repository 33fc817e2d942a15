// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon binary.

use std::path::PathBuf;
use std::time::Duration;

/// Repository root the daemon supervises: `GENIE_REPO_ROOT` if set,
/// otherwise the process's current directory.
pub fn repo_root() -> std::io::Result<PathBuf> {
    if let Ok(dir) = std::env::var("GENIE_REPO_ROOT") {
        return Ok(PathBuf::from(dir));
    }
    std::env::current_dir()
}

/// Poll interval for the event tailer, overridable via
/// `GENIE_TAIL_INTERVAL_MS` (default 250ms).
pub fn tail_interval() -> Duration {
    std::env::var("GENIE_TAIL_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(250))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
