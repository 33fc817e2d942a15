// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Multiplexer driver adapters

mod tmux;

pub use tmux::TmuxAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeMultiplexer, MultiplexerCall};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from multiplexer driver operations.
#[derive(Debug, Error)]
pub enum MultiplexerError {
    #[error("session not found: {0}")]
    SessionNotFound(String),
    #[error("window not found: {0}")]
    WindowNotFound(String),
    #[error("pane not found: {0}")]
    PaneNotFound(String),
    #[error("multiplexer command failed: {0}")]
    CommandFailed(String),
}

/// One window within a multiplexer session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub id: String,
    pub name: String,
    pub active: bool,
}

/// One pane within a multiplexer window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneInfo {
    pub id: String,
    pub active: bool,
}

/// An external multiplexer collaborator (spec.md §6 "Multiplexer driver").
///
/// Every method is a thin, side-effecting wrapper around the real
/// multiplexer binary; all policy (which pane to prefer, liveness
/// thresholds, retry) lives in the callers (target resolver, approval
/// delivery, mailbox flush).
#[async_trait]
pub trait MultiplexerDriver: Send + Sync + 'static {
    /// Look up a session by name. Returns `Ok(None)` if it does not exist,
    /// distinct from an `Err` transport failure.
    async fn find_session_by_name(
        &self,
        name: &str,
    ) -> Result<Option<String>, MultiplexerError>;

    async fn list_windows(&self, session_id: &str) -> Result<Vec<WindowInfo>, MultiplexerError>;

    async fn list_panes(&self, window_id: &str) -> Result<Vec<PaneInfo>, MultiplexerError>;

    async fn capture_pane_content(
        &self,
        pane_id: &str,
        lines: u32,
    ) -> Result<String, MultiplexerError>;

    /// Escape hatch for ad-hoc multiplexer commands, used only for
    /// `display-message` liveness probes per spec.md §4.2.
    async fn execute_raw(&self, args: &[&str]) -> Result<String, MultiplexerError>;

    async fn send_keys(&self, pane_id: &str, keys: &str) -> Result<(), MultiplexerError>;

    /// True if the pane's process has not exited (`display-message
    /// '#{pane_dead_status}'` is empty).
    async fn is_pane_alive(&self, pane_id: &str) -> Result<bool, MultiplexerError>;
}
