// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tmux multiplexer driver

use super::{MultiplexerDriver, MultiplexerError, PaneInfo, WindowInfo};
use async_trait::async_trait;
use tokio::process::Command;

/// Tmux-based implementation of [`MultiplexerDriver`].
#[derive(Clone, Default)]
pub struct TmuxAdapter;

impl TmuxAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MultiplexerDriver for TmuxAdapter {
    async fn find_session_by_name(
        &self,
        name: &str,
    ) -> Result<Option<String>, MultiplexerError> {
        let output = Command::new("tmux")
            .args(["has-session", "-t", name])
            .output()
            .await
            .map_err(|e| MultiplexerError::CommandFailed(e.to_string()))?;

        if output.status.success() {
            Ok(Some(name.to_string()))
        } else {
            Ok(None)
        }
    }

    async fn list_windows(&self, session_id: &str) -> Result<Vec<WindowInfo>, MultiplexerError> {
        let output = Command::new("tmux")
            .args([
                "list-windows",
                "-t",
                session_id,
                "-F",
                "#{window_id}\t#{window_name}\t#{window_active}",
            ])
            .output()
            .await
            .map_err(|e| MultiplexerError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            return Err(MultiplexerError::SessionNotFound(session_id.to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter_map(parse_window_line)
            .collect())
    }

    async fn list_panes(&self, window_id: &str) -> Result<Vec<PaneInfo>, MultiplexerError> {
        let output = Command::new("tmux")
            .args([
                "list-panes",
                "-t",
                window_id,
                "-F",
                "#{pane_id}\t#{pane_active}",
            ])
            .output()
            .await
            .map_err(|e| MultiplexerError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            return Err(MultiplexerError::WindowNotFound(window_id.to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter_map(parse_pane_line)
            .collect())
    }

    async fn capture_pane_content(
        &self,
        pane_id: &str,
        lines: u32,
    ) -> Result<String, MultiplexerError> {
        let output = Command::new("tmux")
            .args([
                "capture-pane",
                "-t",
                pane_id,
                "-p",
                "-S",
                &format!("-{}", lines),
            ])
            .output()
            .await
            .map_err(|e| MultiplexerError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            return Err(MultiplexerError::PaneNotFound(pane_id.to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    async fn execute_raw(&self, args: &[&str]) -> Result<String, MultiplexerError> {
        let output = Command::new("tmux")
            .args(args)
            .output()
            .await
            .map_err(|e| MultiplexerError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MultiplexerError::CommandFailed(stderr.to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    async fn send_keys(&self, pane_id: &str, keys: &str) -> Result<(), MultiplexerError> {
        let output = Command::new("tmux")
            .args(["send-keys", "-t", pane_id, "-l", "--", keys])
            .output()
            .await
            .map_err(|e| MultiplexerError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            return Err(MultiplexerError::PaneNotFound(pane_id.to_string()));
        }
        Ok(())
    }

    async fn is_pane_alive(&self, pane_id: &str) -> Result<bool, MultiplexerError> {
        let output = Command::new("tmux")
            .args(["display-message", "-t", pane_id, "-p", "#{pane_dead_status}"])
            .output()
            .await
            .map_err(|e| MultiplexerError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            return Err(MultiplexerError::PaneNotFound(pane_id.to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().is_empty())
    }
}

fn parse_window_line(line: &str) -> Option<WindowInfo> {
    let mut parts = line.splitn(3, '\t');
    let id = parts.next()?.to_string();
    let name = parts.next()?.to_string();
    let active = parts.next()? == "1";
    Some(WindowInfo { id, name, active })
}

fn parse_pane_line(line: &str) -> Option<PaneInfo> {
    let mut parts = line.splitn(2, '\t');
    let id = parts.next()?.to_string();
    let active = parts.next()? == "1";
    Some(PaneInfo { id, active })
}

#[cfg(test)]
#[path = "tmux_tests.rs"]
mod tests;
