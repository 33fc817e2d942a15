// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory multiplexer fake for unit tests of callers.

use super::{MultiplexerDriver, MultiplexerError, PaneInfo, WindowInfo};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

/// A call recorded by [`FakeMultiplexer`], for assertions in caller tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiplexerCall {
    SendKeys { pane_id: String, keys: String },
    ExecuteRaw { args: Vec<String> },
}

#[derive(Debug, Default)]
struct Inner {
    sessions: HashMap<String, Vec<WindowInfo>>,
    panes: HashMap<String, Vec<PaneInfo>>,
    dead_panes: std::collections::HashSet<String>,
    calls: Vec<MultiplexerCall>,
}

/// A scriptable, in-process [`MultiplexerDriver`] for exercising callers
/// (target resolver, approval delivery, mailbox flush) without a real
/// tmux binary.
#[derive(Default)]
pub struct FakeMultiplexer {
    inner: Mutex<Inner>,
}

impl FakeMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(&self, session_id: impl Into<String>, windows: Vec<WindowInfo>) {
        self.inner.lock().sessions.insert(session_id.into(), windows);
    }

    pub fn with_panes(&self, window_id: impl Into<String>, panes: Vec<PaneInfo>) {
        self.inner.lock().panes.insert(window_id.into(), panes);
    }

    pub fn kill_pane(&self, pane_id: impl Into<String>) {
        self.inner.lock().dead_panes.insert(pane_id.into());
    }

    pub fn calls(&self) -> Vec<MultiplexerCall> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl MultiplexerDriver for FakeMultiplexer {
    async fn find_session_by_name(
        &self,
        name: &str,
    ) -> Result<Option<String>, MultiplexerError> {
        Ok(self
            .inner
            .lock()
            .sessions
            .contains_key(name)
            .then(|| name.to_string()))
    }

    async fn list_windows(&self, session_id: &str) -> Result<Vec<WindowInfo>, MultiplexerError> {
        self.inner
            .lock()
            .sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| MultiplexerError::SessionNotFound(session_id.to_string()))
    }

    async fn list_panes(&self, window_id: &str) -> Result<Vec<PaneInfo>, MultiplexerError> {
        self.inner
            .lock()
            .panes
            .get(window_id)
            .cloned()
            .ok_or_else(|| MultiplexerError::WindowNotFound(window_id.to_string()))
    }

    async fn capture_pane_content(
        &self,
        pane_id: &str,
        _lines: u32,
    ) -> Result<String, MultiplexerError> {
        if self.inner.lock().dead_panes.contains(pane_id) {
            return Err(MultiplexerError::PaneNotFound(pane_id.to_string()));
        }
        Ok(String::new())
    }

    async fn execute_raw(&self, args: &[&str]) -> Result<String, MultiplexerError> {
        self.inner.lock().calls.push(MultiplexerCall::ExecuteRaw {
            args: args.iter().map(|s| s.to_string()).collect(),
        });
        Ok(String::new())
    }

    async fn send_keys(&self, pane_id: &str, keys: &str) -> Result<(), MultiplexerError> {
        let mut inner = self.inner.lock();
        inner.calls.push(MultiplexerCall::SendKeys {
            pane_id: pane_id.to_string(),
            keys: keys.to_string(),
        });
        if inner.dead_panes.contains(pane_id) {
            return Err(MultiplexerError::PaneNotFound(pane_id.to_string()));
        }
        Ok(())
    }

    async fn is_pane_alive(&self, pane_id: &str) -> Result<bool, MultiplexerError> {
        Ok(!self.inner.lock().dead_panes.contains(pane_id))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
