// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target resolution chain (spec.md §4.2): turn an operator-supplied
//! string into a concrete pane handle.

use crate::registry::{RegistryError, WorkerRegistry};
use genie_adapters::{MultiplexerDriver, MultiplexerError};
use genie_core::{ResolveMethod, ResolvedTarget};
use regex::Regex;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("worker not found: {0}. Run `workers` to list workers.")]
    WorkerNotFound(String),
    #[error("window not found: {0}. Run `workers` to list windows.")]
    WindowNotFound(String),
    #[error("session not found: {0}. Run `workers` to list sessions.")]
    SessionNotFound(String),
    #[error(
        "pane index {index} out of range for worker {worker_id} ({count} panes). \
         Run `workers` to list workers."
    )]
    PaneIndexOutOfRange {
        worker_id: String,
        index: usize,
        count: usize,
    },
    #[error("pane {pane_id} is dead for worker {worker_id}. Run `workers` to list workers.")]
    PaneDead { worker_id: String, pane_id: String },
    #[error("pane {0} is dead. Run `workers` to list workers.")]
    RawPaneDead(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Multiplexer(#[from] MultiplexerError),
}

#[allow(clippy::unwrap_used)]
fn raw_pane_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^%\d+$").unwrap())
}

#[allow(clippy::unwrap_used)]
fn window_handle_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^@\d+$").unwrap())
}

/// Resolves operator-supplied target strings to concrete panes, per the
/// level-1 through level-4 chain in spec.md §4.2.
pub struct TargetResolver<M: MultiplexerDriver> {
    registry: Arc<WorkerRegistry>,
    multiplexer: Arc<M>,
    check_liveness: bool,
}

impl<M: MultiplexerDriver> TargetResolver<M> {
    pub fn new(registry: Arc<WorkerRegistry>, multiplexer: Arc<M>) -> Self {
        Self {
            registry,
            multiplexer,
            check_liveness: false,
        }
    }

    pub fn with_liveness_check(mut self, enabled: bool) -> Self {
        self.check_liveness = enabled;
        self
    }

    pub async fn resolve(&self, input: &str) -> Result<ResolvedTarget, ResolveError> {
        let target = self.resolve_uncheck(input).await?;
        self.apply_liveness(target).await
    }

    async fn resolve_uncheck(&self, input: &str) -> Result<ResolvedTarget, ResolveError> {
        // Level 1: raw pane handle.
        if raw_pane_re().is_match(input) {
            return Ok(ResolvedTarget {
                pane_id: input.to_string(),
                session: None,
                worker_id: None,
                pane_index: None,
                resolved_via: ResolveMethod::Raw,
            });
        }

        // Level 1.5: window handle, resolved against a registered worker.
        if window_handle_re().is_match(input) {
            let worker = self
                .registry
                .find_by_window(input)?
                .ok_or_else(|| ResolveError::WorkerNotFound(input.to_string()))?;
            return Ok(ResolvedTarget {
                pane_id: worker.pane_id.clone(),
                session: Some(worker.session_name.clone()),
                worker_id: Some(worker.id.as_str().to_string()),
                pane_index: Some(0),
                resolved_via: ResolveMethod::Worker,
            });
        }

        // Level 2a / 2b: "<left>:<right>".
        if let Some((left, right)) = input.split_once(':') {
            if let Some(worker) = self.registry.get(left)? {
                let index: usize = right
                    .parse()
                    .map_err(|_| ResolveError::WorkerNotFound(input.to_string()))?;
                let pane_id = worker.pane_at(index).map(str::to_string).ok_or(
                    ResolveError::PaneIndexOutOfRange {
                        worker_id: left.to_string(),
                        index,
                        count: worker.pane_count(),
                    },
                )?;
                return Ok(ResolvedTarget {
                    pane_id,
                    session: Some(worker.session_name.clone()),
                    worker_id: Some(worker.id.as_str().to_string()),
                    pane_index: Some(index),
                    resolved_via: ResolveMethod::Worker,
                });
            }

            // 2b fallthrough: "<session>:<window>".
            let session_id = self
                .multiplexer
                .find_session_by_name(left)
                .await?
                .ok_or_else(|| ResolveError::SessionNotFound(left.to_string()))?;
            let windows = self.multiplexer.list_windows(&session_id).await?;
            let window = windows
                .iter()
                .find(|w| w.id == right || w.name == right)
                .ok_or_else(|| ResolveError::WindowNotFound(right.to_string()))?;
            let panes = self.multiplexer.list_panes(&window.id).await?;
            let pane = prefer_active(&panes)
                .ok_or_else(|| ResolveError::WindowNotFound(right.to_string()))?;
            return Ok(ResolvedTarget {
                pane_id: pane.id.clone(),
                session: Some(session_id),
                worker_id: None,
                pane_index: None,
                resolved_via: ResolveMethod::SessionWindow,
            });
        }

        // Level 3: bare registered worker id.
        if let Some(worker) = self.registry.get(input)? {
            return Ok(ResolvedTarget {
                pane_id: worker.pane_id.clone(),
                session: Some(worker.session_name.clone()),
                worker_id: Some(worker.id.as_str().to_string()),
                pane_index: Some(0),
                resolved_via: ResolveMethod::Worker,
            });
        }

        // Level 4: bare session name.
        let session_id = self
            .multiplexer
            .find_session_by_name(input)
            .await?
            .ok_or_else(|| ResolveError::SessionNotFound(input.to_string()))?;
        let windows = self.multiplexer.list_windows(&session_id).await?;
        let window = prefer_active_window(&windows)
            .ok_or_else(|| ResolveError::SessionNotFound(input.to_string()))?;
        let panes = self.multiplexer.list_panes(&window.id).await?;
        let pane = prefer_active(&panes)
            .ok_or_else(|| ResolveError::SessionNotFound(input.to_string()))?;
        Ok(ResolvedTarget {
            pane_id: pane.id.clone(),
            session: Some(session_id),
            worker_id: None,
            pane_index: None,
            resolved_via: ResolveMethod::Session,
        })
    }

    async fn apply_liveness(&self, target: ResolvedTarget) -> Result<ResolvedTarget, ResolveError> {
        if !self.check_liveness {
            return Ok(target);
        }
        let alive = self.multiplexer.is_pane_alive(&target.pane_id).await?;
        if alive {
            return Ok(target);
        }
        match &target.worker_id {
            Some(worker_id) => {
                self.cleanup_dead_pane(worker_id, &target.pane_id)?;
                Err(ResolveError::PaneDead {
                    worker_id: worker_id.clone(),
                    pane_id: target.pane_id,
                })
            }
            None => Err(ResolveError::RawPaneDead(target.pane_id)),
        }
    }

    /// Remove the sub-pane if it was a secondary pane, or unregister the
    /// whole worker if its primary pane died.
    fn cleanup_dead_pane(&self, worker_id: &str, pane_id: &str) -> Result<(), ResolveError> {
        let worker = match self.registry.get(worker_id)? {
            Some(w) => w,
            None => return Ok(()),
        };
        if worker.pane_id == pane_id {
            self.registry.unregister(worker_id)?;
        } else {
            self.registry.remove_sub_pane(worker_id, pane_id)?;
        }
        Ok(())
    }
}

fn prefer_active<'a>(panes: &'a [genie_adapters::PaneInfo]) -> Option<&'a genie_adapters::PaneInfo> {
    panes.iter().find(|p| p.active).or_else(|| panes.first())
}

fn prefer_active_window<'a>(
    windows: &'a [genie_adapters::WindowInfo],
) -> Option<&'a genie_adapters::WindowInfo> {
    windows.iter().find(|w| w.active).or_else(|| windows.first())
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
