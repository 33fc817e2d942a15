// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Policy engine (spec.md §4.1): layered auto-approve configuration,
//! command normalization, bounded regex matching, the decision algorithm,
//! audit logging, and engine lifecycle.

pub mod audit;
pub mod config;
pub mod decision;
pub mod engine;
pub mod normalize;
pub mod safe_regex;
pub mod wish;

pub use audit::{append_entry, AuditError};
pub use config::{AutoApproveConfig, CompiledPattern, ConfigFile, Inherit, RepoBlock};
pub use decision::decide;
pub use engine::{is_valid_pane_handle, EngineStats, PolicyEngine};
pub use normalize::normalize_command;
pub use safe_regex::{safe_regex_test, SafeMatch};
pub use wish::{parse_wish_autoapprove, WishAutoApprove};
