// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! genie-core: shared data model for the orchestration harness.

pub mod batch;
pub mod dashboard;
pub mod event;
pub mod id;
pub mod mailbox;
pub mod permission;
pub mod target;
pub mod time_fmt;
pub mod worker;

pub use batch::{Batch, BatchId, BatchOptions, BatchStatus, BatchSummary, WorkerSubState};
pub use dashboard::{DashboardStatus, LastEvent, WorkerDashboardState};
pub use event::{EventType, NormalizedEvent};
pub use id::{IdGen, SequentialIdGen, ShortId, UuidIdGen};
pub use mailbox::{MailboxMessage, MessageId, WorkerMailbox, OPERATOR};
pub use permission::{Action, AuditEntry, Decision, PermissionRequest, ToolInput};
pub use target::{ResolveMethod, ResolvedTarget};
pub use time_fmt::{format_elapsed, format_elapsed_ms};
pub use worker::{is_valid_worker_id, Provider, RunState, Transport, Worker, WorkerId};
