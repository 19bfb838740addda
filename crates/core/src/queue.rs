// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Durable queue entry type (spec §3 "QueuedTask", §4.4).

use crate::session::SessionId;
use crate::worker::{AgentKind, Tier};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

crate::define_id! {
    /// Unique identifier for a durable queue entry.
    pub struct QueueId("queue-");
}

/// Lifecycle state of a queue entry (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueState {
    Pending,
    Dispatching,
    Working,
    Completed,
    Failed,
    Cancelled,
}

impl QueueState {
    pub fn as_str(self) -> &'static str {
        match self {
            QueueState::Pending => "pending",
            QueueState::Dispatching => "dispatching",
            QueueState::Working => "working",
            QueueState::Completed => "completed",
            QueueState::Failed => "failed",
            QueueState::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, QueueState::Completed | QueueState::Failed | QueueState::Cancelled)
    }
}

impl fmt::Display for QueueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a submission originated (spec §3, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionSource {
    Web,
    Scheduler,
    Cli,
}

impl fmt::Display for SubmissionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SubmissionSource::Web => "web",
            SubmissionSource::Scheduler => "scheduler",
            SubmissionSource::Cli => "cli",
        };
        f.write_str(s)
    }
}

/// The submission fields a caller provides (spec §6 request body).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub prompt: String,
    #[serde(default)]
    pub tier: Option<Tier>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub session_id: Option<SessionId>,
    pub agent_kind: AgentKind,
    #[serde(default)]
    pub env: HashMap<String, String>,
    pub source: SubmissionSource,
    #[serde(default)]
    pub source_job: Option<String>,
}

/// Dispatch bookkeeping attached to a queue entry once it leaves `pending`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchMeta {
    pub dispatched_at_ms: Option<u64>,
    pub worker_url: Option<String>,
    pub agent_task_id: Option<String>,
    pub attempts: u32,
    pub last_error: Option<String>,
}

/// Durable representation of a pending or in-flight submission
/// (spec §3 "QueuedTask").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedTask {
    pub queue_id: QueueId,
    pub state: QueueState,
    pub created_at_ms: u64,
    pub request: SubmissionRequest,
    pub dispatch: DispatchMeta,
}

impl QueuedTask {
    pub fn new(queue_id: QueueId, created_at_ms: u64, request: SubmissionRequest) -> Self {
        Self { queue_id, state: QueueState::Pending, created_at_ms, request, dispatch: DispatchMeta::default() }
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
