// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Scheduler job entity (spec §3 "Job (scheduler)", §4.8).

use crate::worker::{AgentKind, Tier};
use serde::{Deserialize, Serialize};

/// Outcome of a job's most recent submission attempt (spec §4.8's table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobLastStatus {
    Queued,
    SkippedQueueFull,
    SkippedError,
}

impl JobLastStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobLastStatus::Queued => "queued",
            JobLastStatus::SkippedQueueFull => "skipped_queue_full",
            JobLastStatus::SkippedError => "skipped_error",
        }
    }
}

/// Named cron-triggered submission template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    pub cron_expr: String,
    pub prompt: String,
    #[serde(default)]
    pub tier: Option<Tier>,
    #[serde(default)]
    pub model: Option<String>,
    pub timeout_seconds: u64,
    pub agent_kind: AgentKind,
    pub next_run_ms: Option<u64>,
    pub last_run_ms: Option<u64>,
    pub last_status: Option<JobLastStatus>,
    pub last_queue_id: Option<String>,
    /// Set at fire start, cleared on submission completion or failure
    /// (spec §4.8 "Per-job concurrency guard") — guards against overlapping
    /// fires of the same job.
    pub is_running: bool,
}

impl Job {
    pub fn new(
        name: impl Into<String>,
        cron_expr: impl Into<String>,
        prompt: impl Into<String>,
        agent_kind: AgentKind,
        timeout_seconds: u64,
    ) -> Self {
        Self {
            name: name.into(),
            cron_expr: cron_expr.into(),
            prompt: prompt.into(),
            tier: None,
            model: None,
            timeout_seconds,
            agent_kind,
            next_run_ms: None,
            last_run_ms: None,
            last_status: None,
            last_queue_id: None,
            is_running: false,
        }
    }

    /// Whether this job is eligible to fire: not already running, and its
    /// next-run time is due.
    pub fn is_due(&self, now_ms: u64) -> bool {
        !self.is_running && self.next_run_ms.map(|t| t <= now_ms).unwrap_or(false)
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
