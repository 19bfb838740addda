// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Task entity (spec §3 "Task") executed by a single worker.

use crate::error::TaskError;
use crate::session::SessionId;
use serde::{Deserialize, Serialize};
use std::fmt;

crate::define_id! {
    /// Unique identifier for a task, unique within its owning worker.
    pub struct TaskId("tsk-");
}

/// Lifecycle state of a task (spec §3, §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Queued,
    Working,
    Completed,
    Failed,
    Cancelled,
}

impl TaskState {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskState::Queued => "queued",
            TaskState::Working => "working",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::Cancelled => "cancelled",
        }
    }

    /// Terminal states never transition further (spec §3, §8 invariant 8).
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed | TaskState::Cancelled)
    }

    /// Whether moving from `self` to `next` is a legal, monotonic transition.
    pub fn can_transition_to(self, next: TaskState) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self, next) {
            (TaskState::Queued, TaskState::Working) => true,
            (TaskState::Queued, TaskState::Cancelled) => true,
            (TaskState::Working, TaskState::Completed) => true,
            (TaskState::Working, TaskState::Failed) => true,
            (TaskState::Working, TaskState::Cancelled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token usage reported by the child's terminal `result` event (spec §4.1).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageStats {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// A unit of work executed by a single worker against a single CLI child.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub task_id: TaskId,
    pub session_id: SessionId,
    pub prompt: String,
    pub model: String,
    pub timeout_secs: u64,
    pub started_at_ms: u64,
    pub ended_at_ms: Option<u64>,
    pub state: TaskState,
    pub exit_code: Option<i32>,
    pub output: String,
    pub error: Option<TaskError>,
    pub usage: Option<UsageStats>,
    pub cost_usd: Option<f64>,
    /// Number of auto-resume attempts used so far (spec §4.2, max 2 extra).
    pub resume_attempts: u32,
}

impl Task {
    /// Move to `next`, returning an error describing the illegal transition
    /// if one is attempted. Callers are expected to have already checked
    /// `can_transition_to`; this is the authoritative enforcement point.
    pub fn transition(&mut self, next: TaskState) -> Result<(), String> {
        if !self.state.can_transition_to(next) {
            return Err(format!("illegal task transition {} -> {}", self.state, next));
        }
        self.state = next;
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
