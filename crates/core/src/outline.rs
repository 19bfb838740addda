// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Task outline types persisted by the history store (spec §4.3).

use crate::error::TaskError;
use crate::task::{TaskState, UsageStats};
use serde::{Deserialize, Serialize};

/// Maximum length of a step's `brief` text (spec §4.3: "truncated at the
/// retention boundary").
pub const STEP_BRIEF_MAX_LEN: usize = 200;

/// One step recorded during a task's execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineStep {
    pub kind: String,
    pub brief: String,
    pub timestamp_ms: u64,
}

impl OutlineStep {
    pub fn new(kind: impl Into<String>, brief: &str, timestamp_ms: u64) -> Self {
        Self { kind: kind.into(), brief: crate::id::short(brief, STEP_BRIEF_MAX_LEN).to_string(), timestamp_ms }
    }
}

/// The structured, bounded-size record of a terminal task's steps
/// (spec §3 "Outline", §4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutline {
    pub task_id: String,
    pub session_id: String,
    pub state: TaskState,
    pub started_at_ms: u64,
    pub ended_at_ms: u64,
    pub steps: Vec<OutlineStep>,
    pub usage: Option<UsageStats>,
    pub cost_usd: Option<f64>,
    pub error: Option<TaskError>,
}

#[cfg(test)]
#[path = "outline_tests.rs"]
mod tests;
