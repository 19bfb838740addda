// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Session store entity (spec §3 "Session", §4.7).

use serde::{Deserialize, Serialize};

/// A reference to one task dispatched within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRef {
    pub queue_id: Option<String>,
    pub agent_task_id: Option<String>,
    pub state: String,
}

/// Logical thread of related tasks, pinned to one worker after first
/// dispatch (spec §3, §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub worker_url: Option<String>,
    pub tasks: Vec<TaskRef>,
    pub archived: bool,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
}

impl Session {
    pub fn new(session_id: impl Into<String>, now_ms: u64) -> Self {
        Self {
            session_id: session_id.into(),
            worker_url: None,
            tasks: Vec::new(),
            archived: false,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        }
    }

    /// Pin the session to `worker_url` if not already pinned.
    ///
    /// Spec §4.7 invariant: the pinned worker is set at first dispatch and
    /// never changed afterwards. Returns `false` if already pinned to a
    /// *different* worker (caller should treat this as an affinity
    /// violation, never silently repin).
    pub fn pin_worker(&mut self, worker_url: &str) -> bool {
        match &self.worker_url {
            None => {
                self.worker_url = Some(worker_url.to_string());
                true
            }
            Some(existing) => existing == worker_url,
        }
    }
}

#[cfg(test)]
#[path = "session_record_tests.rs"]
mod tests;
