// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! In-memory session store (spec §4.7).

use agency_core::{Session, TaskRef};
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::error::SessionError;

/// Groups tasks submitted against the same `session_id` and tracks the
/// worker they're pinned to. Thread-safe via a single reader/writer lock,
/// following the single-struct-behind-one-lock shape used throughout this
/// workspace (`agency-queue::WorkQueue`, `agency-worker::AppState`).
///
/// The pinned-worker invariant itself is enforced by the dispatcher, not
/// here (spec §4.7): this store only records whatever pin the caller asks
/// for and reports whether it matched the existing one.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self { sessions: RwLock::new(HashMap::new()) }
    }

    /// Append `task_ref` to the session, creating it lazily if this is the
    /// first task referencing `session_id` (spec §4.7 "Lifecycle").
    pub fn add(&self, session_id: &str, task_ref: TaskRef, now_ms: u64) {
        let mut sessions = self.sessions.write();
        let session = sessions.entry(session_id.to_string()).or_insert_with(|| Session::new(session_id, now_ms));
        session.tasks.push(task_ref);
        session.updated_at_ms = now_ms;
    }

    /// Pin `session_id` to `worker_url`, creating the session lazily if
    /// needed. Returns `false` if the session was already pinned to a
    /// *different* worker — the caller (dispatcher) decides what that means.
    pub fn pin_worker(&self, session_id: &str, worker_url: &str, now_ms: u64) -> bool {
        let mut sessions = self.sessions.write();
        let session = sessions.entry(session_id.to_string()).or_insert_with(|| Session::new(session_id, now_ms));
        let pinned = session.pin_worker(worker_url);
        if pinned {
            session.updated_at_ms = now_ms;
        }
        pinned
    }

    pub fn pinned_worker(&self, session_id: &str) -> Option<String> {
        self.sessions.read().get(session_id).and_then(|s| s.worker_url.clone())
    }

    /// Update the state of a task previously recorded via [`add`](Self::add),
    /// matched by `queue_id` or `agent_task_id`.
    pub fn update_task_state(&self, session_id: &str, task_id: &str, new_state: &str, now_ms: u64) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write();
        let session = sessions.get_mut(session_id).ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
        let task = session
            .tasks
            .iter_mut()
            .find(|t| t.queue_id.as_deref() == Some(task_id) || t.agent_task_id.as_deref() == Some(task_id))
            .ok_or_else(|| SessionError::TaskNotFound { session_id: session_id.to_string(), task_id: task_id.to_string() })?;
        task.state = new_state.to_string();
        session.updated_at_ms = now_ms;
        Ok(())
    }

    /// Non-archived sessions sorted by `updated_at` descending (spec §4.7).
    pub fn get_all(&self) -> Vec<Session> {
        let mut sessions: Vec<Session> = self.sessions.read().values().filter(|s| !s.archived).cloned().collect();
        sessions.sort_by(|a, b| b.updated_at_ms.cmp(&a.updated_at_ms));
        sessions
    }

    pub fn get(&self, session_id: &str) -> Option<Session> {
        self.sessions.read().get(session_id).cloned()
    }

    /// Hide a session from [`get_all`](Self::get_all) listings without
    /// deleting its data (spec §4.7 "Archival hides a session... preserves
    /// its data").
    pub fn archive(&self, session_id: &str, now_ms: u64) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write();
        let session = sessions.get_mut(session_id).ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
        session.archived = true;
        session.updated_at_ms = now_ms;
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
