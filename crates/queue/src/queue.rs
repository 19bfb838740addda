// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! In-memory FIFO work queue backed by the `pending/`/`dispatched/`
//! directory layout in [`crate::store`] (spec §4.4).

use agency_core::{DispatchMeta, QueueState, QueuedTask, SessionId, SubmissionRequest};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::QueueError;
use crate::store::{self, Location};

struct Inner {
    entries: HashMap<String, QueuedTask>,
    locations: HashMap<String, Location>,
    /// FIFO order of ids currently in [`QueueState::Pending`]. Entries are
    /// removed the moment they transition away from `Pending` (e.g. to
    /// `Dispatching`) and re-added at the back by `requeue_at_back`.
    order: VecDeque<String>,
}

/// Durable, bounded, single-mutex FIFO queue (spec §4.4 "Concurrency": all
/// operations serialize on one lock; the byId index and ordered slice are
/// mutated together).
pub struct WorkQueue {
    root: PathBuf,
    max_size: usize,
    inner: Mutex<Inner>,
}

impl WorkQueue {
    /// Open (or create) the queue directory layout and run crash recovery
    /// (spec §4.4 "Recovery on startup").
    pub fn open(root: impl Into<PathBuf>, max_size: usize) -> Result<Self, QueueError> {
        let root = root.into();
        store::ensure_layout(&root)?;

        let mut entries = HashMap::new();
        let mut locations = HashMap::new();

        // Dispatched entries cannot be trusted across a restart: the
        // assigned worker may have forgotten the task, or may still be
        // running it with no way for us to check except re-dispatch.
        for mut task in store::load_all(&root, Location::Dispatched)? {
            let id = task.queue_id.as_str().to_string();
            task.state = QueueState::Pending;
            task.dispatch = DispatchMeta::default();
            store::relocate(&root, Location::Dispatched, Location::Pending, &task)?;
            info!(queue_id = %id, "demoted dispatched entry to pending on recovery");
            locations.insert(id.clone(), Location::Pending);
            entries.insert(id, task);
        }

        for mut task in store::load_all(&root, Location::Pending)? {
            let id = task.queue_id.as_str().to_string();
            if entries.contains_key(&id) {
                continue;
            }
            if task.state == QueueState::Dispatching {
                // Same uncertainty as above: we don't know whether the
                // dispatch HTTP call landed before the crash.
                task.state = QueueState::Pending;
                store::write_entry(&root, Location::Pending, &task)?;
            }
            locations.insert(id.clone(), Location::Pending);
            entries.insert(id, task);
        }

        let mut pending_ids: Vec<String> = entries
            .values()
            .filter(|t| t.state == QueueState::Pending)
            .map(|t| t.queue_id.as_str().to_string())
            .collect();
        pending_ids.sort_by_key(|id| entries[id].created_at_ms);

        Ok(Self { root, max_size, inner: Mutex::new(Inner { entries, locations, order: pending_ids.into() }) })
    }

    /// Append a pending entry (spec §4.4 `Add`). `position` is 1-indexed,
    /// counting itself.
    pub fn add(&self, request: SubmissionRequest, now_ms: u64) -> Result<(QueuedTask, usize), QueueError> {
        let mut inner = self.inner.lock();
        if inner.order.len() >= self.max_size {
            return Err(QueueError::Full { pending: inner.order.len(), max_size: self.max_size });
        }
        let task = QueuedTask::new(agency_core::QueueId::new(), now_ms, request);
        let id = task.queue_id.as_str().to_string();
        store::write_entry(&self.root, Location::Pending, &task)?;
        inner.entries.insert(id.clone(), task.clone());
        inner.locations.insert(id.clone(), Location::Pending);
        inner.order.push_back(id);
        let position = inner.order.len();
        Ok((task, position))
    }

    /// Earliest pending task by `created_at_ms`; does not remove it
    /// (spec §4.4 `NextPending`).
    pub fn next_pending(&self) -> Option<QueuedTask> {
        let inner = self.inner.lock();
        inner.order.front().and_then(|id| inner.entries.get(id).cloned())
    }

    /// A snapshot of every pending task in FIFO order (spec §4.5 step 1,
    /// "take a snapshot of pending tasks").
    pub fn pending_snapshot(&self) -> Vec<QueuedTask> {
        let inner = self.inner.lock();
        inner.order.iter().filter_map(|id| inner.entries.get(id).cloned()).collect()
    }

    pub fn get(&self, queue_id: &str) -> Option<QueuedTask> {
        self.inner.lock().entries.get(queue_id).cloned()
    }

    /// Every entry currently persisted under `dispatched/` (spec §4.5 step 3,
    /// "a sibling loop polls each dispatched task's assigned worker").
    pub fn dispatched_snapshot(&self) -> Vec<QueuedTask> {
        let inner = self.inner.lock();
        inner
            .locations
            .iter()
            .filter(|(_, location)| **location == Location::Dispatched)
            .filter_map(|(id, _)| inner.entries.get(id).cloned())
            .collect()
    }

    /// Mutate `state` on an existing entry and re-persist at its current
    /// directory (spec §4.4 `SetState`). Moving directories is a job for
    /// [`Self::set_dispatched`]/[`Self::requeue_at_back`], not this call.
    pub fn set_state(&self, queue_id: &str, state: QueueState) -> Result<(), QueueError> {
        let mut inner = self.inner.lock();
        let was_pending = inner.entries.get(queue_id).map(|t| t.state == QueueState::Pending).unwrap_or(false);
        let location = *inner.locations.get(queue_id).ok_or_else(|| QueueError::NotFound(queue_id.to_string()))?;
        let task = inner.entries.get_mut(queue_id).ok_or_else(|| QueueError::NotFound(queue_id.to_string()))?;
        task.state = state;
        let snapshot = task.clone();
        store::write_entry(&self.root, location, &snapshot)?;

        if was_pending && state != QueueState::Pending {
            inner.order.retain(|id| id != queue_id);
        } else if !was_pending && state == QueueState::Pending {
            inner.order.push_back(queue_id.to_string());
        }
        Ok(())
    }

    /// Transition to `working`, record assignment, and move the persisted
    /// file from `pending/` to `dispatched/` (spec §4.4 `SetDispatched`).
    /// If the request had no `session_id`, `session_id` is recorded as the
    /// one the worker assigned.
    pub fn set_dispatched(
        &self,
        queue_id: &str,
        worker_url: impl Into<String>,
        agent_task_id: impl Into<String>,
        session_id: &SessionId,
        now_ms: u64,
    ) -> Result<(), QueueError> {
        let mut inner = self.inner.lock();
        let old_location =
            *inner.locations.get(queue_id).ok_or_else(|| QueueError::NotFound(queue_id.to_string()))?;
        let task = inner.entries.get_mut(queue_id).ok_or_else(|| QueueError::NotFound(queue_id.to_string()))?;
        task.state = QueueState::Working;
        task.dispatch.dispatched_at_ms = Some(now_ms);
        task.dispatch.worker_url = Some(worker_url.into());
        task.dispatch.agent_task_id = Some(agent_task_id.into());
        if task.request.session_id.is_none() {
            task.request.session_id = Some(session_id.clone());
        }
        let snapshot = task.clone();
        store::relocate(&self.root, old_location, Location::Dispatched, &snapshot)?;
        inner.locations.insert(queue_id.to_string(), Location::Dispatched);
        inner.order.retain(|id| id != queue_id);
        Ok(())
    }

    /// Increment the dispatch attempt counter and record `last_error`,
    /// without changing `state` or location. Used by the dispatcher before
    /// deciding whether to [`Self::requeue_at_back`] or mark the entry
    /// failed (spec §4.5 "Increment attempts").
    pub fn record_dispatch_attempt(&self, queue_id: &str, last_error: Option<String>) -> Result<u32, QueueError> {
        let mut inner = self.inner.lock();
        let location = *inner.locations.get(queue_id).ok_or_else(|| QueueError::NotFound(queue_id.to_string()))?;
        let task = inner.entries.get_mut(queue_id).ok_or_else(|| QueueError::NotFound(queue_id.to_string()))?;
        task.dispatch.attempts += 1;
        task.dispatch.last_error = last_error;
        let attempts = task.dispatch.attempts;
        let snapshot = task.clone();
        store::write_entry(&self.root, location, &snapshot)?;
        Ok(attempts)
    }

    /// Return to pending at the back of the order, clearing dispatch
    /// metadata but preserving `attempts` (spec §4.4 `RequeueAtBack`,
    /// "deliberate to avoid a poison task starving newer work").
    pub fn requeue_at_back(&self, queue_id: &str) -> Result<(), QueueError> {
        let mut inner = self.inner.lock();
        let old_location =
            *inner.locations.get(queue_id).ok_or_else(|| QueueError::NotFound(queue_id.to_string()))?;
        let task = inner.entries.get_mut(queue_id).ok_or_else(|| QueueError::NotFound(queue_id.to_string()))?;
        let attempts = task.dispatch.attempts;
        task.state = QueueState::Pending;
        task.dispatch = DispatchMeta { attempts, ..DispatchMeta::default() };
        let snapshot = task.clone();
        // An entry marked `dispatching` but never `set_dispatched` never left
        // `pending/`; relocating Pending -> Pending would write the file
        // then immediately delete that same path.
        if old_location == Location::Pending {
            store::write_entry(&self.root, Location::Pending, &snapshot)?;
        } else {
            store::relocate(&self.root, old_location, Location::Pending, &snapshot)?;
        }
        inner.locations.insert(queue_id.to_string(), Location::Pending);
        inner.order.retain(|id| id != queue_id);
        inner.order.push_back(queue_id.to_string());
        Ok(())
    }

    /// Delete from memory and disk unconditionally (spec §4.4 `Remove`).
    pub fn remove(&self, queue_id: &str) -> Result<(), QueueError> {
        let mut inner = self.inner.lock();
        let location = inner.locations.remove(queue_id);
        inner.entries.remove(queue_id);
        inner.order.retain(|id| id != queue_id);
        if let Some(location) = location {
            store::delete_entry(&self.root, location, queue_id)?;
        }
        Ok(())
    }

    /// Remove if present, returning the pre-removal snapshot marked
    /// cancelled (spec §4.4 `Cancel`).
    pub fn cancel(&self, queue_id: &str) -> Result<QueuedTask, QueueError> {
        let mut inner = self.inner.lock();
        let location =
            *inner.locations.get(queue_id).ok_or_else(|| QueueError::NotFound(queue_id.to_string()))?;
        let mut task = inner.entries.remove(queue_id).ok_or_else(|| QueueError::NotFound(queue_id.to_string()))?;
        inner.locations.remove(queue_id);
        inner.order.retain(|id| id != queue_id);
        task.state = QueueState::Cancelled;
        store::delete_entry(&self.root, location, queue_id)?;
        Ok(task)
    }

    /// Number of pending entries currently counted against `MaxSize`
    /// (spec §4.4 "Bounded size").
    pub fn depth(&self) -> usize {
        self.inner.lock().order.len()
    }

    /// 1-indexed position of `queue_id` among pending entries, if pending.
    pub fn position(&self, queue_id: &str) -> Option<usize> {
        self.inner.lock().order.iter().position(|id| id == queue_id).map(|i| i + 1)
    }

    /// Age in ms of the oldest pending entry, relative to `now_ms`.
    pub fn oldest_age_ms(&self, now_ms: u64) -> Option<u64> {
        let inner = self.inner.lock();
        let front = inner.order.front()?;
        let created_at = inner.entries.get(front)?.created_at_ms;
        Some(now_ms.saturating_sub(created_at))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
