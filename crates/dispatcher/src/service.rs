// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Matches pending queue tasks to idle, kind-matching, affinity-compatible
//! workers and tracks their completion (spec §4.5 "Dispatcher").

use agency_core::{QueueState, QueuedTask, SessionId, WorkerState};
use agency_discovery::Discovery;
use agency_queue::WorkQueue;
use agency_sessions::SessionStore;
use parking_lot::Mutex;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::dto::{DispatchRequest, DispatchResponse, TaskStatusResponse};
use crate::time::now_ms;

#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Cadence of the dispatch loop (spec §4.5 "`PollInterval`, default 1s").
    pub poll_interval: Duration,
    /// Cadence of the completion-tracking loop (spec §4.5 step 3, "e.g. 5s").
    pub completion_poll_interval: Duration,
    /// Failed dispatch attempts allowed before a task is marked `failed` and
    /// removed (spec §3 "`MaxAttempts`, default 3").
    pub max_attempts: u32,
    /// Per-request timeout for dispatch/status HTTP calls.
    pub request_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            completion_poll_interval: Duration::from_secs(5),
            max_attempts: 3,
            request_timeout: Duration::from_secs(5),
        }
    }
}

/// A dispatched task's worker identity, remembered briefly after its queue
/// entry is removed so a status lookup that lands just after completion can
/// still be answered by proxying to the worker's history (spec §4.9 "Proxy
/// endpoints for task status that fall back to worker history on 404").
#[derive(Debug, Clone)]
pub struct CompletedEntry {
    pub queue_id: String,
    pub worker_url: String,
    pub agent_task_id: String,
}

const RECENT_COMPLETIONS_CAPACITY: usize = 200;

enum DispatchTarget {
    Ready { worker_url: String },
    /// No eligible worker right now; skip this tick without penalty (spec
    /// §4.5 "do not dispatch out of order... do not reassign").
    Busy,
    /// A session's pinned worker is gone or unreachable; counts as a failed
    /// attempt so the task eventually gives up rather than waiting forever
    /// (spec §4.5 edge case "pinned worker has disappeared... attempts
    /// accrue... or attempts are exhausted").
    PinnedUnavailable,
}

/// Polls the queue, resolves a worker per task, dispatches, and tracks
/// dispatched tasks through to a terminal state.
pub struct Dispatcher {
    queue: Arc<WorkQueue>,
    discovery: Arc<Discovery>,
    sessions: Arc<SessionStore>,
    client: reqwest::Client,
    config: DispatcherConfig,
    recent_completions: Mutex<VecDeque<CompletedEntry>>,
}

impl Dispatcher {
    pub fn new(queue: Arc<WorkQueue>, discovery: Arc<Discovery>, sessions: Arc<SessionStore>, config: DispatcherConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { queue, discovery, sessions, client, config, recent_completions: Mutex::new(VecDeque::new()) }
    }

    /// Look up a recently-removed queue entry's worker identity by queue id
    /// (spec §4.9 proxy fallback).
    pub fn find_recent_completion(&self, queue_id: &str) -> Option<CompletedEntry> {
        self.recent_completions.lock().iter().find(|e| e.queue_id == queue_id).cloned()
    }

    /// Run the dispatch loop and completion-tracking loop until `cancel`
    /// fires (spec §5 "one dispatcher, one completion-poller" actors).
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        let dispatch = {
            let this = self.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { this.dispatch_loop(cancel).await })
        };
        let completion = {
            let this = self.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { this.completion_loop(cancel).await })
        };
        let _ = tokio::join!(dispatch, completion);
    }

    async fn dispatch_loop(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.config.poll_interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => self.dispatch_tick(now_ms()).await,
            }
        }
    }

    async fn completion_loop(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.config.completion_poll_interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => self.completion_tick().await,
            }
        }
    }

    /// One dispatch pass over a FIFO snapshot of pending tasks (spec §4.5
    /// steps 1-2). A task blocked on session affinity never blocks later
    /// tasks targeting other workers.
    pub async fn dispatch_tick(&self, now_ms: u64) {
        for task in self.queue.pending_snapshot() {
            self.try_dispatch(&task, now_ms).await;
        }
    }

    async fn try_dispatch(&self, task: &QueuedTask, now_ms: u64) {
        match self.resolve_target(task) {
            DispatchTarget::Busy => {}
            DispatchTarget::PinnedUnavailable => {
                self.record_retry_or_fail(task, "pinned worker unreachable".to_string()).await;
            }
            DispatchTarget::Ready { worker_url } => {
                self.dispatch_to(task, &worker_url, now_ms).await;
            }
        }
    }

    /// Resolve the worker a task should go to (spec §4.5 step 2a/2b, "Tie-breaks").
    fn resolve_target(&self, task: &QueuedTask) -> DispatchTarget {
        if let Some(session_id) = &task.request.session_id {
            return match self.sessions.pinned_worker(session_id.as_str()) {
                Some(worker_url) => match port_from_worker_url(&worker_url) {
                    Some(port) if self.discovery.is_present_and_healthy(port) => {
                        match self.discovery.get(port).and_then(|r| r.status) {
                            Some(status) if status.state == WorkerState::Idle => DispatchTarget::Ready { worker_url },
                            _ => DispatchTarget::Busy,
                        }
                    }
                    _ => DispatchTarget::PinnedUnavailable,
                },
                None => self.resolve_any_idle(task),
            };
        }
        self.resolve_any_idle(task)
    }

    /// First healthy idle worker of the requested kind, in discovery order
    /// (spec §4.5 "Tie-breaks").
    fn resolve_any_idle(&self, task: &QueuedTask) -> DispatchTarget {
        match self.discovery.healthy_idle_workers(task.request.agent_kind).into_iter().next() {
            Some((port, _)) => DispatchTarget::Ready { worker_url: self.discovery.worker_url(port) },
            None => DispatchTarget::Busy,
        }
    }

    async fn dispatch_to(&self, task: &QueuedTask, worker_url: &str, now_ms: u64) {
        let queue_id = task.queue_id.as_str();
        if let Err(e) = self.queue.set_state(queue_id, QueueState::Dispatching) {
            warn!(queue_id, error = %e, "failed to mark task dispatching");
            return;
        }

        let body = DispatchRequest {
            prompt: &task.request.prompt,
            session_id: task.request.session_id.as_ref().map(|s| s.as_str()),
            tier: task.request.tier,
            model: task.request.model.as_deref(),
            timeout_seconds: task.request.timeout_seconds,
            env: &task.request.env,
        };
        let url = format!("{worker_url}/task");
        let response = self.client.post(&url).json(&body).send().await;

        match response {
            Ok(resp) if resp.status() == StatusCode::CREATED => self.handle_dispatched(task, worker_url, resp, now_ms).await,
            Ok(resp) if resp.status() == StatusCode::CONFLICT => {
                info!(queue_id, %worker_url, "worker busy, requeueing");
                let _ = self.queue.record_dispatch_attempt(queue_id, Some("agent_busy".to_string()));
                if let Err(e) = self.queue.requeue_at_back(queue_id) {
                    warn!(queue_id, error = %e, "failed to requeue after agent_busy");
                }
            }
            Ok(resp) if resp.status().is_server_error() => {
                let status = resp.status();
                self.record_retry_or_fail(task, format!("worker returned {status}")).await;
            }
            Ok(resp) => {
                let status = resp.status();
                warn!(queue_id, %status, "worker rejected dispatch, failing task");
                let _ = self.queue.remove(queue_id);
            }
            Err(e) => {
                self.record_retry_or_fail(task, format!("dispatch request failed: {e}")).await;
            }
        }
    }

    async fn handle_dispatched(&self, task: &QueuedTask, worker_url: &str, response: reqwest::Response, now_ms: u64) {
        let queue_id = task.queue_id.as_str();
        let parsed = match response.json::<DispatchResponse>().await {
            Ok(parsed) => parsed,
            Err(e) => {
                self.record_retry_or_fail(task, format!("invalid dispatch response: {e}")).await;
                return;
            }
        };
        let session_id = match SessionId::parse(&parsed.session_id) {
            Ok(id) => id,
            Err(_) => SessionId::generate(),
        };
        if let Err(e) = self.queue.set_dispatched(queue_id, worker_url, parsed.task_id.clone(), &session_id, now_ms) {
            warn!(queue_id, error = %e, "failed to record dispatch");
            return;
        }
        if !self.sessions.pin_worker(session_id.as_str(), worker_url, now_ms) {
            warn!(%session_id, %worker_url, "session affinity conflict on pin after dispatch");
        }
        self.sessions.add(
            session_id.as_str(),
            agency_core::TaskRef { queue_id: Some(queue_id.to_string()), agent_task_id: Some(parsed.task_id), state: "working".to_string() },
            now_ms,
        );
    }

    /// Increment attempts; requeue while under `max_attempts`, else mark
    /// failed and remove (spec §4.5 "5xx, network error, timeout" row).
    async fn record_retry_or_fail(&self, task: &QueuedTask, last_error: String) {
        let queue_id = task.queue_id.as_str();
        let attempts = match self.queue.record_dispatch_attempt(queue_id, Some(last_error)) {
            Ok(attempts) => attempts,
            Err(e) => {
                warn!(queue_id, error = %e, "failed to record dispatch attempt");
                return;
            }
        };
        if attempts >= self.config.max_attempts {
            warn!(queue_id, attempts, "max dispatch attempts exhausted, failing task");
            let _ = self.queue.remove(queue_id);
        } else if let Err(e) = self.queue.requeue_at_back(queue_id) {
            warn!(queue_id, error = %e, "failed to requeue task");
        }
    }

    /// One pass over dispatched tasks, removing any that reached a terminal
    /// state on their assigned worker (spec §4.5 step 3).
    pub async fn completion_tick(&self) {
        for task in self.queue.dispatched_snapshot() {
            self.check_completion(&task).await;
        }
    }

    async fn check_completion(&self, task: &QueuedTask) {
        let (Some(worker_url), Some(agent_task_id)) = (task.dispatch.worker_url.as_ref(), task.dispatch.agent_task_id.as_ref()) else {
            return;
        };
        let url = format!("{worker_url}/task/{agent_task_id}");
        let response = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                debug!(queue_id = %task.queue_id, error = %e, "completion poll failed");
                return;
            }
        };
        if !response.status().is_success() {
            return;
        }
        let status: TaskStatusResponse = match response.json().await {
            Ok(status) => status,
            Err(e) => {
                debug!(queue_id = %task.queue_id, error = %e, "completion poll returned unparsable body");
                return;
            }
        };
        if let Some(session_id) = &task.request.session_id {
            let _ = self.sessions.update_task_state(session_id.as_str(), agent_task_id, &status.state, now_ms());
        }
        if matches!(status.state.as_str(), "completed" | "failed" | "cancelled") {
            info!(queue_id = %task.queue_id, state = %status.state, "task reached terminal state, removing from queue");
            self.remember_completion(task.queue_id.as_str(), worker_url, agent_task_id);
            let _ = self.queue.remove(task.queue_id.as_str());
        }
    }
}

impl Dispatcher {
    fn remember_completion(&self, queue_id: &str, worker_url: &str, agent_task_id: &str) {
        let mut recent = self.recent_completions.lock();
        recent.push_back(CompletedEntry { queue_id: queue_id.to_string(), worker_url: worker_url.to_string(), agent_task_id: agent_task_id.to_string() });
        while recent.len() > RECENT_COMPLETIONS_CAPACITY {
            recent.pop_front();
        }
    }
}

fn port_from_worker_url(url: &str) -> Option<u16> {
    let after_scheme = url.rsplit_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let host_port = after_scheme.split('/').next()?;
    host_port.rsplit_once(':').and_then(|(_, port)| port.parse().ok())
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
