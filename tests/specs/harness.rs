// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

use std::collections::HashMap;
use std::sync::Arc;

use agency_control::{build_router, AppState, ControlConfig};
use agency_core::{AgentKind, SubmissionRequest, SubmissionSource, WorkerState, WorkerStatus};
use agency_discovery::{Discovery, DiscoveryConfig};
use agency_dispatcher::{Dispatcher, DispatcherConfig};
use agency_queue::WorkQueue;
use agency_sessions::SessionStore;
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;

pub fn idle_status(kind: AgentKind) -> WorkerStatus {
    WorkerStatus {
        kind,
        version: "test".to_string(),
        state: WorkerState::Idle,
        uptime_secs: 1,
        current_task_preview: None,
        tiers: agency_core::TierMap(HashMap::new()),
    }
}

/// Spawn a mock worker HTTP service on an ephemeral port, returning the port
/// and a handle the caller should keep alive for the test's duration.
pub async fn spawn_worker(router: Router) -> (u16, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind worker");
    let port = listener.local_addr().expect("addr").port();
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    (port, handle)
}

/// A worker that always reports idle and accepts tasks, immediately
/// reporting them as completed on the next status poll.
pub fn accepting_worker_router(task_id: &'static str) -> Router {
    let idle = idle_status(AgentKind::Claude);
    Router::new()
        .route("/status", get(move || { let s = idle.clone(); async move { Json(s) } }))
        .route(
            "/task",
            axum::routing::post(move || async move {
                (axum::http::StatusCode::CREATED, Json(serde_json::json!({"task_id": task_id, "session_id": "spec-session"})))
            }),
        )
        .route(
            "/task/:id",
            get(|axum::extract::Path(_id): axum::extract::Path<String>| async { Json(serde_json::json!({"state": "completed"})) }),
        )
}

pub struct Fixture {
    pub state: Arc<AppState>,
    pub router: Router,
    _dir: tempfile::TempDir,
}

pub fn build_fixture(max_queue_size: usize, max_attempts: u32) -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let queue = Arc::new(WorkQueue::open(dir.path(), max_queue_size).expect("open queue"));
    let discovery = Arc::new(Discovery::new(DiscoveryConfig { port_range: 0..=0, ..DiscoveryConfig::default() }));
    let sessions = Arc::new(SessionStore::new());
    let dispatcher = Arc::new(Dispatcher::new(
        queue.clone(),
        discovery.clone(),
        sessions.clone(),
        DispatcherConfig { max_attempts, ..DispatcherConfig::default() },
    ));
    let config = ControlConfig::new("127.0.0.1:0".parse().unwrap());
    let state = Arc::new(AppState::new(config, queue, discovery, sessions, dispatcher));
    let router = build_router(state.clone());
    Fixture { state, router, _dir: dir }
}

pub fn submission_body(prompt: &str) -> serde_json::Value {
    serde_json::json!({
        "prompt": prompt,
        "agent_kind": "claude",
        "source": "web",
    })
}

pub fn sample_request(prompt: &str) -> SubmissionRequest {
    SubmissionRequest {
        prompt: prompt.to_string(),
        tier: None,
        model: None,
        timeout_seconds: None,
        session_id: None,
        agent_kind: AgentKind::Claude,
        env: HashMap::new(),
        source: SubmissionSource::Cli,
        source_job: None,
    }
}
