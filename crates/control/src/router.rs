// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Builds the control plane's `axum::Router` (spec §4.9 endpoint list).

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{agents, queue, scheduler, sessions, task};
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/task", post(task::submit_web))
        .route("/api/queue/task", post(task::submit_queue))
        .route("/api/queue", get(queue::list_queue))
        .route("/api/queue/:id", get(queue::get_queue_entry))
        .route("/api/queue/:id/cancel", post(queue::cancel_queue_entry))
        .route("/api/agents", get(agents::list_agents))
        .route("/api/sessions", get(sessions::list_sessions))
        .route("/api/sessions/:id/archive", post(sessions::archive_session))
        .route("/api/scheduler/jobs", get(scheduler::list_jobs))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .with_state(state)
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
