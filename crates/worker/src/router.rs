// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Builds the worker's `axum::Router` (spec §4.2 endpoint table).

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/status", get(handlers::status))
        .route("/task", post(handlers::submit_task))
        .route("/task/:id", get(handlers::get_task))
        .route("/task/:id/cancel", post(handlers::cancel_task))
        .route("/history", get(handlers::list_history))
        .route("/history/:id", get(handlers::get_outline))
        .route("/history/:id/debug", get(handlers::get_debug))
        .route("/shutdown", post(handlers::shutdown))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(60)))
        .with_state(state)
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
