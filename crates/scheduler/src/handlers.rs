// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! HTTP handlers for the scheduler's own endpoint (spec §4.8 "Status endpoint").

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::dto::StatusResponse;
use crate::state::AppState;

pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse { jobs: state.jobs.list() })
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
