// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! `GET /api/scheduler/jobs`: proxies to the standalone scheduler process's
//! own `GET /status` (spec §4.8 "Status endpoint", §4.9). The scheduler
//! runs out-of-process and talks to this control plane over HTTP rather
//! than being linked in as a library — see DESIGN.md.

use std::sync::Arc;

use agency_core::{ErrorKind, TaskError};
use axum::extract::State;
use axum::Json;

use crate::error_response::ApiError;
use crate::state::AppState;

pub async fn list_jobs(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(scheduler_url) = state.config.scheduler_url.as_deref() else {
        return Err(TaskError::new(ErrorKind::NotFound, "no scheduler is configured for this control plane").into());
    };
    let url = format!("{scheduler_url}/status");
    let body = state
        .http
        .get(&url)
        .send()
        .await
        .map_err(|e| TaskError::new(ErrorKind::InternalError, format!("scheduler unreachable: {e}")))?
        .json::<serde_json::Value>()
        .await
        .map_err(|e| TaskError::new(ErrorKind::InternalError, format!("scheduler returned an unparsable response: {e}")))?;
    Ok(Json(body))
}
