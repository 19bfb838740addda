// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! `POST /api/task` and `POST /api/queue/task` (spec §4.9, §6 "Submission
//! format"). Both endpoints enqueue the same canonical submission body;
//! they differ only in who is trusted to set `source`.

use std::sync::Arc;

use agency_core::{ErrorKind, SubmissionRequest, SubmissionSource, TaskError};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::dto::QueueSubmitResponse;
use crate::error_response::ApiError;
use crate::state::AppState;
use crate::time::now_ms;

fn validate(request: &SubmissionRequest) -> Result<(), ApiError> {
    if request.prompt.trim().is_empty() {
        return Err(TaskError::new(ErrorKind::ValidationError, "prompt must not be empty").into());
    }
    Ok(())
}

/// Web UI variant: the caller's `source`/`source_job` are ignored and
/// overwritten, so a browser client can never forge a scheduler-originated
/// submission in `GET /api/queue` listings.
pub async fn submit_web(
    State(state): State<Arc<AppState>>,
    Json(mut request): Json<SubmissionRequest>,
) -> Result<(StatusCode, Json<QueueSubmitResponse>), ApiError> {
    validate(&request)?;
    request.source = SubmissionSource::Web;
    request.source_job = None;
    enqueue(&state, request)
}

/// Scheduler/CLI variant: the body's `source` is trusted as-is (spec §4.8
/// "Scheduler POSTs to the configured director_url queue endpoint with
/// source=scheduler, source_job=<name>").
pub async fn submit_queue(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmissionRequest>,
) -> Result<(StatusCode, Json<QueueSubmitResponse>), ApiError> {
    validate(&request)?;
    enqueue(&state, request)
}

fn enqueue(state: &AppState, request: SubmissionRequest) -> Result<(StatusCode, Json<QueueSubmitResponse>), ApiError> {
    let (task, position) = state.queue.add(request, now_ms())?;
    let response = QueueSubmitResponse { queue_id: task.queue_id.as_str().to_string(), position, state: "pending" };
    Ok((StatusCode::CREATED, Json(response)))
}
