// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! `GET /api/queue`, `GET /api/queue/{id}`, `POST /api/queue/{id}/cancel`
//! (spec §4.9, §2 "Queue cancellation: removes pending entry, or forwards
//! to worker if already dispatched").

use std::sync::Arc;

use agency_core::{ErrorKind, QueueState, TaskError};
use axum::extract::{Path, State};
use axum::Json;

use crate::dto::{QueueCancelResponse, QueueListResponse};
use crate::error_response::ApiError;
use crate::state::AppState;
use crate::time::now_ms;

pub async fn list_queue(State(state): State<Arc<AppState>>) -> Json<QueueListResponse> {
    let entries = state.queue.pending_snapshot();
    let dispatched_count = state.queue.dispatched_snapshot().len();
    Json(QueueListResponse {
        depth: state.queue.depth(),
        oldest_age_ms: state.queue.oldest_age_ms(now_ms()),
        dispatched_count,
        entries,
    })
}

/// Falls back to the dispatcher's short-lived recent-completions cache when
/// the entry has already been removed from the queue, so a status poll that
/// lands just after completion isn't a spurious 404 (spec §4.9).
///
/// The two branches return different shapes (a [`agency_core::QueuedTask`]
/// versus a worker's [`agency_core::Task`] proxied verbatim), so this hands
/// back a bare JSON value rather than forcing both into one Rust type.
pub async fn get_queue_entry(
    State(state): State<Arc<AppState>>,
    Path(queue_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if let Some(task) = state.queue.get(&queue_id) {
        let value = serde_json::to_value(task)
            .map_err(|e| TaskError::new(ErrorKind::InternalError, format!("failed to encode queue entry: {e}")))?;
        return Ok(Json(value));
    }
    if let Some(completion) = state.dispatcher.find_recent_completion(&queue_id) {
        let url = format!("{}/task/{}", completion.worker_url, completion.agent_task_id);
        let task = state
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| TaskError::new(ErrorKind::InternalError, format!("proxying to worker history failed: {e}")))?
            .json::<serde_json::Value>()
            .await
            .map_err(|e| TaskError::new(ErrorKind::InternalError, format!("worker returned an unparsable task: {e}")))?;
        return Ok(Json(task));
    }
    Err(TaskError::new(ErrorKind::NotFound, format!("queue entry {queue_id} not found")).into())
}

pub async fn cancel_queue_entry(
    State(state): State<Arc<AppState>>,
    Path(queue_id): Path<String>,
) -> Result<Json<QueueCancelResponse>, ApiError> {
    let entry = state.queue.get(&queue_id).ok_or_else(|| TaskError::new(ErrorKind::NotFound, format!("queue entry {queue_id} not found")))?;

    if entry.state == QueueState::Pending || entry.state == QueueState::Dispatching {
        state.queue.cancel(&queue_id)?;
        return Ok(Json(QueueCancelResponse { queue_id, cancelled: true }));
    }

    let worker_url = entry.dispatch.worker_url.as_deref().ok_or_else(|| {
        TaskError::new(ErrorKind::InternalError, format!("queue entry {queue_id} has no assigned worker"))
    })?;
    let agent_task_id = entry.dispatch.agent_task_id.as_deref().unwrap_or_default();
    let url = format!("{worker_url}/task/{agent_task_id}/cancel");
    let accepted = state.http.post(&url).send().await.map(|r| r.status().is_success()).unwrap_or(false);
    Ok(Json(QueueCancelResponse { queue_id, cancelled: accepted }))
}
