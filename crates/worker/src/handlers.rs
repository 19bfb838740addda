// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! HTTP handlers implementing the worker's public contract (spec §4.2 table).

use agency_core::{ErrorKind, SessionId, Task, TaskError, TaskState};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use crate::dto::{
    CancelResponse, HistoryQuery, ShutdownRequest, ShutdownResponse, SubmitTaskRequest, SubmitTaskResponse,
};
use crate::error_response::ApiError;
use crate::executor;
use crate::state::{AppState, RunningTask, Slot};
use crate::time::now_ms;

pub async fn status(State(state): State<Arc<AppState>>) -> Json<agency_core::WorkerStatus> {
    let slot = state.slot.lock().await;
    let preview = match &*slot {
        Slot::Working(running) | Slot::Cancelling(running) => Some(running.task_id.clone()),
        Slot::Idle => None,
    };
    Json(agency_core::WorkerStatus {
        kind: state.agent_kind(),
        version: state.config.version.clone(),
        state: state.public_state(&slot),
        uptime_secs: state.uptime_secs(),
        current_task_preview: preview,
        tiers: state.config.tiers.clone(),
    })
}

pub async fn submit_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitTaskRequest>,
) -> Result<(StatusCode, Json<SubmitTaskResponse>), ApiError> {
    if !state.booted.load(std::sync::atomic::Ordering::SeqCst) {
        return Err(TaskError::new(ErrorKind::Starting, "worker is still starting up").into());
    }
    if req.prompt.trim().is_empty() {
        return Err(TaskError::new(ErrorKind::ValidationError, "prompt must not be empty").into());
    }

    let session_id = match req.session_id {
        Some(raw) => SessionId::parse(&raw)?,
        None => SessionId::generate(),
    };

    let mut slot = state.slot.lock().await;
    if !matches!(*slot, Slot::Idle) {
        let current = match &*slot {
            Slot::Working(r) | Slot::Cancelling(r) => r.task_id.clone(),
            Slot::Idle => unreachable!(),
        };
        return Err(TaskError::new(ErrorKind::AgentBusy, format!("slot occupied by task {current}")).into());
    }

    let model = state
        .config
        .tiers
        .resolve(req.model.as_deref(), req.tier.unwrap_or_default())
        .unwrap_or_else(|| "default".to_string());

    let agency_prompt = state
        .prompt_loader
        .assemble(state.agent_kind(), state.config.prompt_mode, &req.prompt)
        .map_err(ApiError::from)?;

    let task = Task {
        task_id: agency_core::TaskId::new(),
        session_id: session_id.clone(),
        prompt: agency_prompt,
        model,
        timeout_secs: req.timeout_seconds.unwrap_or(600),
        started_at_ms: now_ms(),
        ended_at_ms: None,
        state: TaskState::Working,
        exit_code: None,
        output: String::new(),
        error: None,
        usage: None,
        cost_usd: None,
        resume_attempts: 0,
    };

    let running = Arc::new(RunningTask::new(task.task_id.as_str().to_string()));
    *slot = Slot::Working(running.clone());
    drop(slot);

    *state.last_task.lock() = Some(task.clone());
    let response = SubmitTaskResponse { task_id: task.task_id.as_str().to_string(), session_id: session_id.as_str().to_string() };
    tokio::spawn(executor::run_task(state.clone(), task, running, false));

    Ok((StatusCode::CREATED, Json(response)))
}

/// Looks up a task by id, preferring the live `last_task` slot and falling
/// back to the persisted history outline once a newer task has overwritten
/// it. Only 404s if the id is unknown to both (spec §4.2: "404 if id unknown
/// and not in history").
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if let Some(task) = state.last_task.lock().clone() {
        if task.task_id.as_str() == task_id {
            return Ok(Json(serde_json::to_value(task).map_err(|e| {
                TaskError::new(ErrorKind::InternalError, e.to_string())
            })?));
        }
    }

    let outline = state.history.lock().get(&task_id).cloned();
    if let Some(outline) = outline {
        return Ok(Json(serde_json::to_value(outline).map_err(|e| {
            TaskError::new(ErrorKind::InternalError, e.to_string())
        })?));
    }

    Err(TaskError::new(ErrorKind::NotFound, format!("task {task_id} not found")).into())
}

pub async fn cancel_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Json<CancelResponse>, ApiError> {
    let slot = state.slot.lock().await;
    match &*slot {
        Slot::Working(running) if running.task_id == task_id => {
            running.cancel_token.cancel();
            Ok(Json(CancelResponse { task_id, accepted: true }))
        }
        Slot::Cancelling(running) if running.task_id == task_id => {
            Ok(Json(CancelResponse { task_id, accepted: true }))
        }
        _ => Err(TaskError::new(ErrorKind::AlreadyCompleted, format!("task {task_id} is not in progress")).into()),
    }
}

pub async fn list_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<agency_history::Page>, ApiError> {
    let page = query.page.unwrap_or(0);
    let limit = query.limit.unwrap_or(20);
    if limit == 0 || limit > 1000 {
        return Err(TaskError::new(ErrorKind::ValidationError, "limit must be between 1 and 1000").into());
    }
    let history = state.history.lock();
    Ok(Json(history.list(page, limit)))
}

pub async fn get_outline(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Json<agency_core::TaskOutline>, ApiError> {
    let history = state.history.lock();
    history
        .get(&task_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| TaskError::new(ErrorKind::NotFound, format!("no outline for task {task_id}")).into())
}

pub async fn get_debug(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Vec<u8>, ApiError> {
    let bytes = {
        let history = state.history.lock();
        history.get_debug(&task_id).map_err(|e| TaskError::new(ErrorKind::InternalError, e.to_string()))?
    };
    bytes.ok_or_else(|| TaskError::new(ErrorKind::NotFound, format!("no debug payload for task {task_id}")).into())
}

pub async fn shutdown(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ShutdownRequest>,
) -> Result<Json<ShutdownResponse>, ApiError> {
    let slot = state.slot.lock().await;
    let busy = !matches!(*slot, Slot::Idle);
    if busy && !req.force {
        return Err(TaskError::new(ErrorKind::TaskInProgress, "a task is in progress; pass force to override").into());
    }
    if let Slot::Working(running) | Slot::Cancelling(running) = &*slot {
        running.cancel_token.cancel();
    }
    drop(slot);
    state.shutdown_token.cancel();
    Ok(Json(ShutdownResponse { accepted: true }))
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
