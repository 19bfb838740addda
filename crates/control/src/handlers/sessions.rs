// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! `GET /api/sessions` and session archival (spec §4.9, §4.7).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::dto::{ArchiveResponse, SessionsResponse};
use crate::error_response::ApiError;
use crate::state::AppState;
use crate::time::now_ms;

pub async fn list_sessions(State(state): State<Arc<AppState>>) -> Json<SessionsResponse> {
    Json(SessionsResponse { sessions: state.sessions.get_all() })
}

pub async fn archive_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<ArchiveResponse>, ApiError> {
    state.sessions.archive(&session_id, now_ms())?;
    Ok(Json(ArchiveResponse { session_id, archived: true }))
}
