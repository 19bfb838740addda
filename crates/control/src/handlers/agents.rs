// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! `GET /api/agents` (spec §4.9).

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::dto::AgentsResponse;
use crate::state::AppState;

pub async fn list_agents(State(state): State<Arc<AppState>>) -> Json<AgentsResponse> {
    Json(AgentsResponse { agents: state.discovery.snapshot() })
}
