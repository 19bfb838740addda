// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Wire DTOs for dispatching against a worker's `POST /task` (spec §4.2, §4.5).

use agency_core::Tier;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Serialize)]
pub struct DispatchRequest<'a> {
    pub prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
    pub env: &'a HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct DispatchResponse {
    pub task_id: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct WorkerErrorEnvelope {
    pub error: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct TaskStatusResponse {
    pub state: String,
}
