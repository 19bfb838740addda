// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Wire types for submitting to the control plane and for this process's
//! own `GET /status` (spec §4.8, §6).

use agency_core::Job;
use serde::{Deserialize, Serialize};

/// Mirrors the control plane's queue-submit response (spec §6
/// "Queue-submit response (201)").
#[derive(Debug, Deserialize)]
pub struct QueueSubmitResponse {
    pub queue_id: String,
}

/// `GET /status` response body: one entry per configured job.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub jobs: Vec<Job>,
}
