// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Wire DTOs for the control plane's HTTP surface (spec §4.9, §6).
//!
//! Submission bodies reuse [`agency_core::SubmissionRequest`] directly: the
//! web, scheduler, and CLI callers all post the same canonical shape (spec
//! §6 "Submission format"), differing only in the `source`/`source_job`
//! fields they fill in.

use agency_core::{DiscoveryRecord, QueuedTask, Session};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct QueueSubmitResponse {
    pub queue_id: String,
    pub position: usize,
    pub state: &'static str,
}

#[derive(Debug, Serialize)]
pub struct QueueListResponse {
    pub depth: usize,
    pub oldest_age_ms: Option<u64>,
    pub dispatched_count: usize,
    pub entries: Vec<QueuedTask>,
}

#[derive(Debug, Serialize)]
pub struct QueueCancelResponse {
    pub queue_id: String,
    pub cancelled: bool,
}

#[derive(Debug, Serialize)]
pub struct AgentsResponse {
    pub agents: Vec<DiscoveryRecord>,
}

#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<Session>,
}

#[derive(Debug, Serialize)]
pub struct ArchiveResponse {
    pub session_id: String,
    pub archived: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: &'static str,
    pub message: String,
}
