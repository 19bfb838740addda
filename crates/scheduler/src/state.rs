// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Shared state for the scheduler's own `GET /status` endpoint.

use std::sync::Arc;

use crate::store::JobStore;

pub struct AppState {
    pub jobs: Arc<JobStore>,
}

impl AppState {
    pub fn new(jobs: Arc<JobStore>) -> Self {
        Self { jobs }
    }
}
