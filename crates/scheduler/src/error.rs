// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Scheduler error taxonomy.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid cron expression '{expr}': {source}")]
    InvalidCron { expr: String, source: cron::error::Error },

    #[error("a job named '{0}' already exists")]
    Duplicate(String),
}
