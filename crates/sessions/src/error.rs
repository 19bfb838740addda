// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Error taxonomy for the session store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unknown session '{0}'")]
    NotFound(String),
    #[error("no task '{task_id}' in session '{session_id}'")]
    TaskNotFound { session_id: String, task_id: String },
}
