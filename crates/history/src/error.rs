// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("io error at {path}: {source}")]
    Io { path: std::path::PathBuf, #[source] source: std::io::Error },
    #[error("failed to (de)serialize outline for {task_id}: {source}")]
    Json { task_id: String, #[source] source: serde_json::Error },
}
