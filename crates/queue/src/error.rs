// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Error taxonomy for the durable work queue.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue is full ({pending}/{max_size} pending entries)")]
    Full { pending: usize, max_size: usize },
    #[error("queue entry {0} not found")]
    NotFound(String),
    #[error("i/o error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("malformed queue entry at {path}: {source}")]
    Json { path: PathBuf, source: serde_json::Error },
}
