// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Error taxonomy shared across the workspace.
//!
//! `ErrorKind` is the stable, wire-visible classification from spec §6/§7;
//! each HTTP surface maps it to a status code via [`ErrorKind::http_status`]
//! rather than re-deriving the mapping ad hoc per handler.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable error kind exposed to callers.
///
/// Serializes as the lowercase snake_case tag used in the `{"error": "..."}`
/// envelope (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ValidationError,
    NotFound,
    AgentBusy,
    TaskInProgress,
    AlreadyCompleted,
    QueueFull,
    RateLimited,
    Timeout,
    ClaudeError,
    CodexError,
    InternalError,
    SandboxError,
    /// Exhausted all auto-resume attempts without a terminal `result` event
    /// (spec §4.2 "Auto-resume on turn-limit exhaustion"). Not in spec.md's
    /// canonical status-mapping table; resolved in DESIGN.md's Open
    /// Question log as a 400, non-retryable kind — retrying the identical
    /// oversized task would just exhaust turns again.
    MaxTurns,
    /// Worker hasn't finished booting yet (spec §4.2's `POST /task` 503
    /// case). Also not in the canonical table; resolved alongside
    /// `MaxTurns` as a 503, retryable kind.
    Starting,
}

impl ErrorKind {
    /// HTTP status code this kind maps to (spec §6's status-mapping table).
    pub fn http_status(self) -> u16 {
        match self {
            ErrorKind::ValidationError | ErrorKind::MaxTurns => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::AgentBusy | ErrorKind::TaskInProgress | ErrorKind::AlreadyCompleted => 409,
            ErrorKind::QueueFull | ErrorKind::Starting => 503,
            ErrorKind::RateLimited => 429,
            ErrorKind::Timeout => 504,
            ErrorKind::ClaudeError | ErrorKind::CodexError => 502,
            ErrorKind::InternalError | ErrorKind::SandboxError => 500,
        }
    }

    /// Whether a caller should retry this error (spec §7's propagation policy).
    pub fn retryable(self) -> bool {
        matches!(
            self,
            ErrorKind::AgentBusy
                | ErrorKind::Starting
                | ErrorKind::QueueFull
                | ErrorKind::RateLimited
                | ErrorKind::Timeout
                | ErrorKind::ClaudeError
                | ErrorKind::CodexError
                | ErrorKind::InternalError
                | ErrorKind::SandboxError
        )
    }

    /// The wire tag used in the `"error"` field (snake_case, stable).
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "validation_error",
            ErrorKind::MaxTurns => "max_turns",
            ErrorKind::Starting => "starting",
            ErrorKind::NotFound => "not_found",
            ErrorKind::AgentBusy => "agent_busy",
            ErrorKind::TaskInProgress => "task_in_progress",
            ErrorKind::AlreadyCompleted => "already_completed",
            ErrorKind::QueueFull => "queue_full",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Timeout => "timeout",
            ErrorKind::ClaudeError => "claude_error",
            ErrorKind::CodexError => "codex_error",
            ErrorKind::InternalError => "internal_error",
            ErrorKind::SandboxError => "sandbox_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured, classified task error (spec §3: `Task.error`).
///
/// Carries enough to reconstruct the `{error, message, details}` envelope
/// without ever forwarding raw child stderr past the worker boundary
/// (spec §7's propagation policy).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskError {
    pub kind: ErrorKind,
    pub message: String,
}

impl TaskError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    /// Truncate `message` to `max_len` bytes on a UTF-8 boundary, so a
    /// runaway child message can never blow up a history outline.
    pub fn bounded(kind: ErrorKind, message: &str, max_len: usize) -> Self {
        Self::new(kind, crate::id::short(message, max_len))
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for TaskError {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
