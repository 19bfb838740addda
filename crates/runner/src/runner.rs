// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! The [`CliRunner`] trait: one implementation per supported agent CLI
//! (spec §4.1 "CLI Runner").

use agency_core::AgentKind;
use async_trait::async_trait;

use crate::{ChildProcess, RunnerError, RunnerTaskSpec, StreamEvent};

/// Adapts a concrete agent CLI (`claude`, `codex`) to a uniform spawn +
/// parse contract. Implementations own argument construction and the
/// per-CLI JSON event shape; everything else (admission, cancellation
/// escalation, history recording) lives above this trait in the worker
/// crate.
#[async_trait]
pub trait CliRunner: Send + Sync {
    /// Which agent this runner drives.
    fn kind(&self) -> AgentKind;

    /// Binary name or path this runner will exec, used for the startup
    /// resolvability check (spec §4.2 "`starting` -> `idle`").
    fn binary_name(&self) -> &str;

    /// Build the child's argv for a task, given the binary resolved on PATH.
    fn build_args(&self, task: &RunnerTaskSpec) -> Vec<String>;

    /// Default session storage directory for a new session id, used when the
    /// caller didn't supply one (spec §4.1 "Session directories").
    fn default_session_dir(&self, session_id: &str) -> std::path::PathBuf;

    /// Spawn the child for `task`. The caller drives the returned
    /// [`ChildProcess`]'s `next_line`/`wait` loop and classifies events with
    /// [`Self::parse_event`].
    async fn spawn(&self, task: &RunnerTaskSpec) -> Result<ChildProcess, RunnerError>;

    /// Parse one line of the child's stdout protocol.
    fn parse_event(&self, line: &str) -> StreamEvent {
        crate::event::parse_event(line)
    }
}
