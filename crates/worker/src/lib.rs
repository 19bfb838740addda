// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! The worker process: a single-task HTTP surface in front of one `claude`
//! or `codex` CLI binary (spec §4.2 "Worker").

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod config;
pub mod dto;
pub mod error_response;
pub mod executor;
pub mod handlers;
pub mod prompt;
pub mod router;
pub mod state;
pub mod time;

pub use config::{PromptMode, WorkerConfig};
pub use router::build_router;
pub use state::AppState;

use agency_core::{ErrorKind, TaskError};
use agency_runner::CliRunner;
use std::sync::Arc;
use tracing::info;

/// Runs config validation and CLI-binary resolvability checks, then flips
/// `AppState::booted` (spec §4.2 "`starting` -> `idle` requires config
/// validated and CLI binary resolvable"). Called once at process startup,
/// before the HTTP listener accepts traffic.
pub async fn boot(state: &Arc<AppState>) -> Result<(), TaskError> {
    if state.config.tiers.0.is_empty() {
        return Err(TaskError::new(ErrorKind::InternalError, "worker config has no tiers configured"));
    }
    resolve_binary(state.runner.as_ref())?;
    std::fs::create_dir_all(&state.config.session_root)
        .map_err(|e| TaskError::new(ErrorKind::InternalError, format!("cannot create session root: {e}")))?;

    state.mark_booted();
    info!(agent = %state.agent_kind(), "worker booted");
    Ok(())
}

/// Scans `$PATH` for `runner.binary_name()`, the same lookup the shell would
/// do before `exec`. An absolute/relative path with a separator is checked
/// directly instead.
fn resolve_binary(runner: &dyn CliRunner) -> Result<(), TaskError> {
    let name = runner.binary_name();
    let found = if name.contains(std::path::MAIN_SEPARATOR) {
        std::path::Path::new(name).is_file()
    } else {
        std::env::var_os("PATH")
            .map(|path| std::env::split_paths(&path).any(|dir| dir.join(name).is_file()))
            .unwrap_or(false)
    };
    if !found {
        return Err(TaskError::new(
            ErrorKind::InternalError,
            format!("CLI binary '{name}' not found on PATH"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agency_core::AgentKind;
    use agency_runner::ClaudeRunner;
    use tempfile::tempdir;

    #[tokio::test]
    async fn boot_fails_without_configured_tiers() {
        let dir = tempdir().expect("tempdir");
        let config = WorkerConfig::new(AgentKind::Claude, "claude-a", "127.0.0.1:0".parse().unwrap());
        let history = agency_history::HistoryStore::open(&dir.path().join("history"), &config.agent_name).expect("history");
        let runner = Box::new(ClaudeRunner::new(dir.path().join("sessions")).with_binary("sh"));
        let state = Arc::new(AppState::new(config, runner, history));

        let err = boot(&state).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InternalError);
    }

    #[tokio::test]
    async fn boot_fails_when_binary_is_not_on_path() {
        let dir = tempdir().expect("tempdir");
        let mut config = WorkerConfig::new(AgentKind::Claude, "claude-a", "127.0.0.1:0".parse().unwrap());
        config.tiers.0.insert("standard".to_string(), "claude-opus-4".to_string());
        let history = agency_history::HistoryStore::open(&dir.path().join("history"), &config.agent_name).expect("history");
        let runner = Box::new(ClaudeRunner::new(dir.path().join("sessions")).with_binary("agency-definitely-not-a-real-binary"));
        let state = Arc::new(AppState::new(config, runner, history));

        let err = boot(&state).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InternalError);
        assert!(!state.booted.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn boot_succeeds_and_marks_state_booted() {
        let dir = tempdir().expect("tempdir");
        let mut config = WorkerConfig::new(AgentKind::Claude, "claude-a", "127.0.0.1:0".parse().unwrap());
        config.tiers.0.insert("standard".to_string(), "claude-opus-4".to_string());
        config.session_root = dir.path().join("sessions");
        let history = agency_history::HistoryStore::open(&dir.path().join("history"), &config.agent_name).expect("history");
        let runner = Box::new(ClaudeRunner::new(dir.path().join("sessions")).with_binary("sh"));
        let state = Arc::new(AppState::new(config, runner, history));

        boot(&state).await.expect("boots");
        assert!(state.booted.load(std::sync::atomic::Ordering::SeqCst));
    }
}
