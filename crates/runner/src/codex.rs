// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! `codex` CLI runner.

use agency_core::AgentKind;
use async_trait::async_trait;
use std::path::PathBuf;

use crate::{ChildProcess, CliRunner, RunnerError, RunnerTaskSpec};

/// Drives the `codex` CLI in streaming-JSON mode. Codex uses
/// `thread.started`/`turn.started` in place of Claude's `system/init`
/// (spec §4.1's event-shape table).
pub struct CodexRunner {
    binary: String,
    session_root: PathBuf,
}

impl CodexRunner {
    pub fn new(session_root: PathBuf) -> Self {
        Self { binary: "codex".to_string(), session_root }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }
}

#[async_trait]
impl CliRunner for CodexRunner {
    fn kind(&self) -> AgentKind {
        AgentKind::Codex
    }

    fn binary_name(&self) -> &str {
        &self.binary
    }

    fn build_args(&self, task: &RunnerTaskSpec) -> Vec<String> {
        let mut args = vec!["exec".to_string(), "--json".to_string()];
        if task.resuming {
            args.push("resume".to_string());
            args.push(task.session_id.clone());
        } else {
            args.push("--thread-id".to_string());
            args.push(task.session_id.clone());
        }
        if let Some(model) = &task.model {
            args.push("--model".to_string());
            args.push(model.clone());
        }
        args.push(task.prompt.clone());
        args
    }

    fn default_session_dir(&self, session_id: &str) -> PathBuf {
        self.session_root.join(session_id)
    }

    async fn spawn(&self, task: &RunnerTaskSpec) -> Result<ChildProcess, RunnerError> {
        let mut command = tokio::process::Command::new(&self.binary);
        command.args(self.build_args(task));
        command.current_dir(&task.working_dir);
        for (key, value) in &task.env {
            command.env(key, value);
        }
        ChildProcess::spawn(command)
    }
}

#[cfg(test)]
#[path = "codex_tests.rs"]
mod tests;
