// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! `claude` CLI runner.

use agency_core::AgentKind;
use async_trait::async_trait;
use std::path::PathBuf;

use crate::{ChildProcess, CliRunner, RunnerError, RunnerTaskSpec};

/// Drives the `claude` CLI in streaming-JSON mode.
pub struct ClaudeRunner {
    binary: String,
    session_root: PathBuf,
}

impl ClaudeRunner {
    pub fn new(session_root: PathBuf) -> Self {
        Self { binary: "claude".to_string(), session_root }
    }

    /// Override the resolved binary path/name, e.g. for tests that stub
    /// a fake CLI.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }
}

#[async_trait]
impl CliRunner for ClaudeRunner {
    fn kind(&self) -> AgentKind {
        AgentKind::Claude
    }

    fn binary_name(&self) -> &str {
        &self.binary
    }

    fn build_args(&self, task: &RunnerTaskSpec) -> Vec<String> {
        let mut args = vec![
            "--output-format".to_string(),
            "stream-json".to_string(),
            "--print".to_string(),
            task.prompt.clone(),
        ];
        if task.resuming {
            args.push("--resume".to_string());
            args.push(task.session_id.clone());
        } else {
            args.push("--session-id".to_string());
            args.push(task.session_id.clone());
        }
        if let Some(model) = &task.model {
            args.push("--model".to_string());
            args.push(model.clone());
        }
        if let Some(max_turns) = task.max_turns {
            args.push("--max-turns".to_string());
            args.push(max_turns.to_string());
        }
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
#[path = "claude_tests.rs"]
mod tests;
