// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Spawned-child handle.
//!
//! Every CLI child is placed in its own process group (`setsid`-equivalent
//! via `process_group(0)`) so cancellation can signal the whole subtree —
//! a CLI often forks helper processes that would otherwise survive a
//! single-pid `kill`.

use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout};

use crate::RunnerError;

/// A live child process plus the handles needed to stream its stdout and
/// later signal its process group.
pub struct ChildProcess {
    child: Child,
    pgid: i32,
    lines: Lines<BufReader<ChildStdout>>,
}

impl ChildProcess {
    /// Spawn `command` with piped stdio in its own process group. Exposed so
    /// test-only `CliRunner` implementations outside this crate can build a
    /// [`ChildProcess`] from an arbitrary command without re-deriving the
    /// process-group/stdio setup.
    pub fn spawn(mut command: tokio::process::Command) -> Result<Self, RunnerError> {
        command.process_group(0);
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());
        command.stdin(Stdio::null());

        let mut child = command.spawn().map_err(RunnerError::Spawn)?;
        let pid = child.id().ok_or(RunnerError::NoPid)? as i32;
        let stdout = child.stdout.take().ok_or(RunnerError::NoPid)?;
        let lines = BufReader::new(stdout).lines();

        Ok(Self { child, pgid: pid, lines })
    }

    /// Process group id to signal on cancellation.
    pub fn pgid(&self) -> i32 {
        self.pgid
    }

    /// Read the next line of stdout, or `None` at EOF.
    pub async fn next_line(&mut self) -> Result<Option<String>, RunnerError> {
        self.lines.next_line().await.map_err(RunnerError::Io)
    }

    /// Wait for the child to exit and return its status code (spec's
    /// "truncated outcome" path reads this when stdout closed without a
    /// terminal `result` event).
    pub async fn wait(&mut self) -> Result<Option<i32>, RunnerError> {
        let status = self.child.wait().await.map_err(RunnerError::Io)?;
        Ok(status.code())
    }
}
