// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Errors a [`crate::CliRunner`] can surface before a task error is even
//! classified — spawn failures, missing binaries, i/o on the pipe.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to spawn child process: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("child process exposed no pid")]
    NoPid,
    #[error("i/o error on child stream: {0}")]
    Io(#[source] std::io::Error),
    #[error("signal delivery failed: {0}")]
    Signal(#[source] nix::Error),
}
