// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Input to a [`crate::CliRunner`] spawn call.

use std::collections::HashMap;
use std::path::PathBuf;

/// Fully-assembled task handed to a runner. Prompt assembly (system prompt +
/// user prompt, per spec §4.2) happens upstream in the worker crate; by the
/// time a [`RunnerTaskSpec`] exists it is just "run this".
#[derive(Debug, Clone)]
pub struct RunnerTaskSpec {
    pub prompt: String,
    pub model: Option<String>,
    pub session_id: String,
    /// Whether this is a resume of an existing session rather than a fresh one.
    pub resuming: bool,
    /// Exhausted-turns auto-resume counter (spec §4.2 "Auto-resume").
    pub resume_attempts: u32,
    pub max_turns: Option<u32>,
    pub env: HashMap<String, String>,
    pub timeout_secs: u64,
    pub working_dir: PathBuf,
}
