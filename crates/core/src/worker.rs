// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Worker identifier and state types (spec §3 "Worker (Agent)").

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

crate::define_id! {
    /// Unique identifier for a worker instance.
    pub struct WorkerId("wkr-");
}

/// Identifier of the underlying CLI (`claude`, `codex`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Claude,
    Codex,
}

impl AgentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Claude => "claude",
            AgentKind::Codex => "codex",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AgentKind {
    type Err = crate::error::TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "claude" => Ok(AgentKind::Claude),
            "codex" => Ok(AgentKind::Codex),
            other => Err(crate::error::TaskError::new(
                crate::error::ErrorKind::ValidationError,
                format!("unknown agent_kind '{other}', expected 'claude' or 'codex'"),
            )),
        }
    }
}

/// Abstract size class mapped per-kind to a concrete model name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Fast,
    Standard,
    Heavy,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Fast => "fast",
            Tier::Standard => "standard",
            Tier::Heavy => "heavy",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Tier {
    fn default() -> Self {
        Tier::Standard
    }
}

impl std::str::FromStr for Tier {
    type Err = crate::error::TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fast" => Ok(Tier::Fast),
            "standard" => Ok(Tier::Standard),
            "heavy" => Ok(Tier::Heavy),
            other => Err(crate::error::TaskError::new(
                crate::error::ErrorKind::ValidationError,
                format!("unknown tier '{other}'"),
            )),
        }
    }
}

/// Per-kind tier→model resolution table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierMap(pub HashMap<String, String>);

impl TierMap {
    /// Resolve the effective model: explicit override, else `tiers[tier]`,
    /// else `tiers["standard"]` (spec §4.2 "Model resolution").
    pub fn resolve(&self, explicit: Option<&str>, tier: Tier) -> Option<String> {
        if let Some(model) = explicit {
            return Some(model.to_string());
        }
        self.0.get(tier.as_str()).or_else(|| self.0.get("standard")).cloned()
    }
}

/// Lifecycle state of a worker (spec §4.2 state machine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    Starting,
    Idle,
    Working,
    Cancelling,
}

impl WorkerState {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkerState::Starting => "starting",
            WorkerState::Idle => "idle",
            WorkerState::Working => "working",
            WorkerState::Cancelling => "cancelling",
        }
    }

    /// Whether the worker can accept a new task under single-task admission.
    pub fn accepts_task(self) -> bool {
        matches!(self, WorkerState::Idle)
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discovered worker's current status, as returned by `GET /status`
/// and consumed by the dispatcher/discovery/session store (spec §3, §4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerStatus {
    pub kind: AgentKind,
    pub version: String,
    pub state: WorkerState,
    pub uptime_secs: u64,
    pub current_task_preview: Option<String>,
    pub tiers: TierMap,
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
