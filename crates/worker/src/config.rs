// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Worker runtime configuration (spec §4.2).

use agency_core::{AgentKind, TierMap};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Which prompt file variant to load (spec §4.2 "Prompt assembly").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    Prod,
    Dev,
}

impl PromptMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PromptMode::Prod => "prod",
            PromptMode::Dev => "dev",
        }
    }
}

impl Default for PromptMode {
    fn default() -> Self {
        PromptMode::Prod
    }
}

/// Static configuration for one worker process instance.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub agent_kind: AgentKind,
    pub agent_name: String,
    pub version: String,
    pub bind_addr: SocketAddr,
    pub session_root: PathBuf,
    pub history_root: PathBuf,
    pub prompts_dir: PathBuf,
    pub prompt_mode: PromptMode,
    pub tiers: TierMap,
    pub max_turns: u32,
    pub resume_max_attempts: u32,
    pub cancel_grace_period: Duration,
    pub outline_retention: usize,
    pub debug_retention: usize,
}

impl WorkerConfig {
    pub fn new(agent_kind: AgentKind, agent_name: impl Into<String>, bind_addr: SocketAddr) -> Self {
        Self {
            agent_kind,
            agent_name: agent_name.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            bind_addr,
            session_root: PathBuf::from("./sessions"),
            history_root: PathBuf::from("./history"),
            prompts_dir: PathBuf::from("./prompts"),
            prompt_mode: PromptMode::default(),
            tiers: TierMap(HashMap::new()),
            max_turns: 50,
            resume_max_attempts: 2,
            cancel_grace_period: Duration::from_secs(10),
            outline_retention: 100,
            debug_retention: 20,
        }
    }
}
