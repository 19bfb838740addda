// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! `agency submit` - enqueue a new task (spec §6 "Submission format").

use agency_core::{AgentKind, SessionId, SubmissionRequest, SubmissionSource, Tier};
use anyhow::Result;
use clap::Args;
use std::collections::HashMap;

use crate::client::Client;
use crate::output::{format_or_json, OutputFormat};

#[derive(Args)]
pub struct SubmitArgs {
    /// Prompt text to send to the agent
    pub prompt: String,
    /// Agent kind to run it on
    #[arg(long, value_enum, default_value = "claude")]
    pub agent: AgentArg,
    /// Size tier (fast, standard, heavy)
    #[arg(long)]
    pub tier: Option<String>,
    /// Explicit model override
    #[arg(long)]
    pub model: Option<String>,
    /// Timeout in seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,
    /// Attach to an existing session
    #[arg(long)]
    pub session: Option<String>,
    /// Environment variable overrides (can be repeated: --env key=value)
    #[arg(long = "env", value_parser = parse_key_value)]
    pub env: Vec<(String, String)>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum AgentArg {
    Claude,
    Codex,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=').map(|(k, v)| (k.to_string(), v.to_string())).ok_or_else(|| format!("invalid key=value pair: '{s}'"))
}

pub async fn handle(args: SubmitArgs, client: &Client, format: OutputFormat) -> Result<()> {
    let tier = args.tier.as_deref().map(str::parse::<Tier>).transpose().map_err(|e| anyhow::anyhow!(e.message))?;
    let agent_kind = match args.agent {
        AgentArg::Claude => AgentKind::Claude,
        AgentArg::Codex => AgentKind::Codex,
    };
    let session_id = args.session.map(|s| SessionId::parse(&s)).transpose().map_err(|e| anyhow::anyhow!(e.message))?;
    let request = SubmissionRequest {
        prompt: args.prompt,
        tier,
        model: args.model,
        timeout_seconds: args.timeout_seconds,
        session_id,
        agent_kind,
        env: args.env.into_iter().collect::<HashMap<_, _>>(),
        source: SubmissionSource::Cli,
        source_job: None,
    };

    let response = client.submit(&request).await?;
    format_or_json(format, &response, || {
        let queue_id = response["queue_id"].as_str().unwrap_or("?");
        let position = response["position"].as_u64().unwrap_or(0);
        println!("Submitted {queue_id} (position {position})");
    })
}
