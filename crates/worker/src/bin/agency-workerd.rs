// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! `agency-workerd`: one worker process per agent instance (spec §4.2).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use agency_core::{AgentKind, Tier};
use agency_runner::runner_for;
use agency_worker::{AppState, WorkerConfig};
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "agency-workerd", version, about = "Agency CLI-runner worker")]
struct Args {
    /// Which CLI this worker drives.
    #[arg(long, value_enum)]
    agent: AgentKindArg,

    /// Stable name for this worker instance, used in logs and history paths.
    #[arg(long)]
    name: String,

    /// Address to bind the HTTP server to.
    #[arg(long, default_value = "127.0.0.1:0")]
    bind: SocketAddr,

    /// Root directory for per-session working directories.
    #[arg(long, default_value = "./data/sessions")]
    session_root: PathBuf,

    /// Root directory for the durable history store.
    #[arg(long, default_value = "./data/history")]
    history_root: PathBuf,

    /// Directory containing `<agent>-prod.md` / `<agent>-dev.md` prompt files.
    #[arg(long, default_value = "./prompts")]
    prompts_dir: PathBuf,

    /// Load the `-dev` prompt variant instead of `-prod`.
    #[arg(long)]
    dev_prompts: bool,

    /// `tier=model` pairs, e.g. `--tier standard=claude-opus-4 --tier fast=claude-haiku-4`.
    #[arg(long = "tier", value_parser = parse_tier)]
    tiers: Vec<(String, String)>,

    /// Maximum turns per CLI invocation before auto-resume kicks in.
    #[arg(long, default_value_t = 50)]
    max_turns: u32,

    /// Additional auto-resume attempts after the first invocation.
    #[arg(long, default_value_t = 2)]
    resume_max_attempts: u32,

    /// Log file directory; stdout is always logged to in addition.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum AgentKindArg {
    Claude,
    Codex,
}

impl From<AgentKindArg> for AgentKind {
    fn from(value: AgentKindArg) -> Self {
        match value {
            AgentKindArg::Claude => AgentKind::Claude,
            AgentKindArg::Codex => AgentKind::Codex,
        }
    }
}

fn parse_tier(raw: &str) -> Result<(String, String), String> {
    let (tier, model) = raw.split_once('=').ok_or_else(|| format!("expected tier=model, got '{raw}'"))?;
    tier.parse::<Tier>().map_err(|e| e.to_string())?;
    Ok((tier.to_string(), model.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_tracing(args.log_dir.as_deref(), &args.name);

    let agent_kind: AgentKind = args.agent.into();
    let mut config = WorkerConfig::new(agent_kind, args.name.clone(), args.bind);
    config.session_root = args.session_root;
    config.history_root = args.history_root;
    config.prompts_dir = args.prompts_dir;
    config.prompt_mode = if args.dev_prompts { agency_worker::PromptMode::Dev } else { agency_worker::PromptMode::Prod };
    config.max_turns = args.max_turns;
    config.resume_max_attempts = args.resume_max_attempts;
    for (tier, model) in args.tiers {
        config.tiers.0.insert(tier, model);
    }

    let runner = runner_for(agent_kind, config.session_root.clone());
    let history = agency_history::HistoryStore::open_with_retention(
        &config.history_root,
        &config.agent_name,
        config.outline_retention,
        config.debug_retention,
    )
    .context("opening history store")?;

    let bind_addr = config.bind_addr;
    let state = Arc::new(AppState::new(config, runner, history));
    agency_worker::boot(&state).await.context("worker boot checks failed")?;

    let router = agency_worker::build_router(state.clone());
    let listener = tokio::net::TcpListener::bind(bind_addr).await.context("binding HTTP listener")?;
    tracing::info!(addr = %listener.local_addr().context("listener addr")?, agent = %state.agent_kind(), "agency-workerd listening");

    let shutdown_token = state.shutdown_token.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = shutdown_token.cancelled() => {}
                _ = shutdown_signal() => { shutdown_token.cancel(); }
            }
            tracing::info!("agency-workerd draining");
        })
        .await
        .context("HTTP server error")?;

    Ok(())
}

// SIGTERM installation only fails if the handler is already registered elsewhere in-process.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};
    let mut sigterm = signal(SignalKind::terminate()).expect("installing SIGTERM handler");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

fn init_tracing(log_dir: Option<&std::path::Path>, name: &str) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, format!("{name}.log"));
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);
            tracing_subscriber::registry().with(env_filter).with(stdout_layer).with(file_layer).init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(env_filter).with(stdout_layer).init();
            None
        }
    }
}
