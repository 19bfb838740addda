// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! `agency-schedulerd`: fires cron jobs into the control plane's queue
//! (spec §4.8).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use agency_scheduler::{load_jobs_file, register_all, AppState, JobStore, Scheduler, SchedulerConfig};
use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "agency-schedulerd", version, about = "Agency cron scheduler")]
struct Args {
    /// JSON file of job templates to load at startup.
    #[arg(long)]
    jobs_file: PathBuf,

    /// Base URL of the control plane's queue API.
    #[arg(long)]
    director_url: String,

    /// Address to bind the `GET /status` HTTP server to.
    #[arg(long, default_value = "127.0.0.1:0")]
    bind: SocketAddr,

    /// Cron tick cadence in seconds (spec §4.8 "every 30s or finer").
    #[arg(long, default_value_t = 30)]
    tick_seconds: u64,

    /// Log file directory; stdout is always logged to in addition.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_tracing(args.log_dir.as_deref());

    let jobs = Arc::new(JobStore::new());
    let now_ms = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap_or_default().as_millis() as u64;
    let loaded = load_jobs_file(&args.jobs_file).context("loading jobs file")?;
    register_all(&jobs, loaded, now_ms).context("registering jobs")?;

    let mut config = SchedulerConfig::new(args.director_url);
    config.tick_interval = std::time::Duration::from_secs(args.tick_seconds);
    let scheduler = Arc::new(Scheduler::new(jobs.clone(), config));

    let cancel = CancellationToken::new();
    let tick_loop = {
        let scheduler = scheduler.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { scheduler.run(cancel).await })
    };

    let state = Arc::new(AppState::new(jobs));
    let router = agency_scheduler::router::build_router(state);
    let listener = tokio::net::TcpListener::bind(args.bind).await.context("binding HTTP listener")?;
    tracing::info!(addr = %listener.local_addr().context("listener addr")?, "agency-schedulerd listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    cancel.cancel();
    let _ = tick_loop.await;
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

fn init_tracing(log_dir: Option<&std::path::Path>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "agency-schedulerd.log");
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
