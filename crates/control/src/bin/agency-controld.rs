// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! `agency-controld`: the control plane process — work queue, discovery,
//! session store, and dispatcher behind one HTTP surface (spec §4.9).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use agency_control::{build_router, AppState, ControlConfig};
use agency_discovery::{Discovery, DiscoveryConfig};
use agency_dispatcher::{Dispatcher, DispatcherConfig};
use agency_queue::WorkQueue;
use agency_sessions::SessionStore;
use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "agency-controld", version, about = "Agency control plane")]
struct Args {
    /// Address to bind the HTTP server to.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Root directory for the durable work queue.
    #[arg(long, default_value = "./data/queue")]
    queue_root: PathBuf,

    /// Maximum number of pending entries the queue will hold.
    #[arg(long, default_value_t = 1000)]
    max_queue_size: usize,

    /// Loopback address workers bind to.
    #[arg(long, default_value = "127.0.0.1")]
    discovery_host: String,

    /// First port of the inclusive discovery scan range.
    #[arg(long, default_value_t = 9000)]
    discovery_port_start: u16,

    /// Last port of the inclusive discovery scan range.
    #[arg(long, default_value_t = 9099)]
    discovery_port_end: u16,

    /// Base URL of a standalone `agency-schedulerd` instance, if any, so
    /// `GET /api/scheduler/jobs` can proxy to it.
    #[arg(long)]
    scheduler_url: Option<String>,

    /// Log file directory; stdout is always logged to in addition.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_tracing(args.log_dir.as_deref());

    let mut config = ControlConfig::new(args.bind);
    config.queue_root = args.queue_root;
    config.max_queue_size = args.max_queue_size;
    config.discovery_host = args.discovery_host.clone();
    config.discovery_port_range = args.discovery_port_start..=args.discovery_port_end;
    config.scheduler_url = args.scheduler_url;

    let queue = Arc::new(WorkQueue::open(config.queue_root.clone(), config.max_queue_size).context("opening work queue")?);
    let discovery = Arc::new(Discovery::new(DiscoveryConfig {
        host: config.discovery_host.clone(),
        port_range: config.discovery_port_range.clone(),
        ..DiscoveryConfig::default()
    }));
    let sessions = Arc::new(SessionStore::new());
    let dispatcher = Arc::new(Dispatcher::new(queue.clone(), discovery.clone(), sessions.clone(), DispatcherConfig::default()));

    let cancel = CancellationToken::new();
    let dispatcher_task = tokio::spawn({
        let dispatcher = dispatcher.clone();
        let cancel = cancel.clone();
        async move { dispatcher.run(cancel).await }
    });
    let discovery_task = tokio::spawn({
        let discovery = discovery.clone();
        let cancel = cancel.clone();
        async move { discovery.run(cancel).await }
    });

    let bind_addr = config.bind_addr;
    let state = Arc::new(AppState::new(config, queue, discovery, sessions, dispatcher));
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr).await.context("binding HTTP listener")?;
    tracing::info!(addr = %listener.local_addr().context("listener addr")?, "agency-controld listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    cancel.cancel();
    let _ = tokio::join!(dispatcher_task, discovery_task);

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
    tracing::info!("agency-controld draining");
}

fn init_tracing(log_dir: Option<&std::path::Path>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "agency-controld.log");
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
