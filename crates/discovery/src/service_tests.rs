// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

use super::*;
use agency_core::TierMap;
use axum::routing::get;
use axum::{Json, Router};
use std::collections::HashMap;
use std::sync::Arc as StdArc;
use std::time::Duration as StdDuration;
use tokio::net::TcpListener;

async fn spawn_fake_worker(kind: AgentKind, state: WorkerState) -> (u16, tokio::task::JoinHandle<()>) {
    let status = WorkerStatus {
        kind,
        version: "test".to_string(),
        state,
        uptime_secs: 1,
        current_task_preview: None,
        tiers: TierMap(HashMap::new()),
    };
    let router = Router::new().route("/status", get(move || { let status = status.clone(); async move { Json(status) } }));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake worker");
    let port = listener.local_addr().expect("local addr").port();
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    // Give the listener a moment to start accepting.
    tokio::time::sleep(StdDuration::from_millis(20)).await;
    (port, handle)
}

fn test_config() -> DiscoveryConfig {
    DiscoveryConfig {
        host: "127.0.0.1".to_string(),
        port_range: 0..=0,
        failure_threshold: 3,
        sweep_interval: StdDuration::from_secs(30),
        working_poll_interval: StdDuration::from_millis(10),
        idle_poll_interval: StdDuration::from_millis(50),
        probe_timeout: StdDuration::from_millis(500),
        tick_interval: StdDuration::from_millis(10),
    }
}

#[tokio::test]
async fn probe_records_success_for_a_live_worker() {
    let (port, _handle) = spawn_fake_worker(AgentKind::Claude, WorkerState::Idle).await;
    let discovery = Discovery::new(test_config());

    let ok = discovery.probe(port, 1_000).await;

    assert!(ok);
    let record = discovery.get(port).expect("record present");
    assert_eq!(record.consecutive_failures, 0);
    assert_eq!(record.last_seen_ms, Some(1_000));
    assert_eq!(record.status.expect("status").state, WorkerState::Idle);
}

#[tokio::test]
async fn probe_records_failure_for_a_closed_port() {
    let discovery = Discovery::new(test_config());

    // Port 1 is privileged/closed in virtually any sandbox; treat it as a
    // guaranteed-closed loopback port for this test.
    let ok = discovery.probe(1, 1_000).await;

    assert!(!ok);
    let record = discovery.get(1).expect("record present after failure");
    assert_eq!(record.consecutive_failures, 1);
    assert!(record.status.is_none());
}

#[tokio::test]
async fn repeated_failures_mark_a_worker_unreachable() {
    let discovery = Discovery::new(test_config());

    for _ in 0..3 {
        discovery.probe(1, 1_000).await;
    }

    let record = discovery.get(1).expect("record present");
    assert!(record.is_unreachable(3));
}

#[tokio::test]
async fn a_later_success_resets_the_failure_counter() {
    let (port, _handle) = spawn_fake_worker(AgentKind::Codex, WorkerState::Idle).await;
    let discovery = Discovery::new(test_config());

    discovery.probe(port, 1_000).await;
    discovery.probe(port, 2_000).await;

    let record = discovery.get(port).expect("record present");
    assert_eq!(record.consecutive_failures, 0);
}

#[tokio::test]
async fn sweep_discovers_every_port_in_range() {
    let (port_a, _handle_a) = spawn_fake_worker(AgentKind::Claude, WorkerState::Idle).await;
    let mut config = test_config();
    config.port_range = port_a..=port_a;
    let discovery = Discovery::new(config);

    discovery.sweep(1_000).await;

    assert_eq!(discovery.snapshot().len(), 1);
    assert!(discovery.get(port_a).is_some());
}

#[tokio::test]
async fn healthy_idle_workers_filters_by_kind_and_state() {
    let (idle_port, _h1) = spawn_fake_worker(AgentKind::Claude, WorkerState::Idle).await;
    let (working_port, _h2) = spawn_fake_worker(AgentKind::Claude, WorkerState::Working).await;
    let discovery = Discovery::new(test_config());

    discovery.probe(idle_port, 1_000).await;
    discovery.probe(working_port, 1_000).await;

    let idle = discovery.healthy_idle_workers(AgentKind::Claude);
    assert_eq!(idle.len(), 1);
    assert_eq!(idle[0].0, idle_port);
}

#[tokio::test]
async fn healthy_idle_workers_excludes_unreachable_ports() {
    let discovery = StdArc::new(Discovery::new(test_config()));
    for _ in 0..3 {
        discovery.probe(1, 1_000).await;
    }

    assert!(discovery.healthy_idle_workers(AgentKind::Claude).is_empty());
    assert!(!discovery.is_present_and_healthy(1));
}

#[tokio::test]
async fn is_present_and_healthy_is_true_for_a_freshly_seen_worker() {
    let (port, _handle) = spawn_fake_worker(AgentKind::Codex, WorkerState::Idle).await;
    let discovery = Discovery::new(test_config());

    discovery.probe(port, 1_000).await;

    assert!(discovery.is_present_and_healthy(port));
}

#[tokio::test]
async fn run_loop_stops_promptly_on_cancellation() {
    let discovery = StdArc::new(Discovery::new(test_config()));
    let cancel = CancellationToken::new();
    let child = cancel.clone();

    let handle = tokio::spawn(async move { discovery.run(child).await });
    cancel.cancel();

    tokio::time::timeout(StdDuration::from_secs(1), handle).await.expect("loop exits promptly").expect("no panic");
}

#[tokio::test]
async fn snapshot_is_sorted_by_port() {
    let (port_a, _h1) = spawn_fake_worker(AgentKind::Claude, WorkerState::Idle).await;
    let (port_b, _h2) = spawn_fake_worker(AgentKind::Claude, WorkerState::Idle).await;
    let discovery = Discovery::new(test_config());

    let (lo, hi) = if port_a < port_b { (port_a, port_b) } else { (port_b, port_a) };
    discovery.probe(hi, 1_000).await;
    discovery.probe(lo, 1_000).await;

    let ports: Vec<u16> = discovery.snapshot().iter().map(|r| r.port).collect();
    assert_eq!(ports, vec![lo, hi]);
}
