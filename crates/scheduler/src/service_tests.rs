// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

use super::*;
use agency_core::AgentKind;
use axum::http::StatusCode as AxumStatusCode;
use axum::routing::post;
use axum::{Json, Router};
use tokio::net::TcpListener;

async fn spawn_director(router: Router) -> (u16, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("addr").port();
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    (port, handle)
}

fn scheduler_with(director_url: String) -> (Arc<JobStore>, Scheduler) {
    let jobs = Arc::new(JobStore::new());
    let config = SchedulerConfig { tick_interval: Duration::from_secs(30), director_url, request_timeout: Duration::from_secs(2) };
    let scheduler = Scheduler::new(jobs.clone(), config);
    (jobs, scheduler)
}

fn due_job(name: &str) -> Job {
    Job::new(name, "*/1 * * * *", "run the nightly sweep", AgentKind::Claude, 300)
}

#[tokio::test]
async fn a_successful_submission_records_queued_and_the_queue_id() {
    let router = Router::new().route(
        "/api/queue/task",
        post(|| async { (AxumStatusCode::CREATED, Json(serde_json::json!({"queue_id": "queue-xyz", "position": 1, "state": "pending"}))) }),
    );
    let (port, _handle) = spawn_director(router).await;
    let (jobs, scheduler) = scheduler_with(format!("http://127.0.0.1:{port}"));
    jobs.add(due_job("nightly"), 0).unwrap();

    scheduler.tick(jobs.get("nightly").unwrap().next_run_ms.unwrap()).await;

    let job = jobs.get("nightly").unwrap();
    assert_eq!(job.last_status, Some(JobLastStatus::Queued));
    assert_eq!(job.last_queue_id, Some("queue-xyz".to_string()));
    assert!(!job.is_running);
}

#[tokio::test]
async fn a_full_queue_is_recorded_as_skipped_queue_full() {
    let router = Router::new().route("/api/queue/task", post(|| async { AxumStatusCode::SERVICE_UNAVAILABLE }));
    let (port, _handle) = spawn_director(router).await;
    let (jobs, scheduler) = scheduler_with(format!("http://127.0.0.1:{port}"));
    jobs.add(due_job("nightly"), 0).unwrap();

    scheduler.tick(jobs.get("nightly").unwrap().next_run_ms.unwrap()).await;

    assert_eq!(jobs.get("nightly").unwrap().last_status, Some(JobLastStatus::SkippedQueueFull));
}

#[tokio::test]
async fn an_unreachable_director_is_recorded_as_skipped_error() {
    let (jobs, scheduler) = scheduler_with("http://127.0.0.1:9".to_string());
    jobs.add(due_job("nightly"), 0).unwrap();

    scheduler.tick(jobs.get("nightly").unwrap().next_run_ms.unwrap()).await;

    assert_eq!(jobs.get("nightly").unwrap().last_status, Some(JobLastStatus::SkippedError));
}

#[tokio::test]
async fn a_tick_before_next_run_does_not_fire() {
    let (jobs, scheduler) = scheduler_with("http://127.0.0.1:9".to_string());
    jobs.add(due_job("nightly"), 0).unwrap();
    let next_run = jobs.get("nightly").unwrap().next_run_ms.unwrap();

    scheduler.tick(next_run - 1).await;

    assert_eq!(jobs.get("nightly").unwrap().last_status, None);
}

#[tokio::test]
async fn an_already_running_job_is_not_fired_again() {
    let router = Router::new().route(
        "/api/queue/task",
        post(|| async { (AxumStatusCode::CREATED, Json(serde_json::json!({"queue_id": "queue-1", "position": 1, "state": "pending"}))) }),
    );
    let (port, _handle) = spawn_director(router).await;
    let (jobs, scheduler) = scheduler_with(format!("http://127.0.0.1:{port}"));
    jobs.add(due_job("nightly"), 0).unwrap();
    let next_run = jobs.get("nightly").unwrap().next_run_ms.unwrap();
    jobs.mark_running("nightly");

    scheduler.tick(next_run).await;

    let job = jobs.get("nightly").unwrap();
    assert!(job.is_running, "tick must not disturb a fire already in flight");
    assert_eq!(job.last_status, None);
}
