// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Scenario 1, spec §8: "Cold submit to idle worker."

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use super::harness::{accepting_worker_router, build_fixture, spawn_worker, submission_body};

#[tokio::test]
async fn cold_submit_dispatches_and_drains_the_queue() {
    let fixture = build_fixture(10, 3);
    let (port, _worker) = spawn_worker(accepting_worker_router("tsk-cold")).await;
    fixture.state.discovery.probe(port, 1_000).await;

    let submit = fixture
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/queue/task")
                .header("content-type", "application/json")
                .body(Body::from(submission_body("echo hi").to_string()))
                .unwrap(),
        )
        .await
        .expect("submit request");
    assert_eq!(submit.status(), StatusCode::CREATED);
    let body = axum::body::to_bytes(submit.into_body(), usize::MAX).await.expect("body");
    let parsed: serde_json::Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(parsed["position"], 1);
    let queue_id = parsed["queue_id"].as_str().expect("queue_id").to_string();
    assert!(queue_id.starts_with("queue-"));

    fixture.state.dispatcher.dispatch_tick(2_000).await;
    let working = fixture.state.queue.get(&queue_id).expect("entry present while working");
    assert_eq!(working.state, agency_core::QueueState::Working);
    assert!(working.dispatch.agent_task_id.is_some());

    fixture.state.dispatcher.completion_tick().await;
    assert!(fixture.state.queue.get(&queue_id).is_none());

    let list = fixture.router.oneshot(Request::builder().uri("/api/queue").body(Body::empty()).unwrap()).await.expect("list request");
    assert_eq!(list.status(), StatusCode::OK);
    let body = axum::body::to_bytes(list.into_body(), usize::MAX).await.expect("body");
    let parsed: serde_json::Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(parsed["depth"], 0);
}
