// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Scenario 2, spec §8: "Capacity backpressure."

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use super::harness::{build_fixture, submission_body};

#[tokio::test]
async fn third_submission_past_max_size_is_rejected() {
    let fixture = build_fixture(2, 3);

    for prompt in ["A", "B"] {
        let response = fixture
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/queue/task")
                    .header("content-type", "application/json")
                    .body(Body::from(submission_body(prompt).to_string()))
                    .unwrap(),
            )
            .await
            .expect("submit request");
        assert_eq!(response.status(), StatusCode::CREATED, "prompt {prompt} should be accepted");
    }

    let rejected = fixture
        .router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/queue/task")
                .header("content-type", "application/json")
                .body(Body::from(submission_body("C").to_string()))
                .unwrap(),
        )
        .await
        .expect("submit request");
    assert_eq!(rejected.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = axum::body::to_bytes(rejected.into_body(), usize::MAX).await.expect("body");
    let parsed: serde_json::Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(parsed["error"], "queue_full");
}

#[tokio::test]
async fn second_entry_dispatches_once_first_completes() {
    let fixture = build_fixture(2, 3);
    let (port, _worker) = super::harness::spawn_worker(super::harness::accepting_worker_router("tsk-b")).await;
    fixture.state.discovery.probe(port, 1_000).await;

    let (a, _) = fixture.state.queue.add(super::harness::sample_request("A"), 1_000).expect("add A");
    let (b, _) = fixture.state.queue.add(super::harness::sample_request("B"), 1_000).expect("add B");
    assert_eq!(fixture.state.queue.position(a.queue_id.as_str()), Some(1));
    assert_eq!(fixture.state.queue.position(b.queue_id.as_str()), Some(2));

    fixture.state.dispatcher.dispatch_tick(2_000).await;
    let dispatched_a = fixture.state.queue.get(a.queue_id.as_str()).expect("A present");
    assert_eq!(dispatched_a.state, agency_core::QueueState::Working);
    assert_eq!(fixture.state.queue.get(b.queue_id.as_str()).expect("B present").state, agency_core::QueueState::Pending);

    fixture.state.dispatcher.completion_tick().await;
    assert!(fixture.state.queue.get(a.queue_id.as_str()).is_none());

    fixture.state.dispatcher.dispatch_tick(3_000).await;
    assert_eq!(fixture.state.queue.get(b.queue_id.as_str()).expect("B present").state, agency_core::QueueState::Working);
}
