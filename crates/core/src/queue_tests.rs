// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

use super::*;

fn sample_request() -> SubmissionRequest {
    SubmissionRequest {
        prompt: "echo hi".to_string(),
        tier: Some(Tier::Fast),
        model: None,
        timeout_seconds: None,
        session_id: None,
        agent_kind: AgentKind::Claude,
        env: HashMap::new(),
        source: SubmissionSource::Cli,
        source_job: None,
    }
}

#[test]
fn new_entry_starts_pending_with_empty_dispatch_meta() {
    let task = QueuedTask::new(QueueId::new(), 1000, sample_request());
    assert_eq!(task.state, QueueState::Pending);
    assert_eq!(task.dispatch.attempts, 0);
    assert!(task.dispatch.worker_url.is_none());
}

#[test]
fn terminal_states_are_classified_correctly() {
    assert!(QueueState::Completed.is_terminal());
    assert!(QueueState::Failed.is_terminal());
    assert!(QueueState::Cancelled.is_terminal());
    assert!(!QueueState::Pending.is_terminal());
    assert!(!QueueState::Dispatching.is_terminal());
    assert!(!QueueState::Working.is_terminal());
}

#[test]
fn submission_request_round_trips_through_json() {
    let request = sample_request();
    let json = serde_json::to_string(&request).unwrap();
    let back: SubmissionRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(back.prompt, request.prompt);
    assert_eq!(back.agent_kind, request.agent_kind);
}
