// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

use super::*;
use agency_core::{AgentKind, QueueState, SubmissionSource};
use tempfile::tempdir;
use yare::parameterized;

fn sample_request() -> SubmissionRequest {
    SubmissionRequest {
        prompt: "do it".to_string(),
        tier: None,
        model: None,
        timeout_seconds: None,
        session_id: None,
        agent_kind: AgentKind::Claude,
        env: Default::default(),
        source: SubmissionSource::Cli,
        source_job: None,
    }
}

#[test]
fn add_assigns_fifo_position() {
    let dir = tempdir().unwrap();
    let queue = WorkQueue::open(dir.path(), 10).unwrap();

    let (first, pos1) = queue.add(sample_request(), 100).unwrap();
    let (_second, pos2) = queue.add(sample_request(), 200).unwrap();

    assert_eq!(pos1, 1);
    assert_eq!(pos2, 2);
    assert_eq!(queue.next_pending().unwrap().queue_id, first.queue_id);
}

#[test]
fn add_rejects_once_max_size_reached() {
    let dir = tempdir().unwrap();
    let queue = WorkQueue::open(dir.path(), 1).unwrap();
    queue.add(sample_request(), 100).unwrap();

    let err = queue.add(sample_request(), 200).unwrap_err();
    assert!(matches!(err, QueueError::Full { pending: 1, max_size: 1 }));
}

#[test]
fn next_pending_does_not_remove() {
    let dir = tempdir().unwrap();
    let queue = WorkQueue::open(dir.path(), 10).unwrap();
    queue.add(sample_request(), 100).unwrap();

    assert!(queue.next_pending().is_some());
    assert!(queue.next_pending().is_some());
    assert_eq!(queue.depth(), 1);
}

#[test]
fn set_state_to_dispatching_removes_from_pending_order_but_keeps_entry() {
    let dir = tempdir().unwrap();
    let queue = WorkQueue::open(dir.path(), 10).unwrap();
    let (task, _) = queue.add(sample_request(), 100).unwrap();

    queue.set_state(task.queue_id.as_str(), QueueState::Dispatching).unwrap();

    assert_eq!(queue.depth(), 0);
    assert_eq!(queue.get(task.queue_id.as_str()).unwrap().state, QueueState::Dispatching);
}

#[test]
fn set_dispatched_moves_file_and_records_assignment() {
    let dir = tempdir().unwrap();
    let queue = WorkQueue::open(dir.path(), 10).unwrap();
    let (task, _) = queue.add(sample_request(), 100).unwrap();
    queue.set_state(task.queue_id.as_str(), QueueState::Dispatching).unwrap();

    let session_id = agency_core::SessionId::generate();
    queue.set_dispatched(task.queue_id.as_str(), "http://127.0.0.1:9001", "tsk-abc", &session_id, 150).unwrap();

    let stored = queue.get(task.queue_id.as_str()).unwrap();
    assert_eq!(stored.state, QueueState::Working);
    assert_eq!(stored.dispatch.worker_url.as_deref(), Some("http://127.0.0.1:9001"));
    assert_eq!(stored.request.session_id, Some(session_id));

    let dispatched = crate::store::load_all(dir.path(), crate::store::Location::Dispatched).unwrap();
    assert_eq!(dispatched.len(), 1);
    assert!(crate::store::load_all(dir.path(), crate::store::Location::Pending).unwrap().is_empty());
}

#[test]
fn requeue_at_back_preserves_attempts_and_clears_assignment() {
    let dir = tempdir().unwrap();
    let queue = WorkQueue::open(dir.path(), 10).unwrap();
    let (first, _) = queue.add(sample_request(), 100).unwrap();
    let (second, _) = queue.add(sample_request(), 200).unwrap();

    queue.set_state(first.queue_id.as_str(), QueueState::Dispatching).unwrap();
    let session_id = agency_core::SessionId::generate();
    queue.set_dispatched(first.queue_id.as_str(), "http://w", "tsk-1", &session_id, 150).unwrap();
    queue.record_dispatch_attempt(first.queue_id.as_str(), Some("agent_busy".to_string())).unwrap();
    queue.record_dispatch_attempt(first.queue_id.as_str(), Some("agent_busy".to_string())).unwrap();

    queue.requeue_at_back(first.queue_id.as_str()).unwrap();

    let requeued = queue.get(first.queue_id.as_str()).unwrap();
    assert_eq!(requeued.state, QueueState::Pending);
    assert_eq!(requeued.dispatch.attempts, 2);
    assert!(requeued.dispatch.worker_url.is_none());

    // `second` was queued first chronologically but `first` went to the back.
    let pending_ids: Vec<_> = queue.pending_snapshot().into_iter().map(|t| t.queue_id).collect();
    assert_eq!(pending_ids, vec![second.queue_id.clone(), first.queue_id.clone()]);
}

#[test]
fn dispatched_snapshot_only_lists_working_entries() {
    let dir = tempdir().unwrap();
    let queue = WorkQueue::open(dir.path(), 10).unwrap();
    let (pending, _) = queue.add(sample_request(), 100).unwrap();
    let (dispatched, _) = queue.add(sample_request(), 200).unwrap();
    queue.set_state(dispatched.queue_id.as_str(), QueueState::Dispatching).unwrap();
    let session_id = agency_core::SessionId::generate();
    queue.set_dispatched(dispatched.queue_id.as_str(), "http://w", "tsk-1", &session_id, 250).unwrap();

    let snapshot = queue.dispatched_snapshot();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].queue_id, dispatched.queue_id);
    assert_ne!(snapshot[0].queue_id, pending.queue_id);
}

#[test]
fn requeue_at_back_from_dispatching_never_moved_out_of_pending() {
    let dir = tempdir().unwrap();
    let queue = WorkQueue::open(dir.path(), 10).unwrap();
    let (task, _) = queue.add(sample_request(), 100).unwrap();
    queue.set_state(task.queue_id.as_str(), QueueState::Dispatching).unwrap();
    queue.record_dispatch_attempt(task.queue_id.as_str(), Some("agent_busy".to_string())).unwrap();

    queue.requeue_at_back(task.queue_id.as_str()).unwrap();

    let requeued = queue.get(task.queue_id.as_str()).unwrap();
    assert_eq!(requeued.state, QueueState::Pending);
    assert_eq!(requeued.dispatch.attempts, 1);

    // The entry must still be readable from disk after recovery, proving it
    // wasn't silently deleted by a self-relocation.
    let recovered = WorkQueue::open(dir.path(), 10).unwrap();
    assert_eq!(recovered.depth(), 1);
    assert_eq!(recovered.get(task.queue_id.as_str()).unwrap().dispatch.attempts, 1);
}

#[test]
fn remove_deletes_from_memory_and_disk() {
    let dir = tempdir().unwrap();
    let queue = WorkQueue::open(dir.path(), 10).unwrap();
    let (task, _) = queue.add(sample_request(), 100).unwrap();

    queue.remove(task.queue_id.as_str()).unwrap();

    assert!(queue.get(task.queue_id.as_str()).is_none());
    assert_eq!(queue.depth(), 0);
}

#[test]
fn cancel_unknown_id_is_not_found() {
    let dir = tempdir().unwrap();
    let queue = WorkQueue::open(dir.path(), 10).unwrap();
    let err = queue.cancel("queue-does-not-exist").unwrap_err();
    assert!(matches!(err, QueueError::NotFound(_)));
}

#[test]
fn cancel_present_entry_removes_it_and_returns_cancelled_snapshot() {
    let dir = tempdir().unwrap();
    let queue = WorkQueue::open(dir.path(), 10).unwrap();
    let (task, _) = queue.add(sample_request(), 100).unwrap();

    let cancelled = queue.cancel(task.queue_id.as_str()).unwrap();
    assert_eq!(cancelled.state, QueueState::Cancelled);
    assert!(queue.get(task.queue_id.as_str()).is_none());
}

#[parameterized(
    empty = { vec![], None },
    one = { vec![100u64], Some(100) },
)]
fn oldest_age_ms_reflects_front_of_order(created_at: Vec<u64>, expected_created_at: Option<u64>) {
    let dir = tempdir().unwrap();
    let queue = WorkQueue::open(dir.path(), 10).unwrap();
    for ts in &created_at {
        queue.add(sample_request(), *ts).unwrap();
    }
    let age = queue.oldest_age_ms(500);
    assert_eq!(age, expected_created_at.map(|ts| 500 - ts));
}

#[test]
fn recovery_demotes_dispatched_entries_to_pending() {
    let dir = tempdir().unwrap();
    {
        let queue = WorkQueue::open(dir.path(), 10).unwrap();
        let (task, _) = queue.add(sample_request(), 100).unwrap();
        queue.set_state(task.queue_id.as_str(), QueueState::Dispatching).unwrap();
        let session_id = agency_core::SessionId::generate();
        queue.set_dispatched(task.queue_id.as_str(), "http://w", "tsk-1", &session_id, 150).unwrap();
    }

    let recovered = WorkQueue::open(dir.path(), 10).unwrap();
    assert_eq!(recovered.depth(), 1);
    let task = recovered.next_pending().unwrap();
    assert_eq!(task.state, QueueState::Pending);
    assert!(task.dispatch.worker_url.is_none());
}

#[test]
fn recovery_sorts_pending_entries_by_created_at() {
    let dir = tempdir().unwrap();
    {
        let queue = WorkQueue::open(dir.path(), 10).unwrap();
        queue.add(sample_request(), 500).unwrap();
        queue.add(sample_request(), 100).unwrap();
        queue.add(sample_request(), 300).unwrap();
    }

    let recovered = WorkQueue::open(dir.path(), 10).unwrap();
    let order: Vec<_> = recovered.pending_snapshot().into_iter().map(|t| t.created_at_ms).collect();
    assert_eq!(order, vec![100, 300, 500]);
}
