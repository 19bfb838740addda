// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Scenario 7, spec §8: "Crash recovery."
//!
//! Dispatches a task, then drops the in-memory `WorkQueue` (simulating the
//! control plane process dying with the entry still in `dispatched/`) and
//! reopens the same root. Recovery must demote it back to `pending` with
//! its dispatch metadata cleared but attempt count preserved.

use agency_core::{QueueState, SessionId};
use agency_queue::WorkQueue;

use super::harness::sample_request;

#[test]
fn dispatched_entry_is_demoted_to_pending_across_a_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let session_id = SessionId::parse("spec-crash-session").expect("valid session id");
    let queue_id = {
        let queue = WorkQueue::open(dir.path(), 10).expect("open queue");
        let (task, _) = queue.add(sample_request("A"), 1_000).expect("add");
        queue.record_dispatch_attempt(task.queue_id.as_str(), None).expect("record attempt");
        queue.set_dispatched(task.queue_id.as_str(), "http://127.0.0.1:9000", "tsk-a", &session_id, 1_000).expect("set dispatched");
        task.queue_id.as_str().to_string()
    };

    let reopened = WorkQueue::open(dir.path(), 10).expect("reopen queue");
    let recovered = reopened.get(&queue_id).expect("entry survives restart");
    assert_eq!(recovered.state, QueueState::Pending);
    assert_eq!(recovered.dispatch.agent_task_id, None);
    assert_eq!(recovered.dispatch.worker_url, None);
    assert_eq!(recovered.dispatch.attempts, 1);
}
