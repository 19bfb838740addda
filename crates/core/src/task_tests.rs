// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

use super::*;
use yare::parameterized;

fn sample_task(state: TaskState) -> Task {
    Task {
        task_id: TaskId::new(),
        session_id: SessionId::generate(),
        prompt: "echo hi".to_string(),
        model: "model-standard".to_string(),
        timeout_secs: 300,
        started_at_ms: 0,
        ended_at_ms: None,
        state,
        exit_code: None,
        output: String::new(),
        error: None,
        usage: None,
        cost_usd: None,
        resume_attempts: 0,
    }
}

#[parameterized(
    queued_to_working = { TaskState::Queued, TaskState::Working, true },
    queued_to_cancelled = { TaskState::Queued, TaskState::Cancelled, true },
    working_to_completed = { TaskState::Working, TaskState::Completed, true },
    working_to_failed = { TaskState::Working, TaskState::Failed, true },
    working_to_cancelled = { TaskState::Working, TaskState::Cancelled, true },
    queued_to_completed = { TaskState::Queued, TaskState::Completed, false },
    completed_to_anything = { TaskState::Completed, TaskState::Working, false },
    failed_is_terminal = { TaskState::Failed, TaskState::Completed, false },
    cancelled_is_terminal = { TaskState::Cancelled, TaskState::Working, false },
)]
fn transition_legality_matches_state_machine(from: TaskState, to: TaskState, expected: bool) {
    assert_eq!(from.can_transition_to(to), expected);
}

#[test]
fn terminal_states_never_transition_out() {
    for terminal in [TaskState::Completed, TaskState::Failed, TaskState::Cancelled] {
        let mut task = sample_task(terminal);
        assert!(task.transition(TaskState::Working).is_err());
        assert_eq!(task.state, terminal);
    }
}

#[test]
fn legal_transition_mutates_state() {
    let mut task = sample_task(TaskState::Queued);
    task.transition(TaskState::Working).unwrap();
    assert_eq!(task.state, TaskState::Working);
    assert!(!task.is_terminal());

    task.transition(TaskState::Completed).unwrap();
    assert!(task.is_terminal());
}
