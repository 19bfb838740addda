// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Drives one task from admission to terminal state (spec §4.2 streaming
//! events table, auto-resume, cancellation, failure semantics).

use agency_core::{ErrorKind, OutlineStep, Task, TaskError, TaskOutline, TaskState};
use agency_runner::{ResultSubtype, RunnerTaskSpec, StreamEvent};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::state::{AppState, RunningTask, Slot};
use crate::time::now_ms;

/// Run `task` to completion, mutating `state.last_task` as it progresses and
/// persisting history on terminal transition. Spawned as a detached tokio
/// task by the `/task` handler once admission succeeds.
pub async fn run_task(state: Arc<AppState>, mut task: Task, running: Arc<RunningTask>, mut resuming: bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(task.timeout_secs);
    let mut steps: Vec<OutlineStep> = Vec::new();

    let outcome = loop {
        let max_attempts = 1 + state.config.resume_max_attempts;
        if task.resume_attempts >= max_attempts {
            break Err(TaskError::new(
                ErrorKind::MaxTurns,
                "max_turns exceeded across all resume attempts; try smaller steps".to_string(),
            ));
        }

        let spec = RunnerTaskSpec {
            prompt: task.prompt.clone(),
            model: Some(task.model.clone()),
            session_id: task.session_id.as_str().to_string(),
            resuming,
            resume_attempts: task.resume_attempts,
            max_turns: Some(state.config.max_turns),
            env: Default::default(),
            timeout_secs: task.timeout_secs,
            working_dir: state.runner.default_session_dir(task.session_id.as_str()),
        };

        if let Some(dir) = spec.working_dir.to_str() {
            let _ = std::fs::create_dir_all(dir);
        }

        let attempt = run_one_attempt(&state, &running, &spec, &mut task, &mut steps, deadline).await;
        match attempt {
            AttemptOutcome::Completed => break Ok(()),
            AttemptOutcome::ResumeNeeded => {
                task.resume_attempts += 1;
                resuming = true;
                continue;
            }
            AttemptOutcome::Failed(err) => break Err(err),
            AttemptOutcome::Cancelled => {
                task.state = TaskState::Cancelled;
                break Ok(());
            }
        }
    };

    task.ended_at_ms = Some(now_ms());
    match outcome {
        Ok(()) if task.state == TaskState::Cancelled => {}
        Ok(()) => task.state = TaskState::Completed,
        Err(err) => {
            task.state = TaskState::Failed;
            task.error = Some(err);
        }
    }

    finish(&state, task, steps).await;
}

enum AttemptOutcome {
    Completed,
    ResumeNeeded,
    Failed(TaskError),
    Cancelled,
}

async fn run_one_attempt(
    state: &Arc<AppState>,
    running: &Arc<RunningTask>,
    spec: &RunnerTaskSpec,
    task: &mut Task,
    steps: &mut Vec<OutlineStep>,
    deadline: tokio::time::Instant,
) -> AttemptOutcome {
    let mut child = match state.runner.spawn(spec).await {
        Ok(child) => child,
        Err(e) => {
            return AttemptOutcome::Failed(TaskError::new(
                classify_kind(state),
                format!("failed to spawn child: {e}"),
            ))
        }
    };
    running.set_pgid(child.pgid());

    loop {
        tokio::select! {
            _ = running.cancel_token.cancelled() => {
                return cancel_child(state, running, child).await;
            }
            _ = tokio::time::sleep_until(deadline) => {
                let _ = agency_runner::graceful_terminate(child.pgid());
                return AttemptOutcome::Failed(TaskError::new(ErrorKind::Timeout, "task exceeded its timeout"));
            }
            line = child.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        let event = state.runner.parse_event(&line);
                        let outcome = classify(state, task, steps, event);
                        *state.last_task.lock() = Some(task.clone());
                        match outcome {
                            EventOutcome::Continue => continue,
                            EventOutcome::Terminal(outcome) => return outcome,
                        }
                    }
                    Ok(None) => {
                        // stdout closed without a terminal `result` event.
                        let code = child.wait().await.ok().flatten();
                        return AttemptOutcome::Failed(TaskError::new(
                            classify_kind(state),
                            format!("child exited (code {code:?}) without a terminal result event"),
                        ));
                    }
                    Err(e) => {
                        return AttemptOutcome::Failed(TaskError::new(
                            classify_kind(state),
                            format!("i/o error reading child stdout: {e}"),
                        ))
                    }
                }
            }
        }
    }
}

enum EventOutcome {
    Continue,
    Terminal(AttemptOutcome),
}

fn classify(state: &Arc<AppState>, task: &mut Task, steps: &mut Vec<OutlineStep>, event: StreamEvent) -> EventOutcome {
    match event {
        StreamEvent::SystemInit { session_id, .. } => {
            if let Some(sid) = session_id {
                if sid != task.session_id.as_str() {
                    info!(old = %task.session_id, new = %sid, "child reported a different session id");
                }
            }
            EventOutcome::Continue
        }
        StreamEvent::ThreadStarted { .. } => EventOutcome::Continue,
        StreamEvent::AssistantToolUse { name } => {
            steps.push(OutlineStep::new("tool_use", &format!("tool: {name}"), now_ms()));
            EventOutcome::Continue
        }
        StreamEvent::UserToolResult { byte_len } => {
            steps.push(OutlineStep::new("tool_result", &format!("result: {byte_len} bytes"), now_ms()));
            EventOutcome::Continue
        }
        StreamEvent::AssistantText { text } => {
            steps.push(OutlineStep::new("text", &text, now_ms()));
            task.output.push_str(&text);
            EventOutcome::Continue
        }
        StreamEvent::Result { subtype, total_cost_usd, usage, reason, .. } => {
            if let Some(usage) = usage {
                task.usage = Some(usage);
            }
            task.cost_usd = total_cost_usd.or(task.cost_usd);
            match subtype {
                ResultSubtype::Success => EventOutcome::Terminal(AttemptOutcome::Completed),
                ResultSubtype::Error if reason.as_deref() == Some("max_turns") => {
                    EventOutcome::Terminal(AttemptOutcome::ResumeNeeded)
                }
                ResultSubtype::Error => EventOutcome::Terminal(AttemptOutcome::Failed(TaskError::new(
                    classify_kind(state),
                    reason.unwrap_or_else(|| "child reported an error result".to_string()),
                ))),
            }
        }
        StreamEvent::Malformed { raw } => {
            warn!(%raw, "skipping malformed stream event line");
            EventOutcome::Continue
        }
    }
}

fn classify_kind(state: &Arc<AppState>) -> ErrorKind {
    match state.agent_kind() {
        agency_core::AgentKind::Claude => ErrorKind::ClaudeError,
        agency_core::AgentKind::Codex => ErrorKind::CodexError,
    }
}

async fn cancel_child(
    state: &Arc<AppState>,
    running: &Arc<RunningTask>,
    mut child: agency_runner::ChildProcess,
) -> AttemptOutcome {
    {
        let mut slot = state.slot.lock().await;
        *slot = Slot::Cancelling(running.clone());
    }
    let _ = agency_runner::graceful_terminate(child.pgid());
    let grace = state.config.cancel_grace_period;
    if tokio::time::timeout(grace, child.wait()).await.is_err() {
        let _ = agency_runner::forceful_kill(child.pgid());
        let _ = child.wait().await;
    }
    AttemptOutcome::Cancelled
}

async fn finish(state: &Arc<AppState>, task: Task, steps: Vec<OutlineStep>) {
    let outline = TaskOutline {
        task_id: task.task_id.as_str().to_string(),
        session_id: task.session_id.as_str().to_string(),
        state: task.state,
        started_at_ms: task.started_at_ms,
        ended_at_ms: task.ended_at_ms.unwrap_or_else(now_ms),
        steps,
        usage: task.usage,
        cost_usd: task.cost_usd,
        error: task.error.clone(),
    };

    {
        let mut history = state.history.lock();
        if let Err(e) = history.put(outline) {
            warn!(error = %e, "failed to persist task outline");
        }
        if !task.output.is_empty() {
            if let Err(e) = history.put_debug(task.task_id.as_str(), task.output.as_bytes(), now_ms()) {
                warn!(error = %e, "failed to persist task debug payload");
            }
        }
    }

    *state.last_task.lock() = Some(task);
    let mut slot = state.slot.lock().await;
    *slot = Slot::Idle;
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
