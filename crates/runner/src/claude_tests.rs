// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

use super::*;
use std::collections::HashMap;

fn sample_task(resuming: bool) -> RunnerTaskSpec {
    RunnerTaskSpec {
        prompt: "summarize the repo".to_string(),
        model: Some("claude-opus-4".to_string()),
        session_id: "sess-1".to_string(),
        resuming,
        resume_attempts: 0,
        max_turns: Some(20),
        env: HashMap::new(),
        timeout_secs: 600,
        working_dir: PathBuf::from("/tmp"),
    }
}

#[test]
fn fresh_session_passes_session_id_flag() {
    let runner = ClaudeRunner::new(PathBuf::from("/tmp/sessions"));
    let args = runner.build_args(&sample_task(false));
    assert!(args.contains(&"--session-id".to_string()));
    assert!(args.contains(&"sess-1".to_string()));
    assert!(!args.contains(&"--resume".to_string()));
}

#[test]
fn resumed_session_passes_resume_flag() {
    let runner = ClaudeRunner::new(PathBuf::from("/tmp/sessions"));
    let args = runner.build_args(&sample_task(true));
    assert!(args.contains(&"--resume".to_string()));
}

#[test]
fn model_and_max_turns_are_forwarded() {
    let runner = ClaudeRunner::new(PathBuf::from("/tmp/sessions"));
    let args = runner.build_args(&sample_task(false));
    assert!(args.contains(&"--model".to_string()));
    assert!(args.contains(&"claude-opus-4".to_string()));
    assert!(args.contains(&"--max-turns".to_string()));
    assert!(args.contains(&"20".to_string()));
}

#[test]
fn default_session_dir_is_rooted_under_session_root() {
    let runner = ClaudeRunner::new(PathBuf::from("/tmp/sessions"));
    assert_eq!(runner.default_session_dir("sess-1"), PathBuf::from("/tmp/sessions/sess-1"));
}

#[tokio::test]
async fn spawn_runs_the_configured_binary() {
    let runner = ClaudeRunner::new(PathBuf::from("/tmp")).with_binary("/bin/echo");
    let task = sample_task(false);
    let mut proc = runner.spawn(&task).await.expect("spawn");
    let line = proc.next_line().await.expect("read line");
    assert!(line.is_some());
}
