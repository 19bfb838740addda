// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

use super::*;
use agency_core::AgentKind;

fn sample(name: &str, cron_expr: &str) -> Job {
    Job::new(name, cron_expr, "do the thing", AgentKind::Claude, 600)
}

#[test]
fn add_computes_an_initial_next_run() {
    let store = JobStore::new();
    store.add(sample("nightly", "0 2 * * *"), 1_000).unwrap();

    let job = store.get("nightly").unwrap();
    assert!(job.next_run_ms.is_some());
    assert!(job.next_run_ms.unwrap() > 1_000);
}

#[test]
fn add_rejects_a_duplicate_name() {
    let store = JobStore::new();
    store.add(sample("nightly", "0 2 * * *"), 1_000).unwrap();
    let err = store.add(sample("nightly", "0 3 * * *"), 1_000).unwrap_err();
    assert!(matches!(err, SchedulerError::Duplicate(name) if name == "nightly"));
}

#[test]
fn add_rejects_an_invalid_cron_expression() {
    let store = JobStore::new();
    let err = store.add(sample("bad", "nonsense"), 1_000).unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidCron { .. }));
}

#[test]
fn due_lists_only_jobs_whose_next_run_has_passed() {
    let store = JobStore::new();
    store.add(sample("soon", "*/1 * * * *"), 1_000).unwrap();
    let next_run = store.get("soon").unwrap().next_run_ms.unwrap();

    assert!(store.due(next_run - 1).is_empty());
    assert_eq!(store.due(next_run), vec!["soon".to_string()]);
}

#[test]
fn mark_running_guards_against_concurrent_fires() {
    let store = JobStore::new();
    store.add(sample("job", "*/1 * * * *"), 1_000).unwrap();

    assert!(store.mark_running("job"));
    assert!(!store.mark_running("job"), "a second fire must be rejected while the first is in flight");
}

#[test]
fn record_outcome_clears_is_running_and_recomputes_next_run() {
    let store = JobStore::new();
    store.add(sample("job", "*/1 * * * *"), 1_000).unwrap();
    store.mark_running("job");
    let first_next_run = store.get("job").unwrap().next_run_ms.unwrap();

    store.record_outcome("job", JobLastStatus::Queued, Some("queue-abc".to_string()), first_next_run);

    let job = store.get("job").unwrap();
    assert!(!job.is_running);
    assert_eq!(job.last_status, Some(JobLastStatus::Queued));
    assert_eq!(job.last_queue_id, Some("queue-abc".to_string()));
    assert_eq!(job.last_run_ms, Some(first_next_run));
    assert!(job.next_run_ms.unwrap() > first_next_run);
}

#[test]
fn record_outcome_keeps_the_previous_queue_id_on_a_skip() {
    let store = JobStore::new();
    store.add(sample("job", "*/1 * * * *"), 1_000).unwrap();
    store.mark_running("job");
    let first_next_run = store.get("job").unwrap().next_run_ms.unwrap();
    store.record_outcome("job", JobLastStatus::Queued, Some("queue-abc".to_string()), first_next_run);

    store.mark_running("job");
    let second_next_run = store.get("job").unwrap().next_run_ms.unwrap();
    store.record_outcome("job", JobLastStatus::SkippedQueueFull, None, second_next_run);

    let job = store.get("job").unwrap();
    assert_eq!(job.last_status, Some(JobLastStatus::SkippedQueueFull));
    assert_eq!(job.last_queue_id, Some("queue-abc".to_string()));
}

#[test]
fn list_is_sorted_by_name() {
    let store = JobStore::new();
    store.add(sample("zeta", "0 2 * * *"), 1_000).unwrap();
    store.add(sample("alpha", "0 3 * * *"), 1_000).unwrap();

    let names: Vec<_> = store.list().into_iter().map(|j| j.name).collect();
    assert_eq!(names, vec!["alpha".to_string(), "zeta".to_string()]);
}
