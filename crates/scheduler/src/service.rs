// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Cron tick loop: fires due jobs and submits them to the control plane's
//! queue (spec §4.8).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use agency_core::{Job, JobLastStatus, SubmissionRequest, SubmissionSource};
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::dto::QueueSubmitResponse;
use crate::store::JobStore;
use crate::time::now_ms;

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Cadence of the tick loop (spec §4.8 "every 30s or finer").
    pub tick_interval: Duration,
    /// Base URL of the control plane's queue API, e.g. `http://127.0.0.1:8080`.
    pub director_url: String,
    pub request_timeout: Duration,
}

impl SchedulerConfig {
    pub fn new(director_url: impl Into<String>) -> Self {
        Self { tick_interval: Duration::from_secs(30), director_url: director_url.into(), request_timeout: Duration::from_secs(10) }
    }
}

pub struct Scheduler {
    jobs: Arc<JobStore>,
    client: reqwest::Client,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(jobs: Arc<JobStore>, config: SchedulerConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { jobs, client, config }
    }

    pub fn job_store(&self) -> &Arc<JobStore> {
        &self.jobs
    }

    /// Run the tick loop until `cancel` fires (spec §5 "one scheduler tick
    /// loop" actor).
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.config.tick_interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => self.tick(now_ms()).await,
            }
        }
    }

    /// One pass: fire every due, not-already-running job (spec §4.8
    /// "not currently firing").
    pub async fn tick(&self, now_ms: u64) {
        for name in self.jobs.due(now_ms) {
            if self.jobs.mark_running(&name) {
                self.fire(&name, now_ms).await;
            }
        }
    }

    async fn fire(&self, name: &str, now_ms: u64) {
        let Some(job) = self.jobs.get(name) else { return };
        info!(job = name, "firing scheduled job");
        let (status, queue_id) = self.submit(&job).await;
        self.jobs.record_outcome(name, status, queue_id, now_ms);
    }

    /// POST the job's template to the control plane's queue endpoint and
    /// classify the outcome (spec §4.8 "Submission" table).
    async fn submit(&self, job: &Job) -> (JobLastStatus, Option<String>) {
        let body = SubmissionRequest {
            prompt: job.prompt.clone(),
            tier: job.tier,
            model: job.model.clone(),
            timeout_seconds: Some(job.timeout_seconds),
            session_id: None,
            agent_kind: job.agent_kind,
            env: HashMap::new(),
            source: SubmissionSource::Scheduler,
            source_job: Some(job.name.clone()),
        };
        let url = format!("{}/api/queue/task", self.config.director_url);
        let response = self.client.post(&url).json(&body).send().await;

        match response {
            Ok(resp) if resp.status() == StatusCode::CREATED => match resp.json::<QueueSubmitResponse>().await {
                Ok(parsed) => (JobLastStatus::Queued, Some(parsed.queue_id)),
                Err(e) => {
                    warn!(job = %job.name, error = %e, "queue accepted job but returned an unparsable response");
                    (JobLastStatus::SkippedError, None)
                }
            },
            Ok(resp) if resp.status() == StatusCode::SERVICE_UNAVAILABLE => {
                info!(job = %job.name, "queue full, skipping this fire");
                (JobLastStatus::SkippedQueueFull, None)
            }
            Ok(resp) => {
                warn!(job = %job.name, status = %resp.status(), "director rejected scheduled submission");
                (JobLastStatus::SkippedError, None)
            }
            Err(e) => {
                warn!(job = %job.name, error = %e, "director unreachable");
                (JobLastStatus::SkippedError, None)
            }
        }
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
