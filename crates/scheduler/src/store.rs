// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! In-memory job table (spec §3 "Job (scheduler)", §4.8).
//!
//! Mirrors `agency-sessions::SessionStore`'s shape: one `parking_lot::RwLock`
//! over a `HashMap`, short-lived locks, no lock held across I/O.

use std::collections::HashMap;

use agency_core::{Job, JobLastStatus};
use cron::Schedule;
use parking_lot::RwLock;

use crate::cron_expr;
use crate::error::SchedulerError;

struct Entry {
    job: Job,
    schedule: Schedule,
}

pub struct JobStore {
    jobs: RwLock<HashMap<String, Entry>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self { jobs: RwLock::new(HashMap::new()) }
    }

    /// Register a job and compute its first `next_run_ms` (spec §4.8
    /// "next-run is recomputed after each fire").
    pub fn add(&self, mut job: Job, now_ms: u64) -> Result<(), SchedulerError> {
        let schedule = cron_expr::parse(&job.cron_expr)?;
        let mut jobs = self.jobs.write();
        if jobs.contains_key(&job.name) {
            return Err(SchedulerError::Duplicate(job.name));
        }
        job.next_run_ms = cron_expr::next_after(&schedule, now_ms);
        jobs.insert(job.name.clone(), Entry { job, schedule });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Job> {
        self.jobs.read().get(name).map(|e| e.job.clone())
    }

    pub fn list(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.jobs.read().values().map(|e| e.job.clone()).collect();
        jobs.sort_by(|a, b| a.name.cmp(&b.name));
        jobs
    }

    /// Jobs due to fire right now (spec §4.8 "computed next-run is ≤ now
    /// and that is not currently firing").
    pub fn due(&self, now_ms: u64) -> Vec<String> {
        self.jobs
            .read()
            .values()
            .filter(|e| e.job.is_due(now_ms))
            .map(|e| e.job.name.clone())
            .collect()
    }

    /// Mark a job as firing (spec §4.8 "per-job concurrency guard").
    pub fn mark_running(&self, name: &str) -> bool {
        let mut jobs = self.jobs.write();
        match jobs.get_mut(name) {
            Some(entry) if !entry.job.is_running => {
                entry.job.is_running = true;
                true
            }
            _ => false,
        }
    }

    /// Record a fire's outcome and recompute `next_run_ms` from now (spec
    /// §4.8 "Submission" outcome table).
    pub fn record_outcome(&self, name: &str, status: JobLastStatus, queue_id: Option<String>, now_ms: u64) {
        let mut jobs = self.jobs.write();
        if let Some(entry) = jobs.get_mut(name) {
            entry.job.is_running = false;
            entry.job.last_run_ms = Some(now_ms);
            entry.job.last_status = Some(status);
            if queue_id.is_some() {
                entry.job.last_queue_id = queue_id;
            }
            entry.job.next_run_ms = cron_expr::next_after(&entry.schedule, now_ms);
        }
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
