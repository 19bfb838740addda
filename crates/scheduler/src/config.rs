// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Loads job definitions from a JSON file (spec §3 "Job (scheduler)"
//! attributes, minus the runtime-computed fields).

use std::path::Path;

use agency_core::{AgentKind, Job, Tier};
use serde::Deserialize;

use crate::error::SchedulerError;

#[derive(Debug, Deserialize)]
pub struct JobSpec {
    pub name: String,
    pub cron_expr: String,
    pub prompt: String,
    #[serde(default)]
    pub tier: Option<Tier>,
    #[serde(default)]
    pub model: Option<String>,
    pub timeout_seconds: u64,
    pub agent_kind: AgentKind,
}

impl From<JobSpec> for Job {
    fn from(spec: JobSpec) -> Self {
        let mut job = Job::new(spec.name, spec.cron_expr, spec.prompt, spec.agent_kind, spec.timeout_seconds);
        job.tier = spec.tier;
        job.model = spec.model;
        job
    }
}

pub fn load_jobs_file(path: &Path) -> anyhow::Result<Vec<Job>> {
    let raw = std::fs::read_to_string(path)?;
    let specs: Vec<JobSpec> = serde_json::from_str(&raw)?;
    Ok(specs.into_iter().map(Job::from).collect())
}

pub fn register_all(store: &crate::store::JobStore, jobs: Vec<Job>, now_ms: u64) -> Result<(), SchedulerError> {
    for job in jobs {
        store.add(job, now_ms)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
