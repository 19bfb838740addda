// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Loopback port-scan discovery service (spec §4.6).

use agency_core::{AgentKind, DiscoveryRecord, WorkerState, WorkerStatus};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::DiscoveryError;

/// Tunables for the discovery loop (spec §4.6).
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Loopback address workers bind to.
    pub host: String,
    /// Inclusive port range to scan.
    pub port_range: RangeInclusive<u16>,
    /// Consecutive failures before a worker is marked unreachable (`K`).
    pub failure_threshold: u32,
    /// How often a full-range sweep runs, discovering newly appeared ports.
    pub sweep_interval: Duration,
    /// Poll cadence for a worker currently `working`.
    pub working_poll_interval: Duration,
    /// Poll cadence for a worker currently `idle` (or unreachable).
    pub idle_poll_interval: Duration,
    /// Per-request timeout.
    pub probe_timeout: Duration,
    /// Granularity of the scheduling loop; should divide the shortest
    /// configured interval.
    pub tick_interval: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port_range: 9000..=9099,
            failure_threshold: 3,
            sweep_interval: Duration::from_secs(30),
            working_poll_interval: Duration::from_secs(1),
            idle_poll_interval: Duration::from_secs(5),
            probe_timeout: Duration::from_millis(800),
            tick_interval: Duration::from_secs(1),
        }
    }
}

/// Tracks known workers and drives the adaptive poll/sweep loop.
pub struct Discovery {
    config: DiscoveryConfig,
    client: reqwest::Client,
    records: RwLock<HashMap<u16, DiscoveryRecord>>,
    last_probed_ms: Mutex<HashMap<u16, u64>>,
}

impl Discovery {
    pub fn new(config: DiscoveryConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.probe_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { config, client, records: RwLock::new(HashMap::new()), last_probed_ms: Mutex::new(HashMap::new()) }
    }

    /// Probe a single port, updating its record on success or failure.
    /// Never returns an error to the caller — failures are folded into the
    /// record's `consecutive_failures` counter instead, matching spec §4.6
    /// ("maintain per-port state... consecutive-failure counter").
    pub async fn probe(&self, port: u16, now_ms: u64) -> bool {
        self.last_probed_ms.lock().insert(port, now_ms);
        match self.fetch_status(port).await {
            Ok(status) => {
                self.records.write().entry(port).or_insert_with(|| DiscoveryRecord::new(port)).record_success(status, now_ms);
                true
            }
            Err(e) => {
                debug!(port, error = %e, "worker probe failed");
                self.records.write().entry(port).or_insert_with(|| DiscoveryRecord::new(port)).record_failure();
                false
            }
        }
    }

    async fn fetch_status(&self, port: u16) -> Result<WorkerStatus, DiscoveryError> {
        let url = format!("http://{}:{}/status", self.config.host, port);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| DiscoveryError::Probe { port, source })?
            .error_for_status()
            .map_err(|source| DiscoveryError::Probe { port, source })?;
        response.json::<WorkerStatus>().await.map_err(|source| DiscoveryError::Probe { port, source })
    }

    /// Probe every port in the configured range (spec §4.6 "full-range sweep").
    pub async fn sweep(&self, now_ms: u64) {
        for port in self.config.port_range.clone() {
            self.probe(port, now_ms).await;
        }
    }

    /// Probe only the known workers that are due for a poll under the
    /// adaptive cadence (spec §4.6 "Adaptive poll cadence").
    pub async fn poll_due(&self, now_ms: u64) {
        let due: Vec<u16> = {
            let records = self.records.read();
            let last_probed = self.last_probed_ms.lock();
            records
                .values()
                .filter(|record| {
                    let elapsed = last_probed.get(&record.port).map(|t| now_ms.saturating_sub(*t)).unwrap_or(u64::MAX);
                    elapsed >= self.adaptive_interval(record).as_millis() as u64
                })
                .map(|record| record.port)
                .collect()
        };
        for port in due {
            self.probe(port, now_ms).await;
        }
    }

    fn adaptive_interval(&self, record: &DiscoveryRecord) -> Duration {
        match record.status.as_ref().map(|s| s.state) {
            Some(WorkerState::Working) => self.config.working_poll_interval,
            _ => self.config.idle_poll_interval,
        }
    }

    /// Drive the sweep/poll loop until `cancel` fires (spec §4.6, §5 actor
    /// shutdown convention).
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.config.tick_interval);
        // Force an immediate first sweep rather than waiting a full interval.
        let mut last_sweep = tokio::time::Instant::now()
            .checked_sub(self.config.sweep_interval)
            .unwrap_or_else(tokio::time::Instant::now);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    warn!("discovery loop shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let now_ms = crate::time::now_ms();
                    if last_sweep.elapsed() >= self.config.sweep_interval {
                        self.sweep(now_ms).await;
                        last_sweep = tokio::time::Instant::now();
                    } else {
                        self.poll_due(now_ms).await;
                    }
                }
            }
        }
    }

    pub fn snapshot(&self) -> Vec<DiscoveryRecord> {
        let mut records: Vec<_> = self.records.read().values().cloned().collect();
        records.sort_by_key(|r| r.port);
        records
    }

    pub fn get(&self, port: u16) -> Option<DiscoveryRecord> {
        self.records.read().get(&port).cloned()
    }

    /// Build the base URL a caller should dispatch to for `port`.
    pub fn worker_url(&self, port: u16) -> String {
        format!("http://{}:{}", self.config.host, port)
    }

    /// Healthy, idle workers of `kind`, in ascending-port discovery order
    /// (spec §4.5 "the first in discovery order is chosen").
    pub fn healthy_idle_workers(&self, kind: AgentKind) -> Vec<(u16, WorkerStatus)> {
        let records = self.records.read();
        let mut out: Vec<(u16, WorkerStatus)> = records
            .values()
            .filter(|r| !r.is_unreachable(self.config.failure_threshold))
            .filter_map(|r| r.status.clone().map(|s| (r.port, s)))
            .filter(|(_, s)| s.state == WorkerState::Idle && s.kind == kind)
            .collect();
        out.sort_by_key(|(port, _)| *port);
        out
    }

    /// Whether `port` is currently known and not marked unreachable (spec
    /// §4.7 invariant: "is the pinned worker still present?").
    pub fn is_present_and_healthy(&self, port: u16) -> bool {
        self.records.read().get(&port).map(|r| !r.is_unreachable(self.config.failure_threshold)).unwrap_or(false)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
