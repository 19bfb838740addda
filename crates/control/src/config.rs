// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Control-plane runtime configuration (spec §4.9).

use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Static configuration for the control-plane process.
#[derive(Debug, Clone)]
pub struct ControlConfig {
    pub bind_addr: SocketAddr,
    pub queue_root: PathBuf,
    pub max_queue_size: usize,
    pub discovery_host: String,
    pub discovery_port_range: RangeInclusive<u16>,
    /// Base URL of the scheduler's own HTTP surface, if one is running
    /// alongside this control plane (spec §4.9 `GET /api/scheduler/jobs`
    /// proxy; `None` disables the route's backing data, not the route).
    pub scheduler_url: Option<String>,
}

impl ControlConfig {
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            queue_root: PathBuf::from("./data/queue"),
            max_queue_size: 1000,
            discovery_host: "127.0.0.1".to_string(),
            discovery_port_range: 9000..=9099,
            scheduler_url: None,
        }
    }
}
