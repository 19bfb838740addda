// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Error taxonomy for the discovery service.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("request to port {port} failed: {source}")]
    Probe { port: u16, source: reqwest::Error },
}
