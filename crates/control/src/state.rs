// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Shared control-plane state: the queue, discovery cache, session store,
//! and dispatcher every handler reaches into (spec §3 "Ownership": "the
//! control plane exclusively owns the work queue, session store, discovery
//! cache, and scheduler state").

use std::sync::Arc;

use agency_dispatcher::Dispatcher;
use agency_discovery::Discovery;
use agency_queue::WorkQueue;
use agency_sessions::SessionStore;

use crate::config::ControlConfig;

pub struct AppState {
    pub config: ControlConfig,
    pub queue: Arc<WorkQueue>,
    pub discovery: Arc<Discovery>,
    pub sessions: Arc<SessionStore>,
    pub dispatcher: Arc<Dispatcher>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(
        config: ControlConfig,
        queue: Arc<WorkQueue>,
        discovery: Arc<Discovery>,
        sessions: Arc<SessionStore>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { config, queue, discovery, sessions, dispatcher, http }
    }
}
