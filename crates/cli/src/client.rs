// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Thin HTTP client over the control plane's REST surface (spec §4.9).
//!
//! The teacher's CLI talks to its daemon over a local Unix-socket IPC
//! protocol (`DaemonClient` / `oj_daemon::{Query,Request,Response}`). This
//! workspace's control plane is an HTTP service instead, so the client here
//! wraps [`reqwest`] rather than transplanting the socket framing.

use agency_core::SubmissionRequest;
use anyhow::Context;
use serde::de::DeserializeOwned;

use crate::exit_error::ExitError;

pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder().timeout(std::time::Duration::from_secs(30)).build().unwrap_or_default();
        Self { http, base_url: base_url.into() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn send<T: DeserializeOwned>(&self, response: reqwest::Result<reqwest::Response>) -> anyhow::Result<T> {
        let response = response.context("request to control plane failed")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(|s| s.to_string()))
                .unwrap_or(body);
            return Err(ExitError::new(1, format!("control plane returned {status}: {message}")).into());
        }
        response.json::<T>().await.context("failed to parse control plane response")
    }

    pub async fn submit(&self, request: &SubmissionRequest) -> anyhow::Result<serde_json::Value> {
        let response = self.http.post(self.url("/api/queue/task")).json(request).send().await;
        self.send(response).await
    }

    pub async fn list_queue(&self) -> anyhow::Result<serde_json::Value> {
        let response = self.http.get(self.url("/api/queue")).send().await;
        self.send(response).await
    }

    pub async fn get_queue_entry(&self, queue_id: &str) -> anyhow::Result<serde_json::Value> {
        let response = self.http.get(self.url(&format!("/api/queue/{queue_id}"))).send().await;
        self.send(response).await
    }

    pub async fn cancel_queue_entry(&self, queue_id: &str) -> anyhow::Result<serde_json::Value> {
        let response = self.http.post(self.url(&format!("/api/queue/{queue_id}/cancel"))).send().await;
        self.send(response).await
    }

    pub async fn list_agents(&self) -> anyhow::Result<serde_json::Value> {
        let response = self.http.get(self.url("/api/agents")).send().await;
        self.send(response).await
    }

    pub async fn list_sessions(&self) -> anyhow::Result<serde_json::Value> {
        let response = self.http.get(self.url("/api/sessions")).send().await;
        self.send(response).await
    }

    pub async fn archive_session(&self, session_id: &str) -> anyhow::Result<serde_json::Value> {
        let response = self.http.post(self.url(&format!("/api/sessions/{session_id}/archive"))).send().await;
        self.send(response).await
    }

    pub async fn scheduler_jobs(&self) -> anyhow::Result<serde_json::Value> {
        let response = self.http.get(self.url("/api/scheduler/jobs")).send().await;
        self.send(response).await
    }
}
