// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! `agency status` - scheduler job summary proxied through the control
//! plane (spec §4.9).

use anyhow::Result;

use crate::client::Client;
use crate::output::{format_or_json, OutputFormat};

pub async fn handle(client: &Client, format: OutputFormat) -> Result<()> {
    let response = client.scheduler_jobs().await?;
    format_or_json(format, &response, || println!("{}", serde_json::to_string_pretty(&response).unwrap_or_default()))
}
