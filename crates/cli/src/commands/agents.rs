// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! `agency agents` - list discovered workers (spec §4.6, §4.9).

use anyhow::Result;
use clap::{Args, Subcommand};
use std::io::Write;

use crate::client::Client;
use crate::color;
use crate::output::{format_time_ago, handle_list, OutputFormat};

#[derive(Args)]
pub struct AgentsArgs {
    #[command(subcommand)]
    pub command: AgentsCommand,
}

#[derive(Subcommand)]
pub enum AgentsCommand {
    /// List discovered workers and their last-known status
    List {},
}

pub async fn handle(command: AgentsCommand, client: &Client, format: OutputFormat) -> Result<()> {
    match command {
        AgentsCommand::List {} => {
            let response = client.list_agents().await?;
            let agents = response["agents"].as_array().cloned().unwrap_or_default();
            handle_list(format, &agents, "no agents discovered", |items, out| {
                for item in items {
                    let port = item["port"].as_u64().unwrap_or(0);
                    let last_seen = item["last_seen_ms"].as_u64().unwrap_or(0);
                    let state = item["status"]["state"].as_str().unwrap_or("unknown");
                    let kind = item["status"]["kind"].as_str().unwrap_or("?");
                    let _ = writeln!(
                        out,
                        "port={port}  {}  kind={kind}  last_seen={}",
                        color::status(state),
                        format_time_ago(last_seen)
                    );
                }
            })
        }
    }
}
