// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! `agency sessions` - list/archive logical task threads (spec §4.7, §4.9).

use anyhow::Result;
use clap::{Args, Subcommand};
use std::io::Write;

use crate::client::Client;
use crate::color;
use crate::output::{format_or_json, format_time_ago, handle_list, OutputFormat};

#[derive(Args)]
pub struct SessionsArgs {
    #[command(subcommand)]
    pub command: SessionsCommand,
}

#[derive(Subcommand)]
pub enum SessionsCommand {
    /// List sessions
    List {},
    /// Archive a session
    Archive {
        /// Session id
        session_id: String,
    },
}

pub async fn handle(command: SessionsCommand, client: &Client, format: OutputFormat) -> Result<()> {
    match command {
        SessionsCommand::List {} => {
            let response = client.list_sessions().await?;
            let sessions = response["sessions"].as_array().cloned().unwrap_or_default();
            handle_list(format, &sessions, "no sessions", |items, out| {
                for item in items {
                    let session_id = item["session_id"].as_str().unwrap_or("?");
                    let worker_url = item["worker_url"].as_str().unwrap_or("-");
                    let archived = item["archived"].as_bool().unwrap_or(false);
                    let updated_at = item["updated_at_ms"].as_u64().unwrap_or(0);
                    let task_count = item["tasks"].as_array().map(|v| v.len()).unwrap_or(0);
                    let state = if archived { color::muted("archived") } else { color::status("active") };
                    let _ = writeln!(out, "{session_id}  {state}  worker={worker_url}  tasks={task_count}  updated={}", format_time_ago(updated_at));
                }
            })
        }
        SessionsCommand::Archive { session_id } => {
            let response = client.archive_session(&session_id).await?;
            format_or_json(format, &response, || println!("{session_id}: archived"))
        }
    }
}
