// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! `agency queue` - list/show/cancel durable queue entries (spec §4.9, §2).

use anyhow::Result;
use clap::{Args, Subcommand};
use std::io::Write;

use crate::client::Client;
use crate::color;
use crate::output::{format_or_json, format_time_ago, handle_list, OutputFormat};

#[derive(Args)]
pub struct QueueArgs {
    #[command(subcommand)]
    pub command: QueueCommand,
}

#[derive(Subcommand)]
pub enum QueueCommand {
    /// List queue entries and summary counters
    List {},
    /// Show a single queue entry by id
    Show {
        /// Queue entry id
        queue_id: String,
    },
    /// Cancel a queue entry, in place or forwarded to its worker
    Cancel {
        /// Queue entry id
        queue_id: String,
    },
}

pub async fn handle(command: QueueCommand, client: &Client, format: OutputFormat) -> Result<()> {
    match command {
        QueueCommand::List {} => {
            let response = client.list_queue().await?;
            let entries = response["entries"].as_array().cloned().unwrap_or_default();
            println!(
                "{} depth={} dispatched={} oldest_age_ms={}",
                color::header("queue"),
                response["depth"],
                response["dispatched_count"],
                response["oldest_age_ms"],
            );
            handle_list(format, &entries, "no queue entries", |items, out| {
                for item in items {
                    let queue_id = item["queue_id"].as_str().unwrap_or("?");
                    let state = item["state"].as_str().unwrap_or("?");
                    let created_at_ms = item["created_at_ms"].as_u64().unwrap_or(0);
                    let prompt = item["request"]["prompt"].as_str().unwrap_or("");
                    let preview: String = prompt.chars().take(60).collect();
                    let _ = writeln!(out, "{queue_id}  {}  {}  {preview}", color::status(state), format_time_ago(created_at_ms));
                }
            })
        }
        QueueCommand::Show { queue_id } => {
            let response = client.get_queue_entry(&queue_id).await?;
            format_or_json(format, &response, || println!("{}", serde_json::to_string_pretty(&response).unwrap_or_default()))
        }
        QueueCommand::Cancel { queue_id } => {
            let response = client.cancel_queue_entry(&queue_id).await?;
            format_or_json(format, &response, || {
                let cancelled = response["cancelled"].as_bool().unwrap_or(false);
                println!("{queue_id}: {}", if cancelled { "cancelled" } else { "not cancelled" });
            })
        }
    }
}
