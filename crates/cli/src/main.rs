// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

mod client;
mod color;
mod commands;
mod exit_error;
mod output;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use output::OutputFormat;

use crate::client::Client;
use crate::exit_error::ExitError;

const GIT_HASH: &str = env!("BUILD_GIT_HASH");

#[derive(Parser)]
#[command(name = "agency", version = GIT_HASH)]
struct Cli {
    /// Control plane base URL
    #[arg(long, env = "AGENCY_CONTROL_URL", default_value = "http://127.0.0.1:8080")]
    control_url: String,
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a new task to the queue
    Submit(commands::submit::SubmitArgs),
    /// Inspect or cancel durable queue entries
    Queue(commands::queue::QueueArgs),
    /// List discovered workers
    Agents(commands::agents::AgentsArgs),
    /// Inspect or archive sessions
    Sessions(commands::sessions::SessionsArgs),
    /// Show scheduler job status
    Status {},
}

fn cli_command() -> clap::Command {
    Cli::command().styles(color::styles())
}

#[tokio::main]
async fn main() {
    let matches = cli_command().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };
    let client = Client::new(cli.control_url);

    let result = match cli.command {
        Command::Submit(args) => commands::submit::handle(args, &client, cli.format).await,
        Command::Queue(args) => commands::queue::handle(args.command, &client, cli.format).await,
        Command::Agents(args) => commands::agents::handle(args.command, &client, cli.format).await,
        Command::Sessions(args) => commands::sessions::handle(args.command, &client, cli.format).await,
        Command::Status {} => commands::status::handle(&client, cli.format).await,
    };

    if let Err(err) = result {
        let code = err.downcast_ref::<ExitError>().map(|e| e.code).unwrap_or(1);
        eprintln!("error: {err}");
        std::process::exit(code);
    }
}
