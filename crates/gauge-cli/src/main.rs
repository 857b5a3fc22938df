//! Gauge CLI application
//!
//! Runs an evaluation suite and exits with a status code a CI pipeline can
//! gate on.
//!
//! # Installation
//!
//! ```bash
//! cargo install --path crates/gauge-cli
//! ```
//!
//! # Commands
//!
//! - `gauge` or `gauge run`: run every group, write the summary, exit 0 only
//!   when all groups pass
//! - `gauge list`: show the groups a suite declares
//! - `gauge validate`: load and validate a suite without running it
//! - `gauge report <summary.json>`: re-render a persisted summary

mod args;
mod commands;
mod console;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, Commands};
use crate::console::CliConsole;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins; --verbose raises the fallback level
    let fallback = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();

    match route(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            CliConsole::new(true).error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

/// Route CLI commands to their handlers, returning the process exit code
async fn route(cli: Cli) -> anyhow::Result<u8> {
    let verbose = cli.verbose;
    match cli.command.unwrap_or_default() {
        Commands::Run {
            suite,
            summary,
            groups,
            format,
            no_summary,
        } => commands::eval::run(suite, summary, groups, format, no_summary, verbose).await,
        Commands::List { suite } => commands::eval::list(suite).await,
        Commands::Validate { suite } => commands::eval::validate(suite).await,
        Commands::Report { input, format } => commands::eval::report(input, format).await,
    }
}
