//! # HSDS-UK conformance validator CLI
//!
//! Command-line front end for the conformance engine.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

mod commands;

use commands::ValidateCommand;

#[derive(Parser)]
#[command(name = "oruk-validate")]
#[command(about = "Validate a service against the HSDS-UK data standard")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a conformance validation against a live service
    Validate(ValidateCommand),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate(cmd) => cmd.execute().await,
    }
}
