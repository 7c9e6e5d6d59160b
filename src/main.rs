// ABOUTME: Entry point for the mediastack CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use mediastack::error::{Error, Result};
use mediastack::output::{Output, OutputMode};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = OutputMode::from_flags(cli.quiet, cli.json);

    // Ctrl-C drops the running pipeline; subprocesses are killed on drop.
    let result = tokio::select! {
        result = run(cli, Output::new(mode)) => result,
        _ = tokio::signal::ctrl_c() => Err(Error::Interrupted),
    };

    if let Err(e) = result {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Deploy(gate) => {
            let config = config.with_health_overrides(gate.timeout, gate.poll_interval);
            commands::deploy(config, output).await
        }
        Commands::Wait(gate) => {
            let config = config.with_health_overrides(gate.timeout, gate.poll_interval);
            commands::wait(config, output).await
        }
        Commands::Status => commands::status(config, output).await,
        Commands::Activate(gate) => {
            let config = config.with_health_overrides(gate.timeout, gate.poll_interval);
            commands::activate(config, output).await
        }
    }
}
