// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use mediastack::config::parse_duration;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "mediastack")]
#[command(about = "Health-gated deployment of a media stack behind a Cloudflare tunnel")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the configuration file (default: discover in the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output for CI (only final result)
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Output JSON lines for scripting
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the stack, wait for critical services, then route DNS and install the tunnel
    Deploy(GateArgs),

    /// Wait for critical services of a running stack to become healthy
    Wait(GateArgs),

    /// Show the current health of each critical service
    Status,

    /// Re-check a running stack, then route DNS and install the tunnel
    Activate(GateArgs),
}

/// Health gate overrides shared by the gated commands.
#[derive(Args, Debug, Default)]
pub struct GateArgs {
    /// Total time to wait for critical services (e.g. 300s, 5m)
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Time between health polls (e.g. 10s)
    #[arg(long, value_parser = parse_duration)]
    pub poll_interval: Option<Duration>,
}
