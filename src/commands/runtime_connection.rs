// ABOUTME: Shared helper for connecting to the local container runtime.
// ABOUTME: Detects the socket, connects, and checks the daemon answers.

use mediastack::config::StackConfig;
use mediastack::error::Result;
use mediastack::output::Output;
use mediastack::runtime::{BollardProbe, RuntimeError, detect_local};

/// Connect to the container runtime on this host.
///
/// This handles the common pattern of:
/// 1. Detecting the runtime type and socket path
/// 2. Outputting progress messages
/// 3. Establishing the connection and pinging the daemon
pub async fn connect_to_runtime(config: &StackConfig, output: &Output) -> Result<BollardProbe> {
    output.progress("  → Detecting runtime...");
    let runtime_info = detect_local(Some(&config.runtime)).map_err(RuntimeError::from)?;

    output.progress(&format!("  → Found {runtime_info}"));

    let probe = BollardProbe::connect(&runtime_info).map_err(RuntimeError::from)?;
    probe.ping().await.map_err(RuntimeError::from)?;
    tracing::debug!(runtime = %probe.runtime_type(), "runtime answered ping");

    Ok(probe)
}
