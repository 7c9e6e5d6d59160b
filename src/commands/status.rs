// ABOUTME: Status command implementation.
// ABOUTME: Takes a single health snapshot of the critical services.

use super::runtime_connection::connect_to_runtime;
use mediastack::config::StackConfig;
use mediastack::error::Result;
use mediastack::output::Output;
use mediastack::sequencer::take_snapshot;

/// Print the current state of every critical service, in gate order.
pub async fn status(config: StackConfig, output: Output) -> Result<()> {
    let gate = config.deployment_config()?;
    let probe = connect_to_runtime(&config, &output).await?;

    let snapshot = take_snapshot(&gate, &probe, 1).await?;
    output.snapshot(&snapshot);

    if !snapshot.is_stable() {
        output.progress(&format!(
            "{} critical service(s) not yet healthy",
            snapshot.blocking().count()
        ));
    }
    Ok(())
}
