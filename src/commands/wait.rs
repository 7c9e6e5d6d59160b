// ABOUTME: Wait command implementation.
// ABOUTME: Runs only the health gate against a stack that is already up.

use super::runtime_connection::connect_to_runtime;
use mediastack::config::StackConfig;
use mediastack::deploy::Deployment;
use mediastack::diagnostics::Diagnostics;
use mediastack::error::Result;
use mediastack::output::Output;
use mediastack::sequencer::TokioTicker;

/// Wait until every running critical service is healthy.
pub async fn wait(config: StackConfig, mut output: Output) -> Result<()> {
    let gate = config.deployment_config()?;

    output.start_timer();
    let mut diag = Diagnostics::default();

    let probe = connect_to_runtime(&config, &output).await?;

    let stable = Deployment::attach(config, gate)
        .wait_until_stable(&probe, &mut TokioTicker, &mut diag, |line| {
            output.status(line)
        })
        .await
        .map_err(|(_, e)| e)?;

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    output.report(stable.state().report());
    output.success(&format!(
        "All critical services stable after {} poll(s)",
        stable.state().report().polls
    ));
    Ok(())
}
