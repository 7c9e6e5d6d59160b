// ABOUTME: Activate command implementation.
// ABOUTME: Re-verifies a running stack, then routes DNS and installs the tunnel.

use super::runtime_connection::connect_to_runtime;
use mediastack::config::StackConfig;
use mediastack::deploy::Deployment;
use mediastack::diagnostics::Diagnostics;
use mediastack::error::Result;
use mediastack::output::Output;
use mediastack::sequencer::TokioTicker;

/// Activate the tunnel for a stack started earlier.
///
/// The health gate runs again first; activation is never reached on a
/// stack that is not stable.
pub async fn activate(config: StackConfig, mut output: Output) -> Result<()> {
    let gate = config.deployment_config()?;
    let tunnel = config.tunnel.client()?;

    output.start_timer();
    let mut diag = Diagnostics::default();

    let probe = connect_to_runtime(&config, &output).await?;

    output.progress("  → Re-checking critical services...");
    let deployment = Deployment::attach(config, gate)
        .wait_until_stable(&probe, &mut TokioTicker, &mut diag, |line| {
            output.status(line)
        })
        .await
        .map_err(|(_, e)| e)?;

    output.progress("  → Routing DNS...");
    let deployment = deployment.route_dns(&tunnel, &mut diag).await?;

    output.progress("  → Installing tunnel service...");
    let report = deployment.install_tunnel(&tunnel, &mut diag).await?.finish();

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    output.report(&report);
    output.success("Tunnel activated!");
    Ok(())
}
