// ABOUTME: Deploy command implementation.
// ABOUTME: Starts the stack, runs the health gate, then activates the tunnel.

use super::runtime_connection::connect_to_runtime;
use mediastack::config::StackConfig;
use mediastack::deploy::Deployment;
use mediastack::diagnostics::Diagnostics;
use mediastack::error::Result;
use mediastack::output::Output;
use mediastack::sequencer::TokioTicker;

/// Run the full pipeline: start, gate, route DNS, install tunnel.
pub async fn deploy(config: StackConfig, mut output: Output) -> Result<()> {
    // Reject bad settings before touching the stack.
    let gate = config.deployment_config()?;
    let tunnel = config.tunnel.client()?;
    let stack = config.compose_stack();

    output.start_timer();
    let mut diag = Diagnostics::default();

    let probe = connect_to_runtime(&config, &output).await?;

    output.progress(&format!(
        "Deploying stack from {}",
        stack.compose_file().display()
    ));
    let deployment = Deployment::new(config, gate).start_stack(&stack).await?;

    output.progress(&format!(
        "  → Waiting for {} critical service(s) (timeout {}s)...",
        deployment.gate().critical_services().len(),
        deployment.gate().timeout().as_secs()
    ));
    let deployment = deployment
        .wait_until_stable(&probe, &mut TokioTicker, &mut diag, |line| {
            output.status(line)
        })
        .await
        .map_err(|(_, e)| e)?;

    output.progress("  → Routing DNS...");
    let deployment = deployment.route_dns(&tunnel, &mut diag).await?;

    output.progress("  → Installing tunnel service...");
    let report = deployment.install_tunnel(&tunnel, &mut diag).await?.finish();

    // Emit collected warnings
    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    output.report(&report);
    output.success("Deployment complete!");
    Ok(())
}
