// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use chrono::Utc;

use crate::diagnostics::{Diagnostics, Warning};
use crate::runtime::ContainerProbe;
use crate::sequencer::{Sequencer, SequencerOutcome, StatusLine, Ticker};
use crate::stack::StackOps;
use crate::tunnel::{InstallOutcome, RouteOutcome, TunnelOps};

use super::Deployment;
use super::error::DeployError;
use super::report::{DeployReport, RouteRecord};
use super::state::{Activated, DnsRouted, Initialized, Stable, StackStarted};

/// Result type for transitions that hand the deployment back on failure.
pub type TransitionResult<T, S> = Result<Deployment<T>, (Deployment<S>, DeployError)>;

// =============================================================================
// Internal Helpers
// =============================================================================

impl<S> Deployment<S> {
    /// Internal helper to move into the next state.
    fn transition<T>(self, state: T) -> Deployment<T> {
        Deployment {
            config: self.config,
            gate: self.gate,
            started_at: self.started_at,
            state,
        }
    }
}

// =============================================================================
// Initialized -> StackStarted
// =============================================================================

impl Deployment<Initialized> {
    /// Bring the container stack up.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::StackStartFailed` if the stack cannot be started.
    #[must_use = "deployment state must be used"]
    pub async fn start_stack<K: StackOps + ?Sized>(
        self,
        stack: &K,
    ) -> Result<Deployment<StackStarted>, DeployError> {
        stack.start_stack().await?;
        Ok(self.transition(StackStarted))
    }
}

// =============================================================================
// StackStarted -> Stable
// =============================================================================

impl Deployment<StackStarted> {
    /// Run the health gate until every running critical service is healthy.
    ///
    /// Critical services that are stopped or missing do not hold the gate;
    /// each one is recorded as a warning in `diag`.
    ///
    /// # Errors
    ///
    /// Returns `(self, DeployError::NotStable)` when the timeout expires and
    /// `(self, DeployError::HealthGate)` when the runtime cannot be queried.
    /// The stack is left running in both cases.
    #[must_use = "deployment state must be used"]
    pub async fn wait_until_stable<P, T>(
        self,
        probe: &P,
        ticker: &mut T,
        diag: &mut Diagnostics,
        on_status: impl FnMut(&StatusLine) + Send,
    ) -> TransitionResult<Stable, StackStarted>
    where
        P: ContainerProbe + ?Sized,
        T: Ticker + ?Sized,
    {
        let result = Sequencer::new(&self.gate, probe)
            .on_status(on_status)
            .run(ticker)
            .await;

        let report = match result {
            Ok(report) => report,
            Err(e) => return Err((self, DeployError::HealthGate(e))),
        };

        match report.outcome {
            SequencerOutcome::AllStable => {
                for absent in report.snapshot.absent() {
                    diag.warn(Warning::critical_service_absent(format!(
                        "critical service {} is {} and did not gate activation",
                        absent.service, absent.state
                    )));
                }
                Ok(self.transition(Stable { report }))
            }
            SequencerOutcome::TimedOut => {
                let blocking = report
                    .snapshot
                    .blocking()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                let err = DeployError::NotStable {
                    waited: report.elapsed,
                    blocking,
                    snapshot: report.snapshot,
                };
                Err((self, err))
            }
        }
    }
}

// =============================================================================
// Stable -> DnsRouted
// =============================================================================

impl Deployment<Stable> {
    /// Create a DNS route for every public hostname, in configured order.
    ///
    /// An existing record is recorded as a warning rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Activation` on the first route that fails.
    #[must_use = "deployment state must be used"]
    pub async fn route_dns<X: TunnelOps + ?Sized>(
        self,
        tunnel: &X,
        diag: &mut Diagnostics,
    ) -> Result<Deployment<DnsRouted>, DeployError> {
        let mut routes = Vec::new();

        for hostname in self.config.hostnames() {
            let outcome = tunnel.route_dns(&hostname).await?;
            if outcome == RouteOutcome::AlreadyExists {
                diag.warn(Warning::dns_route_exists(format!(
                    "DNS record for {hostname} already exists; left unchanged"
                )));
            }
            tracing::info!(%hostname, ?outcome, "dns route");
            routes.push(RouteRecord { hostname, outcome });
        }

        let Stable { report } = self.state;
        Ok(Deployment {
            config: self.config,
            gate: self.gate,
            started_at: self.started_at,
            state: DnsRouted { report, routes },
        })
    }
}

// =============================================================================
// DnsRouted -> Activated
// =============================================================================

impl Deployment<DnsRouted> {
    /// Install the tunnel client as a persistent service.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Activation` if the install fails.
    #[must_use = "deployment state must be used"]
    pub async fn install_tunnel<X: TunnelOps + ?Sized>(
        self,
        tunnel: &X,
        diag: &mut Diagnostics,
    ) -> Result<Deployment<Activated>, DeployError> {
        let outcome = tunnel.install_service().await?;
        if outcome == InstallOutcome::AlreadyInstalled {
            diag.warn(Warning::tunnel_already_installed(
                "tunnel service was already installed; existing service kept",
            ));
        }

        let DnsRouted { report, routes } = self.state;
        Ok(Deployment {
            config: self.config,
            gate: self.gate,
            started_at: self.started_at,
            state: Activated {
                report,
                routes,
                tunnel: outcome,
            },
        })
    }

    pub fn routes(&self) -> &[RouteRecord] {
        &self.state.routes
    }
}

// =============================================================================
// Activated - Terminal State
// =============================================================================

impl Deployment<Activated> {
    /// Consume the deployment and summarize it.
    pub fn finish(self) -> DeployReport {
        let Activated {
            report,
            routes,
            tunnel,
        } = self.state;
        DeployReport {
            started_at: self.started_at,
            finished_at: Utc::now(),
            polls: report.polls,
            waited: report.elapsed,
            routes,
            tunnel,
        }
    }
}
