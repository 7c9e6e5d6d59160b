// ABOUTME: The health-gated poll loop deciding when a deployment is stable.
// ABOUTME: Polls critical services each tick and ends in exactly one SequencerOutcome.

use std::fmt;
use std::time::Duration;

use futures::future::try_join_all;
use serde::Serialize;

use super::config::DeploymentConfig;
use super::snapshot::{PollSnapshot, ServiceHealth, describe};
use super::ticker::{Ticker, TokioTicker};
use crate::runtime::{ContainerProbe, ProbeError};
use crate::types::ServiceName;

/// Terminal result of one sequencer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencerOutcome {
    /// No running critical service is still unconfirmed.
    AllStable,
    /// The timeout budget ran out while a running service was still unconfirmed.
    TimedOut,
}

impl fmt::Display for SequencerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequencerOutcome::AllStable => write!(f, "all critical services stable"),
            SequencerOutcome::TimedOut => write!(f, "timed out waiting for critical services"),
        }
    }
}

/// Fatal sequencer failures. A timeout is not one of them.
#[derive(Debug, thiserror::Error)]
pub enum SequencerError {
    #[error("cannot query health of {service}: {source}")]
    ProbeUnavailable {
        service: ServiceName,
        #[source]
        source: ProbeError,
    },

    #[error("health query for {service} did not answer within {timeout:?}")]
    ProbeTimedOut {
        service: ServiceName,
        timeout: Duration,
    },
}

/// Sequencer state machine: `Polling` until a terminal outcome is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Polling,
    Done(SequencerOutcome),
}

impl SequencerState {
    /// Apply a fresh snapshot. A stable snapshot ends the run successfully.
    pub fn observe(self, snapshot: &PollSnapshot) -> Self {
        match self {
            SequencerState::Polling if snapshot.is_stable() => {
                SequencerState::Done(SequencerOutcome::AllStable)
            }
            other => other,
        }
    }

    /// Apply a completed wait. Reaching the budget exactly counts as expired.
    pub fn waited(self, elapsed: Duration, timeout: Duration) -> Self {
        match self {
            SequencerState::Polling if elapsed >= timeout => {
                SequencerState::Done(SequencerOutcome::TimedOut)
            }
            other => other,
        }
    }

    pub fn outcome(self) -> Option<SequencerOutcome> {
        match self {
            SequencerState::Polling => None,
            SequencerState::Done(outcome) => Some(outcome),
        }
    }
}

/// Everything a caller needs after the loop ends.
#[derive(Debug, Clone, Serialize)]
pub struct SequencerReport {
    pub outcome: SequencerOutcome,
    /// Number of snapshots taken.
    pub polls: u32,
    /// Logical time waited between polls.
    #[serde(with = "humantime_serde")]
    pub elapsed: Duration,
    /// The snapshot that decided the outcome.
    pub snapshot: PollSnapshot,
}

impl SequencerReport {
    pub fn is_stable(&self) -> bool {
        self.outcome == SequencerOutcome::AllStable
    }
}

/// Periodic progress line emitted while services are still blocking.
#[derive(Debug, Clone, Serialize)]
pub struct StatusLine {
    #[serde(with = "humantime_serde")]
    pub elapsed: Duration,
    pub snapshot: PollSnapshot,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "waiting on {} after {}s: {}",
            self.snapshot.blocking().count(),
            self.elapsed.as_secs(),
            describe(self.snapshot.blocking())
        )?;
        if self.snapshot.absent().next().is_some() {
            write!(f, "; not running: {}", describe(self.snapshot.absent()))?;
        }
        Ok(())
    }
}

type StatusCallback<'a> = Box<dyn FnMut(&StatusLine) + Send + 'a>;

/// Health-gated deployment sequencer.
///
/// Each tick queries every critical service, then either finishes with
/// [`SequencerOutcome::AllStable`], waits one poll interval, or finishes with
/// [`SequencerOutcome::TimedOut`] once the waited time reaches the budget.
/// Elapsed time is counted in completed waits, so a run is fully determined
/// by the config and the probe's answers.
pub struct Sequencer<'a, P> {
    config: &'a DeploymentConfig,
    probe: P,
    on_status: Option<StatusCallback<'a>>,
}

impl<'a, P: ContainerProbe> Sequencer<'a, P> {
    pub fn new(config: &'a DeploymentConfig, probe: P) -> Self {
        Self {
            config,
            probe,
            on_status: None,
        }
    }

    /// Receive each status line in addition to the tracing event.
    pub fn on_status(mut self, callback: impl FnMut(&StatusLine) + Send + 'a) -> Self {
        self.on_status = Some(Box::new(callback));
        self
    }

    /// Run the poll loop to its terminal outcome.
    ///
    /// # Errors
    ///
    /// Returns `SequencerError` when the runtime cannot be queried. The loop
    /// stops at the first such failure.
    pub async fn run<T: Ticker + ?Sized>(
        mut self,
        ticker: &mut T,
    ) -> Result<SequencerReport, SequencerError> {
        let poll_interval = self.config.poll_interval();
        let timeout = self.config.timeout();
        let mut state = SequencerState::Polling;
        let mut elapsed = Duration::ZERO;
        let mut polls = 0;
        let mut last_report: Option<Duration> = None;

        loop {
            polls += 1;
            let snapshot = take_snapshot(self.config, &self.probe, polls).await?;

            state = state.observe(&snapshot);
            if let Some(outcome) = state.outcome() {
                tracing::info!(polls, elapsed_secs = elapsed.as_secs(), "critical services stable");
                return Ok(SequencerReport {
                    outcome,
                    polls,
                    elapsed,
                    snapshot,
                });
            }

            let due = last_report
                .is_none_or(|at| elapsed.saturating_sub(at) >= self.config.report_interval());
            if due {
                self.report(elapsed, &snapshot);
                last_report = Some(elapsed);
            }

            ticker.wait(poll_interval).await;
            elapsed = elapsed.saturating_add(poll_interval);

            state = state.waited(elapsed, timeout);
            if let Some(outcome) = state.outcome() {
                tracing::warn!(
                    polls,
                    elapsed_secs = elapsed.as_secs(),
                    blocking = %describe(snapshot.blocking()),
                    "timed out waiting for critical services"
                );
                return Ok(SequencerReport {
                    outcome,
                    polls,
                    elapsed,
                    snapshot,
                });
            }
        }
    }

    fn report(&mut self, elapsed: Duration, snapshot: &PollSnapshot) {
        let line = StatusLine {
            elapsed,
            snapshot: snapshot.clone(),
        };
        tracing::info!("{line}");
        if let Some(callback) = self.on_status.as_mut() {
            callback(&line);
        }
    }
}

/// Query every critical service once and collect the results in list order.
///
/// Queries run concurrently; the snapshot is built only after all of them
/// answered. Each query is bounded by the configured probe timeout.
pub async fn take_snapshot<P: ContainerProbe + ?Sized>(
    config: &DeploymentConfig,
    probe: &P,
    tick: u32,
) -> Result<PollSnapshot, SequencerError> {
    let probe_timeout = config.probe_timeout();

    let reads = config.critical_services().iter().map(|service| async move {
        match tokio::time::timeout(probe_timeout, probe.query_health(service)).await {
            Ok(Ok(state)) => Ok(ServiceHealth {
                service: service.clone(),
                state,
            }),
            Ok(Err(source)) => Err(SequencerError::ProbeUnavailable {
                service: service.clone(),
                source,
            }),
            Err(_elapsed) => Err(SequencerError::ProbeTimedOut {
                service: service.clone(),
                timeout: probe_timeout,
            }),
        }
    });

    let services = try_join_all(reads).await?;
    tracing::debug!(tick, services = %describe(services.iter()), "poll snapshot");
    Ok(PollSnapshot::new(tick, services))
}

/// Run the sequencer on the tokio timer and return only its outcome.
pub async fn run_sequencer<P: ContainerProbe>(
    config: &DeploymentConfig,
    probe: P,
) -> Result<SequencerOutcome, SequencerError> {
    let report = Sequencer::new(config, probe).run(&mut TokioTicker).await?;
    Ok(report.outcome)
}
