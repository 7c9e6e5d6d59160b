// ABOUTME: Error types for deployment pipeline transitions.
// ABOUTME: Covers stack start, health gate, and tunnel activation failures.

use std::time::Duration;

use crate::sequencer::{PollSnapshot, SequencerError};
use crate::stack::StackError;
use crate::tunnel::TunnelError;

/// Errors that can occur during deployment state transitions.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The stack could not be started.
    #[error("failed to start stack: {0}")]
    StackStartFailed(#[from] StackError),

    /// The health gate expired with services still unconfirmed.
    #[error(
        "critical services not healthy after {} seconds: {}. The stack is still running; \
         inspect the container logs, then re-run `mediastack activate`",
        .waited.as_secs(),
        .blocking
    )]
    NotStable {
        waited: Duration,
        blocking: String,
        snapshot: PollSnapshot,
    },

    /// The runtime could not be queried.
    #[error("health gate aborted: {0}")]
    HealthGate(#[from] SequencerError),

    /// DNS routing or tunnel install failed.
    #[error("tunnel activation failed: {0}")]
    Activation(#[from] TunnelError),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    StackStart,
    NotStable,
    ProbeFailure,
    DnsRoute,
    TunnelInstall,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::StackStartFailed(_) => DeployErrorKind::StackStart,
            DeployError::NotStable { .. } => DeployErrorKind::NotStable,
            DeployError::HealthGate(_) => DeployErrorKind::ProbeFailure,
            DeployError::Activation(TunnelError::Route { .. }) => DeployErrorKind::DnsRoute,
            DeployError::Activation(TunnelError::Install(_)) => DeployErrorKind::TunnelInstall,
        }
    }

    /// True when the stack is healthy enough to retry activation later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            DeployErrorKind::NotStable | DeployErrorKind::DnsRoute | DeployErrorKind::TunnelInstall
        )
    }
}
