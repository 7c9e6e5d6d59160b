// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: Holds the stack config and validated sequencer inputs across transitions.

use chrono::{DateTime, Utc};

use crate::config::StackConfig;
use crate::sequencer::DeploymentConfig;

use super::state::{Initialized, StackStarted};

/// A deployment in progress, parameterized by its current state.
///
/// The state type parameter `S` carries what earlier transitions proved
/// (the health report, created routes). Tunnel activation methods exist
/// only on states reached through a stable health gate.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) config: StackConfig,
    pub(crate) gate: DeploymentConfig,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) state: S,
}

impl Deployment<Initialized> {
    /// Create a deployment that will start the stack itself.
    pub fn new(config: StackConfig, gate: DeploymentConfig) -> Self {
        Deployment {
            config,
            gate,
            started_at: Utc::now(),
            state: Initialized,
        }
    }
}

impl Deployment<StackStarted> {
    /// Attach to a stack that is already running, skipping `start_stack()`.
    pub fn attach(config: StackConfig, gate: DeploymentConfig) -> Self {
        Deployment {
            config,
            gate,
            started_at: Utc::now(),
            state: StackStarted,
        }
    }
}

impl<S> Deployment<S> {
    /// Get the stack config.
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Get the validated sequencer inputs.
    pub fn gate(&self) -> &DeploymentConfig {
        &self.gate
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn state(&self) -> &S {
        &self.state
    }
}
