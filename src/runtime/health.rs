// ABOUTME: Point-in-time health classification for one container.
// ABOUTME: Folds the runtime's health-status string and running flag into HealthState.

use serde::Serialize;
use std::fmt;

/// Health of a single container as read at one poll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    /// Running and its health check passes.
    Healthy,
    /// Running and its health check fails.
    Unhealthy,
    /// Running and still inside its health check start period.
    Starting,
    /// Running, but the image defines no health check.
    NoHealthcheck,
    /// The container exists but is not running.
    NotRunning,
    /// No container with this name exists.
    NotFound,
}

impl HealthState {
    /// Classify a container from its two inspection signals.
    ///
    /// `status` is the raw health status (`healthy`, `unhealthy`, `starting`,
    /// `none` or empty) and `running` the runtime's running flag. `None`
    /// means the signal could not be read. When neither resolves the
    /// container is treated as absent.
    pub fn from_signals(status: Option<&str>, running: Option<bool>) -> Self {
        match (status, running) {
            (None, None) => HealthState::NotFound,
            (_, None) | (_, Some(false)) => HealthState::NotRunning,
            (None, Some(true)) => HealthState::NoHealthcheck,
            (Some(status), Some(true)) => match status.trim().to_ascii_lowercase().as_str() {
                "healthy" => HealthState::Healthy,
                "starting" => HealthState::Starting,
                "" | "none" | "<no value>" => HealthState::NoHealthcheck,
                // "unhealthy" and anything the runtime adds later
                _ => HealthState::Unhealthy,
            },
        }
    }

    /// Whether the container process is up.
    pub fn is_running(self) -> bool {
        !matches!(self, HealthState::NotRunning | HealthState::NotFound)
    }

    /// Running but not yet confirmed healthy. Only blocking services extend the wait.
    pub fn is_blocking(self) -> bool {
        matches!(
            self,
            HealthState::Unhealthy | HealthState::Starting | HealthState::NoHealthcheck
        )
    }

    /// Container is stopped or missing.
    pub fn is_absent(self) -> bool {
        !self.is_running()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthState::Healthy => "healthy",
            HealthState::Unhealthy => "unhealthy",
            HealthState::Starting => "starting",
            HealthState::NoHealthcheck => "no healthcheck",
            HealthState::NotRunning => "not running",
            HealthState::NotFound => "not found",
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
