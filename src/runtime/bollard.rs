// ABOUTME: Bollard-based container health probe.
// ABOUTME: Inspects containers by name over the Docker-compatible API (Docker and Podman).

use super::health::HealthState;
use super::probe::{ContainerProbe, ProbeError};
use super::types::{RuntimeInfo, RuntimeType};
use crate::types::ServiceName;
use async_trait::async_trait;
use bollard::Docker;
use bollard::models::HealthStatusEnum;
use bollard::query_parameters::InspectContainerOptions;

/// Seconds bollard waits on a single API request before giving up.
const API_TIMEOUT_SECS: u64 = 120;

// =============================================================================
// Error Mapping Helpers
// =============================================================================

/// A 404 from inspect is an absent container, which is a state, not a failure.
fn map_inspect_error(e: bollard::errors::Error) -> Result<HealthState, ProbeError> {
    match &e {
        bollard::errors::Error::DockerResponseServerError { status_code, .. }
            if *status_code == 404 =>
        {
            Ok(HealthState::NotFound)
        }
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } => Err(ProbeError::Runtime(format!("{status_code}: {message}"))),
        _ => Err(ProbeError::Unavailable(e.to_string())),
    }
}

fn health_status_str(status: HealthStatusEnum) -> &'static str {
    match status {
        HealthStatusEnum::STARTING => "starting",
        HealthStatusEnum::HEALTHY => "healthy",
        HealthStatusEnum::UNHEALTHY => "unhealthy",
        _ => "none",
    }
}

// =============================================================================
// BollardProbe
// =============================================================================

/// Errors connecting to the runtime socket.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("failed to open runtime socket {socket}: {message}")]
    Socket { socket: String, message: String },

    #[error("runtime did not answer ping: {0}")]
    Unresponsive(String),
}

/// Container health probe backed by bollard.
pub struct BollardProbe {
    client: Docker,
    runtime_type: RuntimeType,
}

impl BollardProbe {
    /// Create a probe from an existing client.
    pub fn new(client: Docker, runtime_type: RuntimeType) -> Self {
        Self {
            client,
            runtime_type,
        }
    }

    /// Connect to the runtime socket described by `info`.
    pub fn connect(info: &RuntimeInfo) -> Result<Self, ConnectionError> {
        let client =
            Docker::connect_with_unix(&info.socket_path, API_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)
                .map_err(|e| ConnectionError::Socket {
                    socket: info.socket_path.clone(),
                    message: e.to_string(),
                })?;
        Ok(Self::new(client, info.runtime_type))
    }

    /// Check the runtime answers before the poll loop starts.
    pub async fn ping(&self) -> Result<(), ConnectionError> {
        self.client
            .ping()
            .await
            .map_err(|e| ConnectionError::Unresponsive(e.to_string()))?;
        Ok(())
    }

    /// Get the runtime type (Docker or Podman).
    pub fn runtime_type(&self) -> RuntimeType {
        self.runtime_type
    }
}

#[async_trait]
impl ContainerProbe for BollardProbe {
    async fn query_health(&self, service: &ServiceName) -> Result<HealthState, ProbeError> {
        let details = match self
            .client
            .inspect_container(service.as_str(), None::<InspectContainerOptions>)
            .await
        {
            Ok(details) => details,
            Err(e) => return map_inspect_error(e),
        };

        let state = details.state.as_ref();
        let running = state.and_then(|s| s.running);
        let status = state
            .and_then(|s| s.health.as_ref())
            .and_then(|h| h.status)
            .map(health_status_str);

        let health = HealthState::from_signals(status, running);
        tracing::debug!(service = %service, %health, "inspected container");
        Ok(health)
    }
}
