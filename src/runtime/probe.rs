// ABOUTME: Capability trait for reading container health.
// ABOUTME: Decouples the sequencer from the concrete container runtime.

use super::health::HealthState;
use crate::types::ServiceName;
use async_trait::async_trait;

/// Reads the current health of a named container.
///
/// Implementations must report a missing container as
/// [`HealthState::NotFound`] and a stopped one as
/// [`HealthState::NotRunning`]. An `Err` means the runtime itself could not
/// be queried and aborts the whole deployment.
#[async_trait]
pub trait ContainerProbe: Send + Sync {
    async fn query_health(&self, service: &ServiceName) -> Result<HealthState, ProbeError>;
}

#[async_trait]
impl<P: ContainerProbe + ?Sized> ContainerProbe for &P {
    async fn query_health(&self, service: &ServiceName) -> Result<HealthState, ProbeError> {
        (**self).query_health(service).await
    }
}

/// Errors from probing the runtime. Container absence is never an error.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("container runtime unreachable: {0}")]
    Unavailable(String),

    #[error("container runtime error: {0}")]
    Runtime(String),
}
