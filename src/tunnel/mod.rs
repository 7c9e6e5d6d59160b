// ABOUTME: Secure tunnel activation collaborator.
// ABOUTME: Defines TunnelOps for DNS routes and service install, plus the tunnel identifier.

mod cloudflared;

pub use cloudflared::{CloudflaredTunnel, DEFAULT_COMMAND_TIMEOUT};

use crate::process::CommandError;
use crate::types::Hostname;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Tunnel activation steps, run only after the stack is stable.
#[async_trait]
pub trait TunnelOps: Send + Sync {
    /// Point `hostname` at the tunnel.
    async fn route_dns(&self, hostname: &Hostname) -> Result<RouteOutcome, TunnelError>;

    /// Install the tunnel client as a persistent service and start it.
    async fn install_service(&self) -> Result<InstallOutcome, TunnelError>;
}

/// Result of creating one DNS route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteOutcome {
    Created,
    AlreadyExists,
}

/// Result of installing the tunnel service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallOutcome {
    Installed,
    AlreadyInstalled,
}

/// Errors from the tunnel client.
#[derive(Debug, Error)]
pub enum TunnelError {
    #[error("failed to route {hostname}: {source}")]
    Route {
        hostname: Hostname,
        #[source]
        source: CommandError,
    },

    #[error("failed to install tunnel service: {0}")]
    Install(#[source] CommandError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TunnelIdError {
    #[error("tunnel id cannot be empty")]
    Empty,

    #[error("tunnel id cannot contain whitespace")]
    Whitespace,
}

/// Tunnel UUID or name as understood by the tunnel client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TunnelId(String);

impl TunnelId {
    pub fn new(value: &str) -> Result<Self, TunnelIdError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(TunnelIdError::Empty);
        }
        if value.chars().any(char::is_whitespace) {
            return Err(TunnelIdError::Whitespace);
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TunnelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
