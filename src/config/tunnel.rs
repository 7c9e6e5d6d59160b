// ABOUTME: Tunnel client configuration.
// ABOUTME: Tunnel id (literal or from env), client binary, config path, and command deadline.

use super::EnvValue;
use crate::error::{Error, Result};
use crate::tunnel::{CloudflaredTunnel, DEFAULT_COMMAND_TIMEOUT, TunnelId};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct TunnelConfig {
    pub id: EnvValue,

    #[serde(default = "default_binary")]
    pub binary: PathBuf,

    #[serde(default)]
    pub config: Option<PathBuf>,

    #[serde(default = "default_command_timeout", with = "humantime_serde")]
    pub command_timeout: Duration,
}

fn default_binary() -> PathBuf {
    PathBuf::from("cloudflared")
}

fn default_command_timeout() -> Duration {
    DEFAULT_COMMAND_TIMEOUT
}

impl TunnelConfig {
    /// Resolve and validate the tunnel id.
    pub fn tunnel_id(&self) -> Result<TunnelId> {
        let raw = self.id.resolve()?;
        TunnelId::new(&raw).map_err(|e| Error::InvalidConfig(format!("tunnel.id: {e}")))
    }

    /// Build the tunnel client described by this config.
    pub fn client(&self) -> Result<CloudflaredTunnel> {
        let mut client =
            CloudflaredTunnel::new(&self.binary, self.tunnel_id()?).timeout(self.command_timeout);
        if let Some(path) = &self.config {
            client = client.config(path);
        }
        Ok(client)
    }
}
