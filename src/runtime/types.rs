// ABOUTME: Which container runtime answers on which local socket.
// ABOUTME: Detected RuntimeInfo plus the optional runtime override from mediastack.yml.

use serde::{Deserialize, Serialize};
use std::fmt;

pub(crate) const ROOTFUL_PODMAN_SOCKET: &str = "/run/podman/podman.sock";
pub(crate) const DOCKER_SOCKET: &str = "/var/run/docker.sock";

/// Container engine behind the Docker-compatible API socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeType {
    Docker,
    Podman,
}

impl RuntimeType {
    /// System-wide socket used when the config names a runtime but no socket.
    pub fn default_socket(self) -> &'static str {
        match self {
            RuntimeType::Docker => DOCKER_SOCKET,
            RuntimeType::Podman => ROOTFUL_PODMAN_SOCKET,
        }
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeType::Docker => f.write_str("docker"),
            RuntimeType::Podman => f.write_str("podman"),
        }
    }
}

/// Runtime found on this host, ready for [`BollardProbe::connect`](super::BollardProbe::connect).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    pub runtime_type: RuntimeType,
    pub socket_path: String,
}

impl fmt::Display for RuntimeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.runtime_type, self.socket_path)
    }
}

/// `runtime:` section of the config. Empty means auto-detect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub runtime: Option<RuntimeType>,
    #[serde(default)]
    pub socket: Option<String>,
}

impl RuntimeConfig {
    /// The pinned runtime and its socket, if the config pins one.
    ///
    /// A socket without a runtime is ignored; detection still runs.
    pub fn pinned(&self) -> Option<RuntimeInfo> {
        let runtime_type = self.runtime?;
        let socket_path = self
            .socket
            .clone()
            .unwrap_or_else(|| runtime_type.default_socket().to_string());
        Some(RuntimeInfo {
            runtime_type,
            socket_path,
        })
    }
}
