// ABOUTME: Configuration types and parsing for mediastack.yml.
// ABOUTME: Handles YAML parsing, discovery, env interpolation, and sequencer settings.

mod deserialize;
mod env_value;
mod health;
mod tunnel;

pub use env_value::EnvValue;
pub use health::HealthConfig;
pub use tunnel::TunnelConfig;

use crate::error::{Error, Result};
use crate::runtime::RuntimeConfig;
use crate::sequencer::{ConfigurationError, DeploymentConfig};
use crate::stack::ComposeStack;
use crate::types::{Domain, Hostname, ServiceName, Subdomain};
use deserialize::deserialize_critical_services;
use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "mediastack.yml";
pub const CONFIG_FILENAME_ALT: &str = "mediastack.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".mediastack/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct StackConfig {
    /// Stack root; relative compose paths resolve against it.
    pub root: PathBuf,

    #[serde(default = "default_compose_file")]
    pub compose_file: PathBuf,

    #[serde(default)]
    pub project: Option<String>,

    #[serde(default = "default_compose_timeout", with = "humantime_serde")]
    pub compose_timeout: Duration,

    pub domain: Domain,

    pub tunnel: TunnelConfig,

    /// Subdomains routed through the tunnel, in creation order.
    #[serde(default)]
    pub public_services: Vec<Subdomain>,

    /// Containers that gate activation, in poll order.
    #[serde(deserialize_with = "deserialize_critical_services")]
    pub critical_services: NonEmpty<ServiceName>,

    #[serde(default)]
    pub health: HealthConfig,

    #[serde(default)]
    pub runtime: RuntimeConfig,
}

fn default_compose_file() -> PathBuf {
    PathBuf::from("docker-compose.yml")
}

fn default_compose_timeout() -> Duration {
    crate::stack::DEFAULT_UP_TIMEOUT
}

impl StackConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Validated sequencer inputs.
    pub fn deployment_config(&self) -> std::result::Result<DeploymentConfig, ConfigurationError> {
        DeploymentConfig::builder(self.critical_services.iter().cloned())
            .poll_interval(self.health.poll_interval)
            .timeout(self.health.timeout)
            .report_interval(self.health.report_interval)
            .probe_timeout(self.health.probe_timeout)
            .build()
    }

    /// Public hostnames in configured order.
    pub fn hostnames(&self) -> Vec<Hostname> {
        self.public_services
            .iter()
            .map(|sub| self.domain.hostname(sub))
            .collect()
    }

    /// Apply command-line overrides to the health settings.
    pub fn with_health_overrides(
        mut self,
        timeout: Option<Duration>,
        poll_interval: Option<Duration>,
    ) -> Self {
        self.health = self.health.with_overrides(timeout, poll_interval);
        self
    }

    /// Compose file path, resolved against the stack root.
    pub fn compose_path(&self) -> PathBuf {
        self.compose_stack().compose_file().to_path_buf()
    }

    /// Compose stack rooted at the configured root.
    pub fn compose_stack(&self) -> ComposeStack {
        let stack = ComposeStack::new(&self.root, &self.compose_file).timeout(self.compose_timeout);
        match &self.project {
            Some(project) => stack.project(project),
            None => stack,
        }
    }
}

/// Parse a duration such as `90s`, `5m` or plain seconds (`300`).
pub fn parse_duration(value: &str) -> std::result::Result<Duration, String> {
    if let Ok(secs) = value.trim().parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    let de = serde::de::value::StrDeserializer::<serde::de::value::Error>::new(value.trim());
    humantime_serde::deserialize(de).map_err(|e: serde::de::value::Error| e.to_string())
}
