// ABOUTME: cloudflared CLI implementation of TunnelOps.
// ABOUTME: Creates DNS routes and installs the tunnel as a system service.

use super::{InstallOutcome, RouteOutcome, TunnelError, TunnelId, TunnelOps};
use crate::process::{self, CommandError};
use crate::types::Hostname;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Drives the `cloudflared` binary.
#[derive(Debug, Clone)]
pub struct CloudflaredTunnel {
    binary: PathBuf,
    tunnel: TunnelId,
    config: Option<PathBuf>,
    timeout: Duration,
}

impl CloudflaredTunnel {
    pub fn new(binary: impl Into<PathBuf>, tunnel: TunnelId) -> Self {
        Self {
            binary: binary.into(),
            tunnel,
            config: None,
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Pass `--config` to every invocation.
    pub fn config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = Some(path.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn global_args(&self) -> Vec<String> {
        match &self.config {
            Some(path) => vec!["--config".to_string(), path.display().to_string()],
            None => Vec::new(),
        }
    }

    pub fn route_args(&self, hostname: &Hostname) -> Vec<String> {
        let mut args = self.global_args();
        args.extend(
            ["tunnel", "route", "dns", self.tunnel.as_str(), hostname.as_str()]
                .map(String::from),
        );
        args
    }

    pub fn install_args(&self) -> Vec<String> {
        let mut args = self.global_args();
        args.extend(["service", "install"].map(String::from));
        args
    }

    fn program(&self) -> String {
        self.binary.display().to_string()
    }
}

/// True when a failed command only reports that the target already exists.
fn reports_existing(err: &CommandError, needle: &str) -> bool {
    err.stderr()
        .is_some_and(|stderr| stderr.to_ascii_lowercase().contains(needle))
}

#[async_trait]
impl TunnelOps for CloudflaredTunnel {
    async fn route_dns(&self, hostname: &Hostname) -> Result<RouteOutcome, TunnelError> {
        let args = self.route_args(hostname);
        match process::run_success(&self.program(), &args, None, self.timeout).await {
            Ok(_) => Ok(RouteOutcome::Created),
            Err(e) if reports_existing(&e, "already exists") => Ok(RouteOutcome::AlreadyExists),
            Err(source) => Err(TunnelError::Route {
                hostname: hostname.clone(),
                source,
            }),
        }
    }

    async fn install_service(&self) -> Result<InstallOutcome, TunnelError> {
        let args = self.install_args();
        match process::run_success(&self.program(), &args, None, self.timeout).await {
            Ok(_) => Ok(InstallOutcome::Installed),
            Err(e) if reports_existing(&e, "already installed") => {
                Ok(InstallOutcome::AlreadyInstalled)
            }
            Err(source) => Err(TunnelError::Install(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Domain, Subdomain};

    fn tunnel() -> CloudflaredTunnel {
        CloudflaredTunnel::new("cloudflared", TunnelId::new("media").unwrap())
    }

    fn hostname() -> Hostname {
        Domain::new("example.com")
            .unwrap()
            .hostname(&Subdomain::new("jellyfin").unwrap())
    }

    #[test]
    fn route_args_without_config() {
        assert_eq!(
            tunnel().route_args(&hostname()),
            vec!["tunnel", "route", "dns", "media", "jellyfin.example.com"]
        );
    }

    #[test]
    fn config_flag_precedes_subcommand() {
        let tunnel = tunnel().config("/etc/cloudflared/config.yml");
        assert_eq!(
            tunnel.install_args(),
            vec!["--config", "/etc/cloudflared/config.yml", "service", "install"]
        );
    }

    fn failed(stderr: &str) -> CommandError {
        CommandError::Failed {
            command: "cloudflared tunnel route dns".to_string(),
            stderr: stderr.to_string(),
            exit_code: Some(1),
        }
    }

    #[test]
    fn existing_record_is_recognized() {
        let err = failed("Failed to add route: An A, AAAA, or CNAME record with that host already exists.");
        assert!(reports_existing(&err, "already exists"));
    }

    #[test]
    fn installed_service_is_recognized() {
        let err = failed("cloudflared service is already installed at /etc/systemd/system/cloudflared.service");
        assert!(reports_existing(&err, "already installed"));
    }

    #[test]
    fn unrelated_failures_are_not_existing() {
        assert!(!reports_existing(&failed("not logged in"), "already exists"));
        let timeout = CommandError::Timeout {
            command: "cloudflared".to_string(),
            timeout: Duration::from_secs(1),
        };
        assert!(!reports_existing(&timeout, "already exists"));
    }

    #[tokio::test]
    async fn missing_binary_fails_route_with_hostname() {
        let tunnel = CloudflaredTunnel::new(
            "/nonexistent/cloudflared",
            TunnelId::new("media").unwrap(),
        );
        let err = tunnel.route_dns(&hostname()).await.unwrap_err();
        assert!(matches!(err, TunnelError::Route { .. }));
        assert!(err.to_string().contains("jellyfin.example.com"));
    }
}
