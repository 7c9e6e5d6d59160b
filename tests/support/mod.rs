// ABOUTME: Test support utilities.
// ABOUTME: Scripted probe, recording ticker, and fake stack/tunnel collaborators.

use async_trait::async_trait;
use mediastack::process::CommandError;
use mediastack::runtime::{ContainerProbe, HealthState, ProbeError};
use mediastack::sequencer::{DeploymentConfig, Ticker};
use mediastack::stack::{StackError, StackOps};
use mediastack::tunnel::{InstallOutcome, RouteOutcome, TunnelError, TunnelOps};
use mediastack::types::{Hostname, ServiceName};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Once};
use std::time::Duration;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("mediastack=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[allow(dead_code)]
pub fn name(value: &str) -> ServiceName {
    ServiceName::new(value).unwrap()
}

/// Config with the given services and timing, defaults elsewhere.
#[allow(dead_code)]
pub fn gate(services: &[&str], poll_secs: u64, timeout_secs: u64) -> DeploymentConfig {
    DeploymentConfig::builder(services.iter().map(|s| name(s)))
        .poll_interval(Duration::from_secs(poll_secs))
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap()
}

/// Shared, ordered record of collaborator calls.
pub type CallLog = Arc<Mutex<Vec<String>>>;

#[allow(dead_code)]
pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

// =============================================================================
// ScriptedProbe
// =============================================================================

/// Probe answering from per-service scripts.
///
/// The n-th query for a service returns the n-th scripted state; the last
/// state repeats once the script runs out. Unscripted services are `NotFound`.
#[derive(Default)]
#[allow(dead_code)]
pub struct ScriptedProbe {
    scripts: HashMap<ServiceName, Vec<HealthState>>,
    calls: Mutex<HashMap<ServiceName, usize>>,
    order: Mutex<Vec<ServiceName>>,
    unavailable: Option<(ServiceName, usize)>,
    hang: Option<ServiceName>,
}

#[allow(dead_code)]
impl ScriptedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, service: &str, states: &[HealthState]) -> Self {
        self.scripts.insert(name(service), states.to_vec());
        self
    }

    pub fn always(self, service: &str, state: HealthState) -> Self {
        self.script(service, &[state])
    }

    /// Fail with `ProbeError::Unavailable` from the given (zero-based) query on.
    pub fn unavailable_from(mut self, service: &str, query: usize) -> Self {
        self.unavailable = Some((name(service), query));
        self
    }

    /// Never answer for this service.
    pub fn hang_on(mut self, service: &str) -> Self {
        self.hang = Some(name(service));
        self
    }

    pub fn calls(&self, service: &str) -> usize {
        self.calls.lock().get(&name(service)).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }

    /// Services in the order their queries started.
    pub fn query_order(&self) -> Vec<ServiceName> {
        self.order.lock().clone()
    }
}

#[async_trait]
impl ContainerProbe for ScriptedProbe {
    async fn query_health(&self, service: &ServiceName) -> Result<HealthState, ProbeError> {
        let index = {
            let mut calls = self.calls.lock();
            let count = calls.entry(service.clone()).or_insert(0);
            let index = *count;
            *count += 1;
            index
        };
        self.order.lock().push(service.clone());

        if self.hang.as_ref() == Some(service) {
            std::future::pending::<()>().await;
        }
        if let Some((failing, from)) = &self.unavailable
            && failing == service
            && index >= *from
        {
            return Err(ProbeError::Unavailable("connection refused".to_string()));
        }

        let state = match self.scripts.get(service) {
            Some(script) if !script.is_empty() => script[index.min(script.len() - 1)],
            _ => HealthState::NotFound,
        };
        Ok(state)
    }
}

// =============================================================================
// RecordingTicker
// =============================================================================

/// Ticker that returns immediately and records every requested wait.
#[derive(Debug, Default)]
pub struct RecordingTicker {
    pub waits: Vec<Duration>,
}

#[allow(dead_code)]
impl RecordingTicker {
    pub fn total(&self) -> Duration {
        self.waits.iter().sum()
    }
}

#[async_trait]
impl Ticker for RecordingTicker {
    async fn wait(&mut self, period: Duration) {
        self.waits.push(period);
    }
}

// =============================================================================
// FakeStack / FakeTunnel
// =============================================================================

/// Stack that records `start_stack` calls.
#[allow(dead_code)]
pub struct FakeStack {
    log: CallLog,
    fail: bool,
}

#[allow(dead_code)]
impl FakeStack {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: Arc::clone(log),
            fail: false,
        }
    }

    pub fn failing(log: &CallLog) -> Self {
        Self {
            log: Arc::clone(log),
            fail: true,
        }
    }
}

#[async_trait]
impl StackOps for FakeStack {
    async fn start_stack(&self) -> Result<(), StackError> {
        self.log.lock().push("start_stack".to_string());
        if self.fail {
            return Err(StackError::ComposeFileMissing(PathBuf::from(
                "/srv/media/docker-compose.yml",
            )));
        }
        Ok(())
    }
}

/// Tunnel that records route and install calls.
#[allow(dead_code)]
pub struct FakeTunnel {
    log: CallLog,
    existing: HashSet<String>,
    failing_route: Option<String>,
    already_installed: bool,
    fail_install: bool,
}

#[allow(dead_code)]
impl FakeTunnel {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: Arc::clone(log),
            existing: HashSet::new(),
            failing_route: None,
            already_installed: false,
            fail_install: false,
        }
    }

    pub fn with_existing_route(mut self, hostname: &str) -> Self {
        self.existing.insert(hostname.to_string());
        self
    }

    pub fn with_failing_route(mut self, hostname: &str) -> Self {
        self.failing_route = Some(hostname.to_string());
        self
    }

    pub fn already_installed(mut self) -> Self {
        self.already_installed = true;
        self
    }

    pub fn failing_install(mut self) -> Self {
        self.fail_install = true;
        self
    }
}

fn failed(command: &str, stderr: &str) -> CommandError {
    CommandError::Failed {
        command: command.to_string(),
        stderr: stderr.to_string(),
        exit_code: Some(1),
    }
}

#[async_trait]
impl TunnelOps for FakeTunnel {
    async fn route_dns(&self, hostname: &Hostname) -> Result<RouteOutcome, TunnelError> {
        self.log.lock().push(format!("route_dns {hostname}"));
        if self.failing_route.as_deref() == Some(hostname.as_str()) {
            return Err(TunnelError::Route {
                hostname: hostname.clone(),
                source: failed("cloudflared tunnel route dns", "zone not found"),
            });
        }
        if self.existing.contains(hostname.as_str()) {
            return Ok(RouteOutcome::AlreadyExists);
        }
        Ok(RouteOutcome::Created)
    }

    async fn install_service(&self) -> Result<InstallOutcome, TunnelError> {
        self.log.lock().push("install_service".to_string());
        if self.fail_install {
            return Err(TunnelError::Install(failed(
                "cloudflared service install",
                "permission denied",
            )));
        }
        if self.already_installed {
            return Ok(InstallOutcome::AlreadyInstalled);
        }
        Ok(InstallOutcome::Installed)
    }
}
