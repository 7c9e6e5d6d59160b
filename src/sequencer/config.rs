// ABOUTME: Validated, immutable inputs for one sequencer run.
// ABOUTME: Invalid combinations are rejected before the poll loop can start.

use crate::types::ServiceName;
use nonempty::NonEmpty;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Rejected sequencer configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("at least one critical service is required")]
    NoCriticalServices,

    #[error("critical service listed more than once: {0}")]
    DuplicateService(ServiceName),

    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("health timeout must be greater than zero")]
    ZeroTimeout,

    #[error("health timeout ({timeout:?}) is shorter than the poll interval ({poll_interval:?})")]
    TimeoutShorterThanInterval {
        timeout: Duration,
        poll_interval: Duration,
    },

    #[error("status report interval must be greater than zero")]
    ZeroReportInterval,

    #[error("probe timeout must be greater than zero")]
    ZeroProbeTimeout,
}

/// Inputs for one sequencer run. Only constructible through
/// [`DeploymentConfigBuilder::build`], so every instance is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
    critical_services: NonEmpty<ServiceName>,
    poll_interval: Duration,
    timeout: Duration,
    report_interval: Duration,
    probe_timeout: Duration,
}

impl DeploymentConfig {
    /// Start building a config for the given critical services, in gate order.
    pub fn builder(critical_services: impl IntoIterator<Item = ServiceName>) -> DeploymentConfigBuilder {
        DeploymentConfigBuilder {
            critical_services: critical_services.into_iter().collect(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            report_interval: DEFAULT_REPORT_INTERVAL,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn critical_services(&self) -> &NonEmpty<ServiceName> {
        &self.critical_services
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn report_interval(&self) -> Duration {
        self.report_interval
    }

    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    /// Upper bound on the number of poll ticks in one run.
    pub fn max_polls(&self) -> u32 {
        let timeout = self.timeout.as_nanos();
        let interval = self.poll_interval.as_nanos();
        u32::try_from(timeout.div_ceil(interval)).unwrap_or(u32::MAX)
    }
}

/// Builder for [`DeploymentConfig`].
#[derive(Debug, Clone)]
#[must_use = "call build() to validate the configuration"]
pub struct DeploymentConfigBuilder {
    critical_services: Vec<ServiceName>,
    poll_interval: Duration,
    timeout: Duration,
    report_interval: Duration,
    probe_timeout: Duration,
}

impl DeploymentConfigBuilder {
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<DeploymentConfig, ConfigurationError> {
        {
            let mut seen = HashSet::new();
            for service in &self.critical_services {
                if !seen.insert(service) {
                    return Err(ConfigurationError::DuplicateService(service.clone()));
                }
            }
        }

        let critical_services =
            NonEmpty::from_vec(self.critical_services).ok_or(ConfigurationError::NoCriticalServices)?;

        if self.poll_interval.is_zero() {
            return Err(ConfigurationError::ZeroPollInterval);
        }
        if self.timeout.is_zero() {
            return Err(ConfigurationError::ZeroTimeout);
        }
        if self.timeout < self.poll_interval {
            return Err(ConfigurationError::TimeoutShorterThanInterval {
                timeout: self.timeout,
                poll_interval: self.poll_interval,
            });
        }
        if self.report_interval.is_zero() {
            return Err(ConfigurationError::ZeroReportInterval);
        }
        if self.probe_timeout.is_zero() {
            return Err(ConfigurationError::ZeroProbeTimeout);
        }

        Ok(DeploymentConfig {
            critical_services,
            poll_interval: self.poll_interval,
            timeout: self.timeout,
            report_interval: self.report_interval,
            probe_timeout: self.probe_timeout,
        })
    }
}
