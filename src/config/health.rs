// ABOUTME: Health gate timing configuration.
// ABOUTME: Poll interval, timeout budget, report cadence, and per-probe deadline.

use crate::sequencer::{
    DEFAULT_POLL_INTERVAL, DEFAULT_PROBE_TIMEOUT, DEFAULT_REPORT_INTERVAL, DEFAULT_TIMEOUT,
};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthConfig {
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default = "default_report_interval", with = "humantime_serde")]
    pub report_interval: Duration,

    #[serde(default = "default_probe_timeout", with = "humantime_serde")]
    pub probe_timeout: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            report_interval: DEFAULT_REPORT_INTERVAL,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

impl HealthConfig {
    /// Apply command-line overrides.
    pub fn with_overrides(mut self, timeout: Option<Duration>, poll_interval: Option<Duration>) -> Self {
        if let Some(timeout) = timeout {
            self.timeout = timeout;
        }
        if let Some(interval) = poll_interval {
            self.poll_interval = interval;
        }
        self
    }
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_report_interval() -> Duration {
    DEFAULT_REPORT_INTERVAL
}

fn default_probe_timeout() -> Duration {
    DEFAULT_PROBE_TIMEOUT
}
