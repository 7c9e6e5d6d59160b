// ABOUTME: Summary of a finished deployment.
// ABOUTME: Serializable for JSON output.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use crate::tunnel::{InstallOutcome, RouteOutcome};
use crate::types::Hostname;

/// One DNS route created (or found) during activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRecord {
    pub hostname: Hostname,
    pub outcome: RouteOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub polls: u32,
    #[serde(with = "humantime_serde")]
    pub waited: Duration,
    pub routes: Vec<RouteRecord>,
    pub tunnel: InstallOutcome,
}
