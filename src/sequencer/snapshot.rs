// ABOUTME: Per-tick health snapshot of the critical services.
// ABOUTME: Rebuilt from live container state on every poll and then discarded.

use crate::runtime::HealthState;
use crate::types::ServiceName;
use serde::Serialize;
use std::fmt;

/// Health of one critical service at one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceHealth {
    pub service: ServiceName,
    pub state: HealthState,
}

impl fmt::Display for ServiceHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.service, self.state)
    }
}

/// Ordered health readings taken at one poll tick, in critical-list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollSnapshot {
    tick: u32,
    services: Vec<ServiceHealth>,
}

impl PollSnapshot {
    pub fn new(tick: u32, services: Vec<ServiceHealth>) -> Self {
        Self { tick, services }
    }

    /// 1-based tick that produced this snapshot.
    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn services(&self) -> &[ServiceHealth] {
        &self.services
    }

    /// Services that are running but not yet confirmed healthy.
    pub fn blocking(&self) -> impl Iterator<Item = &ServiceHealth> {
        self.services.iter().filter(|s| s.state.is_blocking())
    }

    /// Services whose container is stopped or missing.
    pub fn absent(&self) -> impl Iterator<Item = &ServiceHealth> {
        self.services.iter().filter(|s| s.state.is_absent())
    }

    /// No service is blocking.
    pub fn is_stable(&self) -> bool {
        self.blocking().next().is_none()
    }

    pub fn state_of(&self, service: &ServiceName) -> Option<HealthState> {
        self.services
            .iter()
            .find(|s| &s.service == service)
            .map(|s| s.state)
    }
}

/// Join readings as `name (state), name (state)`.
pub(crate) fn describe<'a>(entries: impl Iterator<Item = &'a ServiceHealth>) -> String {
    entries
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
