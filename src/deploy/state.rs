// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: Later states carry the evidence gathered by earlier transitions.

use crate::sequencer::SequencerReport;
use crate::tunnel::InstallOutcome;

use super::report::RouteRecord;

/// Initial state: config validated, stack not started yet.
/// Available actions: `start_stack()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// Stack started (or already running).
/// Available actions: `wait_until_stable()`
#[derive(Debug, Clone, Copy, Default)]
pub struct StackStarted;

/// Every running critical service is healthy.
/// Available actions: `route_dns()`
#[derive(Debug, Clone)]
pub struct Stable {
    pub(crate) report: SequencerReport,
}

impl Stable {
    pub fn report(&self) -> &SequencerReport {
        &self.report
    }
}

/// Public hostnames routed to the tunnel.
/// Available actions: `install_tunnel()`
#[derive(Debug, Clone)]
pub struct DnsRouted {
    pub(crate) report: SequencerReport,
    pub(crate) routes: Vec<RouteRecord>,
}

/// Tunnel client installed as a service.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Activated {
    pub(crate) report: SequencerReport,
    pub(crate) routes: Vec<RouteRecord>,
    pub(crate) tunnel: InstallOutcome,
}
