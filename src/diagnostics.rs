// ABOUTME: Diagnostics accumulator for non-fatal warnings during deployment.
// ABOUTME: Collects warnings that shouldn't fail a deployment but should be shown to users.

use serde::Serialize;

/// Collects non-fatal warnings during deployment operations.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// A critical service was stopped or missing when the gate passed.
    pub fn critical_service_absent(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::CriticalServiceAbsent,
            message: message.into(),
        }
    }

    /// A DNS route already pointed at the tunnel.
    pub fn dns_route_exists(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::DnsRouteExists,
            message: message.into(),
        }
    }

    /// The tunnel service was already installed on this host.
    pub fn tunnel_already_installed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::TunnelAlreadyInstalled,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Critical service was not running and did not hold the gate.
    CriticalServiceAbsent,
    /// DNS record existed before this run.
    DnsRouteExists,
    /// Tunnel service existed before this run.
    TunnelAlreadyInstalled,
}
