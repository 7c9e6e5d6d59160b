// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Tunnel activation is only reachable through a stable health gate.

mod deployment;
mod error;
mod report;
mod state;
mod transitions;

pub use deployment::Deployment;
pub use error::{DeployError, DeployErrorKind};
pub use report::{DeployReport, RouteRecord};
pub use state::{Activated, DnsRouted, Initialized, Stable, StackStarted};
pub use transitions::TransitionResult;
