// ABOUTME: Container runtime access: detection, connection, and health probing.
// ABOUTME: Exposes the ContainerProbe capability and its bollard implementation.

mod bollard;
mod detection;
mod error;
mod health;
mod probe;
mod types;

pub use self::bollard::{BollardProbe, ConnectionError};
pub use detection::{DetectionError, detect_local};
pub use error::{RuntimeError, RuntimeErrorKind};
pub use health::HealthState;
pub use probe::{ContainerProbe, ProbeError};
pub use types::{RuntimeConfig, RuntimeInfo, RuntimeType};
