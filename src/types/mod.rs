// ABOUTME: Validated domain types shared across the crate.
// ABOUTME: Service names for container lookups and DNS names for tunnel routes.

mod hostname;
mod service_name;

pub use hostname::{Domain, Hostname, HostnameError, Subdomain};
pub use service_name::{ServiceName, ServiceNameError};
