// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Gives the critical service list a precise error when empty.

use nonempty::NonEmpty;
use serde::Deserialize;

use crate::types::ServiceName;

pub fn deserialize_critical_services<'de, D>(deserializer: D) -> Result<NonEmpty<ServiceName>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let services: Vec<ServiceName> = Vec::deserialize(deserializer)?;
    NonEmpty::from_vec(services)
        .ok_or_else(|| serde::de::Error::custom("at least one critical service is required"))
}
