// ABOUTME: DNS name types for public tunnel routes.
// ABOUTME: Subdomain labels follow RFC 1123; hostnames join a subdomain onto a domain.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostnameError {
    #[error("DNS label cannot be empty")]
    Empty,

    #[error("DNS label exceeds maximum length of 63 characters: {0}")]
    TooLong(String),

    #[error("DNS label cannot start or end with a hyphen: {0}")]
    EdgeHyphen(String),

    #[error("invalid character in DNS label: '{0}'")]
    InvalidChar(char),

    #[error("domain must have at least two labels: {0}")]
    NotQualified(String),
}

fn validate_label(label: &str) -> Result<(), HostnameError> {
    if label.is_empty() {
        return Err(HostnameError::Empty);
    }
    if label.len() > 63 {
        return Err(HostnameError::TooLong(label.to_string()));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(HostnameError::EdgeHyphen(label.to_string()));
    }
    for c in label.chars() {
        if !c.is_ascii_alphanumeric() && c != '-' {
            return Err(HostnameError::InvalidChar(c));
        }
    }
    Ok(())
}

/// A single DNS label exposed through the tunnel, e.g. `jellyfin`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Subdomain(String);

impl Subdomain {
    pub fn new(value: &str) -> Result<Self, HostnameError> {
        let value = value.trim().to_ascii_lowercase();
        validate_label(&value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subdomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Subdomain {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Subdomain::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Registered domain the tunnel publishes under, e.g. `example.com`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Domain(String);

impl Domain {
    pub fn new(value: &str) -> Result<Self, HostnameError> {
        let value = value.trim().trim_end_matches('.').to_ascii_lowercase();
        if value.is_empty() {
            return Err(HostnameError::Empty);
        }
        if !value.contains('.') {
            return Err(HostnameError::NotQualified(value));
        }
        for label in value.split('.') {
            validate_label(label)?;
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fully qualified hostname for a subdomain of this domain.
    pub fn hostname(&self, subdomain: &Subdomain) -> Hostname {
        Hostname(format!("{}.{}", subdomain, self.0))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Domain {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Domain::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Fully qualified public hostname. Only built through [`Domain::hostname`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Hostname(String);

impl Hostname {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
