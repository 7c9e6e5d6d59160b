// ABOUTME: Application-wide error types for mediastack.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::deploy::DeployError;
use crate::runtime::RuntimeError;
use crate::sequencer::{ConfigurationError, SequencerError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid health settings: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("health gate failed: {0}")]
    Sequencer(#[from] SequencerError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error("interrupted; the stack was left as it is")]
    Interrupted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
