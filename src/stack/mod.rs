// ABOUTME: Container stack lifecycle collaborator.
// ABOUTME: Defines the StackOps capability and its docker compose implementation.

mod compose;

pub use compose::{ComposeCommand, ComposeStack, DEFAULT_UP_TIMEOUT};

use crate::process::CommandError;
use async_trait::async_trait;
use std::path::PathBuf;

/// Brings the whole container stack up.
#[async_trait]
pub trait StackOps: Send + Sync {
    /// Start every service in the stack, detached. Invoked once per deployment.
    async fn start_stack(&self) -> Result<(), StackError>;
}

/// Errors starting the stack.
#[derive(Debug, thiserror::Error)]
pub enum StackError {
    #[error("neither 'docker compose' nor 'docker-compose' is available")]
    ComposeNotFound,

    #[error("compose file does not exist: {0}")]
    ComposeFileMissing(PathBuf),

    #[error(transparent)]
    Command(#[from] CommandError),
}
