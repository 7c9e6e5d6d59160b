// ABOUTME: Docker Compose backed stack startup.
// ABOUTME: Detects compose v2 or v1 and runs `up -d` in the stack root.

use super::{StackError, StackOps};
use crate::process;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

const DETECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default budget for `compose up`; image pulls can be slow.
pub const DEFAULT_UP_TIMEOUT: Duration = Duration::from_secs(600);

/// Docker Compose command flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeCommand {
    /// `docker compose`
    V2,
    /// `docker-compose`
    V1,
}

impl ComposeCommand {
    /// Detect which compose command is installed, preferring v2.
    pub async fn detect() -> Result<Self, StackError> {
        let v2 = process::run(
            "docker",
            &["compose".to_string(), "version".to_string()],
            None,
            DETECT_TIMEOUT,
        )
        .await;
        if v2.is_ok_and(|o| o.status.success()) {
            return Ok(ComposeCommand::V2);
        }

        let v1 = process::run("docker-compose", &["--version".to_string()], None, DETECT_TIMEOUT).await;
        if v1.is_ok_and(|o| o.status.success()) {
            return Ok(ComposeCommand::V1);
        }

        Err(StackError::ComposeNotFound)
    }

    pub fn program(self) -> &'static str {
        match self {
            ComposeCommand::V2 => "docker",
            ComposeCommand::V1 => "docker-compose",
        }
    }

    /// Arguments that precede every compose subcommand.
    pub fn prefix(self) -> &'static [&'static str] {
        match self {
            ComposeCommand::V2 => &["compose"],
            ComposeCommand::V1 => &[],
        }
    }
}

/// Starts the stack with `docker compose up -d`.
#[derive(Debug, Clone)]
pub struct ComposeStack {
    root: PathBuf,
    compose_file: PathBuf,
    project: Option<String>,
    timeout: Duration,
    command: Option<ComposeCommand>,
}

impl ComposeStack {
    /// `compose_file` is resolved against `root` when relative.
    pub fn new(root: impl Into<PathBuf>, compose_file: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let compose_file = compose_file.into();
        let compose_file = if compose_file.is_absolute() {
            compose_file
        } else {
            root.join(compose_file)
        };
        Self {
            root,
            compose_file,
            project: None,
            timeout: DEFAULT_UP_TIMEOUT,
            command: None,
        }
    }

    /// Set the compose project name (`-p`).
    pub fn project(mut self, name: impl Into<String>) -> Self {
        self.project = Some(name.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Skip detection and use the given compose flavour.
    pub fn command(mut self, command: ComposeCommand) -> Self {
        self.command = Some(command);
        self
    }

    pub fn compose_file(&self) -> &std::path::Path {
        &self.compose_file
    }

    /// Arguments after the program name for `up -d`.
    pub fn up_args(&self, command: ComposeCommand) -> Vec<String> {
        let mut args: Vec<String> = command.prefix().iter().map(|s| s.to_string()).collect();
        args.push("-f".to_string());
        args.push(self.compose_file.display().to_string());
        if let Some(project) = &self.project {
            args.push("-p".to_string());
            args.push(project.clone());
        }
        args.push("up".to_string());
        args.push("-d".to_string());
        args
    }
}

#[async_trait]
impl StackOps for ComposeStack {
    async fn start_stack(&self) -> Result<(), StackError> {
        if !self.compose_file.is_file() {
            return Err(StackError::ComposeFileMissing(self.compose_file.clone()));
        }

        let command = match self.command {
            Some(command) => command,
            None => ComposeCommand::detect().await?,
        };
        let args = self.up_args(command);

        tracing::info!(compose_file = %self.compose_file.display(), "starting stack");
        process::run_success(command.program(), &args, Some(&self.root), self.timeout).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_compose_file_resolves_against_root() {
        let stack = ComposeStack::new("/opt/mediastack", "docker-compose.yml");
        assert_eq!(
            stack.compose_file(),
            std::path::Path::new("/opt/mediastack/docker-compose.yml")
        );
    }

    #[test]
    fn absolute_compose_file_is_kept() {
        let stack = ComposeStack::new("/opt/mediastack", "/srv/compose.yml");
        assert_eq!(stack.compose_file(), std::path::Path::new("/srv/compose.yml"));
    }

    #[test]
    fn v2_up_args_include_project() {
        let stack = ComposeStack::new("/opt/ms", "compose.yml").project("media");
        assert_eq!(
            stack.up_args(ComposeCommand::V2),
            vec!["compose", "-f", "/opt/ms/compose.yml", "-p", "media", "up", "-d"]
        );
    }

    #[test]
    fn v1_up_args_have_no_prefix() {
        let stack = ComposeStack::new("/opt/ms", "compose.yml");
        assert_eq!(
            stack.up_args(ComposeCommand::V1),
            vec!["-f", "/opt/ms/compose.yml", "up", "-d"]
        );
    }

    #[tokio::test]
    async fn missing_compose_file_fails_before_running_anything() {
        let dir = tempfile::tempdir().unwrap();
        let stack = ComposeStack::new(dir.path(), "docker-compose.yml").command(ComposeCommand::V2);
        let err = stack.start_stack().await.unwrap_err();
        assert!(matches!(err, StackError::ComposeFileMissing(_)));
    }
}
