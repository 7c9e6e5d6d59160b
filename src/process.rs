// ABOUTME: Subprocess execution with a deadline for external CLI collaborators.
// ABOUTME: Maps spawn failures, timeouts, and non-zero exits to CommandError.

use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

/// Failure running an external command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("'{command}' timed out after {} seconds", .timeout.as_secs())]
    Timeout { command: String, timeout: Duration },

    #[error("failed to execute '{command}': {source}")]
    Exec {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {}: {stderr}", .exit_code.map_or("signal".to_string(), |c| format!("code {c}")))]
    Failed {
        command: String,
        stderr: String,
        exit_code: Option<i32>,
    },
}

impl CommandError {
    /// Build a `Failed` error from captured output.
    pub fn failed(command: impl Into<String>, output: &Output) -> Self {
        CommandError::Failed {
            command: command.into(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            exit_code: output.status.code(),
        }
    }

    /// Captured stderr of a failed command, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            CommandError::Failed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

/// Render a command line for logs and errors.
pub fn display_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `program` with `args`, returning its output whatever the exit status.
pub async fn run(
    program: &str,
    args: &[String],
    cwd: Option<&Path>,
    timeout: Duration,
) -> Result<Output, CommandError> {
    let command_line = display_command(program, args);
    tracing::debug!(command = %command_line, "running command");

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    match tokio::time::timeout(timeout, command.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(source)) => Err(CommandError::Exec {
            command: command_line,
            source,
        }),
        Err(_) => Err(CommandError::Timeout {
            command: command_line,
            timeout,
        }),
    }
}

/// Run `program` with `args`, failing on a non-zero exit status.
pub async fn run_success(
    program: &str,
    args: &[String],
    cwd: Option<&Path>,
    timeout: Duration,
) -> Result<Output, CommandError> {
    let output = run(program, args, cwd, timeout).await?;
    if output.status.success() {
        Ok(output)
    } else {
        Err(CommandError::failed(display_command(program, args), &output))
    }
}
