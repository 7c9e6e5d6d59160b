// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

use crate::sequencer::{PollSnapshot, StatusLine};

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

impl OutputMode {
    pub fn from_flags(quiet: bool, json: bool) -> Self {
        if json {
            OutputMode::Json
        } else if quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a health gate status line.
    pub fn status(&self, line: &StatusLine) {
        match self.mode {
            OutputMode::Normal => println!("  … {line}"),
            OutputMode::Quiet => {}
            OutputMode::Json => emit_stdout(&StatusEvent {
                event: "status",
                elapsed_secs: line.elapsed.as_secs(),
                snapshot: &line.snapshot,
            }),
        }
    }

    /// Print a one-off snapshot of critical service health.
    pub fn snapshot(&self, snapshot: &PollSnapshot) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                for entry in snapshot.services() {
                    println!("{:<24} {}", entry.service, entry.state);
                }
            }
            OutputMode::Json => emit_stdout(&SnapshotEvent {
                event: "snapshot",
                stable: snapshot.is_stable(),
                snapshot,
            }),
        }
    }

    /// Print a warning (shown in every mode).
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Warning: {message}"),
            OutputMode::Json => emit_stderr(&JsonEvent {
                event: "warning",
                message,
                duration_secs: None,
            }),
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => {
                // Print only the essential result
                println!("{message}");
            }
            OutputMode::Json => emit_stdout(&JsonEvent {
                event: "success",
                message,
                duration_secs: self.duration(),
            }),
        }
    }

    /// Print a structured final report in JSON mode only.
    pub fn report<T: Serialize>(&self, report: &T) {
        if self.mode == OutputMode::Json {
            emit_stdout(&ReportEvent {
                event: "report",
                report,
            });
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => emit_stderr(&JsonEvent {
                event: "error",
                message,
                duration_secs: self.duration(),
            }),
        }
    }
}

fn emit_stdout<T: Serialize>(event: &T) {
    if let Ok(json) = serde_json::to_string(event) {
        println!("{json}");
    }
}

fn emit_stderr<T: Serialize>(event: &T) {
    if let Ok(json) = serde_json::to_string(event) {
        eprintln!("{json}");
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[derive(Serialize)]
struct StatusEvent<'a> {
    event: &'a str,
    elapsed_secs: u64,
    snapshot: &'a PollSnapshot,
}

#[derive(Serialize)]
struct SnapshotEvent<'a> {
    event: &'a str,
    stable: bool,
    snapshot: &'a PollSnapshot,
}

#[derive(Serialize)]
struct ReportEvent<'a, T> {
    event: &'a str,
    report: &'a T,
}
