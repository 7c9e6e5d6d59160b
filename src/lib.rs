// ABOUTME: Library root for mediastack - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod process;
pub mod runtime;
pub mod sequencer;
pub mod stack;
pub mod tunnel;
pub mod types;
