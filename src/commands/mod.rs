// ABOUTME: Command module aggregator for the mediastack CLI.
// ABOUTME: Re-exports command handlers and the shared config loader.

mod activate;
mod deploy;
mod runtime_connection;
mod status;
mod wait;

pub use activate::activate;
pub use deploy::deploy;
pub use status::status;
pub use wait::wait;

use mediastack::config::StackConfig;
use mediastack::error::Result;
use std::env;
use std::path::Path;

/// Load the config from an explicit path, or discover it in the current directory.
pub fn load_config(path: Option<&Path>) -> Result<StackConfig> {
    match path {
        Some(path) => StackConfig::load(path),
        None => StackConfig::discover(&env::current_dir()?),
    }
}
