// ABOUTME: Health-gated deployment sequencer.
// ABOUTME: Polls critical containers until they are stable or the timeout budget runs out.

mod config;
mod run;
mod snapshot;
mod ticker;

pub use config::{
    ConfigurationError, DEFAULT_POLL_INTERVAL, DEFAULT_PROBE_TIMEOUT, DEFAULT_REPORT_INTERVAL,
    DEFAULT_TIMEOUT, DeploymentConfig, DeploymentConfigBuilder,
};
pub use run::{
    Sequencer, SequencerError, SequencerOutcome, SequencerReport, SequencerState, StatusLine,
    run_sequencer, take_snapshot,
};
pub use snapshot::{PollSnapshot, ServiceHealth};
pub use ticker::{Ticker, TokioTicker};
