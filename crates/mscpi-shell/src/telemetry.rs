//! Log output for the shell.
//!
//! Responses own stdout, so every event goes to stderr. The subscriber is
//! installed once per process; later calls are no-ops.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use mscpi_config::{Config, LogFormat};

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured log filter expression does not parse.
    #[error("invalid log filter '{filter}': {reason}")]
    Filter {
        /// Filter expression as configured.
        filter: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// Another global subscriber is already installed.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the global subscriber described by `config` on first use.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the filter expression does not
/// parse and [`TelemetryError::Subscriber`] when a subscriber from elsewhere
/// already owns the global slot. A failed attempt leaves the slot free for a
/// later call.
pub fn initialise(config: &Config) -> Result<(), TelemetryError> {
    INSTALLED.get_or_try_init(|| install_subscriber(config))?;
    Ok(())
}

fn install_subscriber(config: &Config) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_new(config.log_filter()).map_err(|error| TelemetryError::Filter {
            filter: config.log_filter().to_owned(),
            reason: error.to_string(),
        })?;

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(fmt::time::UtcTime::rfc_3339());

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.log_format() {
        LogFormat::Json => Box::new(builder.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder.compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}
