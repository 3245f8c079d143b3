//! Errors surfaced by the shell runtime.

use std::io;
use std::sync::Arc;

use thiserror::Error;

use mscpi_config::ConfigError;
use mscpi_core::TableError;

use crate::telemetry::TelemetryError;

/// Failures that stop the shell before or during a session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ShellError {
    /// Layered configuration could not be loaded.
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    /// Configuration loaded but holds unusable values.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    /// The instrument's command table was rejected.
    #[error("failed to build command table: {0}")]
    CommandTable(#[from] TableError),
    /// Telemetry could not be installed.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    /// Reading a command line failed.
    #[error("failed to read command input: {0}")]
    ReadInput(io::Error),
    /// Writing a response failed.
    #[error("failed to write response: {0}")]
    WriteOutput(io::Error),
}
