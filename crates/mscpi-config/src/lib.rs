//! Layered configuration for the mscpi shell.
//!
//! Values are merged by `ortho_config` in increasing precedence: built-in
//! defaults, a TOML configuration file (`--config-path` or
//! `MSCPI_CONFIG_PATH`), `MSCPI_*` environment variables, and finally
//! command-line flags such as `--channel-count 4` or
//! `--report-unmatched true`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ortho_config::OrthoConfig;

mod defaults;
mod logging;

pub use defaults::{
    DEFAULT_CHANNEL_COUNT, DEFAULT_IDENTITY, DEFAULT_INITIAL_ADDRESS, DEFAULT_LOG_FILTER,
    DEFAULT_MAX_SEGMENTS, DEFAULT_UNIT_ADDRESS, MAX_CHANNEL_COUNT, default_identity,
    default_log_filter, default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Runtime configuration shared by the shell and its instrument.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "MSCPI")]
pub struct Config {
    /// Bus address this instrument answers to.
    #[ortho_config(default = DEFAULT_UNIT_ADDRESS)]
    pub unit_address: u8,
    /// Address selected on the bus at startup; the unit starts active when it
    /// equals `unit_address`.
    #[ortho_config(default = DEFAULT_INITIAL_ADDRESS)]
    pub initial_address: u8,
    /// Number of addressable channels, numbered from 1.
    #[ortho_config(default = DEFAULT_CHANNEL_COUNT)]
    pub channel_count: u8,
    /// Identification string reported by `*IDN?`.
    #[ortho_config(default = defaults::default_identity())]
    pub identity: String,
    /// Segment limit applied to templates and input lines.
    #[ortho_config(default = DEFAULT_MAX_SEGMENTS)]
    pub max_segments: usize,
    /// Prints an error line for commands that match no template.
    ///
    /// Unset means off. An absent command-line flag leaves the file or
    /// environment value in force.
    pub report_unmatched: Option<bool>,
    /// `tracing` filter expression.
    #[ortho_config(default = defaults::default_log_filter_string())]
    pub log_filter: String,
    /// Log output format.
    #[ortho_config(default = defaults::default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unit_address: DEFAULT_UNIT_ADDRESS,
            initial_address: DEFAULT_INITIAL_ADDRESS,
            channel_count: DEFAULT_CHANNEL_COUNT,
            identity: default_identity(),
            max_segments: DEFAULT_MAX_SEGMENTS,
            report_unmatched: None,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Bus address this instrument answers to.
    #[must_use]
    pub const fn unit_address(&self) -> u8 {
        self.unit_address
    }

    /// Address selected on the bus at startup.
    #[must_use]
    pub const fn initial_address(&self) -> u8 {
        self.initial_address
    }

    /// Number of addressable channels.
    #[must_use]
    pub const fn channel_count(&self) -> u8 {
        self.channel_count
    }

    /// Identification string reported by `*IDN?`.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Segment limit for templates and input lines.
    #[must_use]
    pub const fn max_segments(&self) -> usize {
        self.max_segments
    }

    /// Whether unmatched commands produce an error line.
    #[must_use]
    pub const fn report_unmatched(&self) -> bool {
        matches!(self.report_unmatched, Some(true))
    }

    /// `tracing` filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Checks value ranges that the loader cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ChannelCount`] when the channel count is zero or
    /// exceeds [`MAX_CHANNEL_COUNT`], and [`ConfigError::SegmentLimit`] when
    /// the segment limit is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_count == 0 || self.channel_count > MAX_CHANNEL_COUNT {
            return Err(ConfigError::ChannelCount {
                count: self.channel_count,
            });
        }
        if self.max_segments == 0 {
            return Err(ConfigError::SegmentLimit);
        }
        Ok(())
    }
}

/// Errors raised when a loaded configuration holds unusable values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Channel suffixes are single digits, so only 1 to 9 channels exist.
    #[error("channel count {count} is outside 1..={max}", max = MAX_CHANNEL_COUNT)]
    ChannelCount {
        /// Configured channel count.
        count: u8,
    },
    /// A zero segment limit would reject every command.
    #[error("segment limit must be at least 1")]
    SegmentLimit,
}
