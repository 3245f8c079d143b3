//! Default values shared by the configuration loader and its tests.

use crate::logging::LogFormat;

/// Bus address answered by the example instrument.
pub const DEFAULT_UNIT_ADDRESS: u8 = 7;

/// Address selected on the bus when the shell starts.
pub const DEFAULT_INITIAL_ADDRESS: u8 = 7;

/// Number of addressable channels.
pub const DEFAULT_CHANNEL_COUNT: u8 = 8;

/// Largest channel count expressible with a single-digit suffix.
pub const MAX_CHANNEL_COUNT: u8 = 9;

/// Segment limit for templates and input lines.
pub const DEFAULT_MAX_SEGMENTS: usize = 8;

/// Identification string reported by `*IDN?`.
pub const DEFAULT_IDENTITY: &str = "MSCPI,EXAMPLE-INSTRUMENT,000000,0.1.0";

/// Default log filter expression used by the shell.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default log filter expression used by the shell.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Owned identity value used where allocation is required.
pub fn default_identity() -> String {
    DEFAULT_IDENTITY.to_owned()
}

/// Default logging format for the shell.
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}
