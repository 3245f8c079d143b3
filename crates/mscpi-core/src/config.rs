//! Parser limits applied while building tables and matching lines.

/// Default number of colon-delimited segments a command may carry.
pub const DEFAULT_MAX_SEGMENTS: usize = 8;

/// Limits shared by the table builder and the dispatcher.
///
/// # Example
///
/// ```
/// use mscpi_core::ParserConfig;
///
/// let config = ParserConfig::default();
/// assert_eq!(config.max_segments(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum segments accepted in a template or an input line.
    max_segments: usize,
}

impl ParserConfig {
    /// Creates a configuration with an explicit segment limit.
    #[must_use]
    pub const fn new(max_segments: usize) -> Self {
        Self { max_segments }
    }

    /// Returns the maximum number of segments in a template or input line.
    #[must_use]
    pub const fn max_segments(&self) -> usize {
        self.max_segments
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SEGMENTS)
    }
}
