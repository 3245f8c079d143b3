//! Tokenizing of a single input line.

/// A command line split into its matching-relevant parts.
///
/// All fields borrow from the original line; nothing is copied or mutated.
///
/// # Example
///
/// ```
/// use mscpi_core::ParsedLine;
///
/// let parsed = ParsedLine::parse("CHAN3:MODE? extra words");
/// assert_eq!(parsed.segments(), ["CHAN3", "MODE"]);
/// assert!(parsed.is_query());
/// assert_eq!(parsed.args(), "extra words");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    segments: Vec<&'a str>,
    query: bool,
    args: &'a str,
}

impl<'a> ParsedLine<'a> {
    /// Splits `raw` into command segments, query flag, and arguments.
    ///
    /// Arguments start after the first space, which is consumed. A trailing
    /// `?` on the command text marks a query and is removed before the text
    /// is split on `:`. Empty segments between adjacent colons are kept.
    #[must_use]
    pub fn parse(raw: &'a str) -> Self {
        let (command, args) = raw.split_once(' ').unwrap_or((raw, ""));
        let (stem, query) = command
            .strip_suffix('?')
            .map_or((command, false), |stripped| (stripped, true));
        Self {
            segments: stem.split(':').collect(),
            query,
            args,
        }
    }

    /// Returns the colon-delimited command segments.
    #[must_use]
    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// Returns `true` when the command text ended in `?`.
    #[must_use]
    pub const fn is_query(&self) -> bool {
        self.query
    }

    /// Returns the text following the first space, or an empty string.
    #[must_use]
    pub const fn args(&self) -> &'a str {
        self.args
    }
}
