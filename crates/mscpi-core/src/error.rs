//! Error types raised while building command tables and dispatching lines.
//!
//! A line that matches no template is not an error: it is reported as
//! [`crate::Outcome::Unmatched`]. The variants here cover table construction
//! mistakes and a matched channel command whose suffix is not a digit.

use thiserror::Error;

/// Errors raised while building a [`crate::CommandTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TableError {
    /// A descriptor was declared with an empty template.
    #[error("command template at position {index} is empty")]
    EmptyTemplate {
        /// Declaration index of the offending descriptor.
        index: usize,
    },

    /// A channel template does not end its first segment in a digit.
    #[error("channel template '{template}' has no trailing digit placeholder in its first segment")]
    MissingChannelPlaceholder {
        /// Template text as declared.
        template: String,
    },

    /// A template has more segments than the parser accepts.
    #[error("command template '{template}' has {segments} segments, limit is {max}")]
    TooManySegments {
        /// Template text as declared.
        template: String,
        /// Number of segments in the template.
        segments: usize,
        /// Configured segment limit.
        max: usize,
    },
}

/// Errors raised while dispatching a line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DispatchError {
    /// The line matched a channel template but its first segment does not end
    /// in a decimal digit.
    #[error("command '{command}' matched '{template}' but carries no channel digit")]
    InvalidChannel {
        /// Original line as received.
        command: String,
        /// Template of the matched descriptor.
        template: String,
        /// Character found where the channel digit was expected.
        suffix: Option<char>,
    },
}
