//! Line matching and handler dispatch.
//!
//! The [`Dispatcher`] owns a shared, read-only [`CommandTable`]. Each call
//! tokenizes the line afresh, scans the table in order, and hands the first
//! match to the caller's [`CommandTarget`]. No state survives between calls.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::DispatchError;
use crate::line::ParsedLine;
use crate::table::{CommandDescriptor, CommandTable};

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Normalized arguments passed to a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation<'a> {
    command: &'a str,
    query: bool,
    channel: u32,
    args: &'a str,
}

impl<'a> Invocation<'a> {
    /// Returns the full line as received, query marker included.
    #[must_use]
    pub const fn command(&self) -> &'a str {
        self.command
    }

    /// Returns `true` when the command text ended in `?`.
    #[must_use]
    pub const fn is_query(&self) -> bool {
        self.query
    }

    /// Returns the addressed channel, or `0` for templates without one.
    ///
    /// The value is the single digit trailing the first input segment. Range
    /// checks are left to the handler.
    #[must_use]
    pub const fn channel(&self) -> u32 {
        self.channel
    }

    /// Returns the text following the first space, or an empty string.
    #[must_use]
    pub const fn args(&self) -> &'a str {
        self.args
    }
}

/// Receiver of dispatched commands.
///
/// Implementors own whatever state their handlers mutate; the dispatcher only
/// borrows them for the duration of one invocation.
pub trait CommandTarget<H> {
    /// Runs the handler selected for a line.
    fn invoke(&mut self, handler: &H, invocation: &Invocation<'_>);
}

/// The entry a line resolved to, before any handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'t, 'l, H> {
    index: usize,
    descriptor: &'t CommandDescriptor<H>,
    invocation: Invocation<'l>,
}

impl<'t, 'l, H> Resolution<'t, 'l, H> {
    /// Returns the declaration index of the matched descriptor.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the matched descriptor.
    #[must_use]
    pub const fn descriptor(&self) -> &'t CommandDescriptor<H> {
        self.descriptor
    }

    /// Returns the arguments the handler receives.
    #[must_use]
    pub const fn invocation(&self) -> &Invocation<'l> {
        &self.invocation
    }
}

/// Result of processing one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The handler of the descriptor at `index` ran once.
    Dispatched {
        /// Declaration index of the matched descriptor.
        index: usize,
    },
    /// No template matched; nothing ran.
    Unmatched,
}

/// Matches lines against a command table and invokes handlers.
#[derive(Debug)]
pub struct Dispatcher<H> {
    table: Arc<CommandTable<H>>,
}

impl<H> Clone for Dispatcher<H> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

impl<H> Dispatcher<H> {
    /// Creates a dispatcher that owns `table`.
    #[must_use]
    pub fn new(table: CommandTable<H>) -> Self {
        Self::from_shared(Arc::new(table))
    }

    /// Creates a dispatcher over a table shared with other owners.
    #[must_use]
    pub const fn from_shared(table: Arc<CommandTable<H>>) -> Self {
        Self { table }
    }

    /// Returns the table this dispatcher matches against.
    #[must_use]
    pub fn table(&self) -> &CommandTable<H> {
        &self.table
    }

    /// Finds the descriptor `raw` dispatches to without invoking it.
    ///
    /// Returns `Ok(None)` when no template matches or when the line has more
    /// segments than the table's limit.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidChannel`] when the first matching
    /// entry addresses channels but the input's first segment does not end in
    /// a decimal digit.
    pub fn resolve<'t, 'l>(
        &'t self,
        raw: &'l str,
    ) -> Result<Option<Resolution<'t, 'l, H>>, DispatchError> {
        let parsed = ParsedLine::parse(raw);
        let segments = parsed.segments();
        if segments.len() > self.table.config().max_segments() {
            debug!(
                target: DISPATCH_TARGET,
                command = raw,
                segments = segments.len(),
                "line exceeds segment limit"
            );
            return Ok(None);
        }

        let Some((index, descriptor)) = self
            .table
            .descriptors()
            .enumerate()
            .find(|(_, descriptor)| matches_template(descriptor, segments))
        else {
            return Ok(None);
        };

        let channel = if descriptor.supports_channel() {
            channel_digit(raw, descriptor, segments)?
        } else {
            0
        };

        Ok(Some(Resolution {
            index,
            descriptor,
            invocation: Invocation {
                command: raw,
                query: parsed.is_query(),
                channel,
                args: parsed.args(),
            },
        }))
    }

    /// Dispatches `raw` to the first matching handler on `target`.
    ///
    /// At most one handler runs per call. A line matching no template is
    /// absorbed and reported as [`Outcome::Unmatched`].
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidChannel`] as described for
    /// [`Dispatcher::resolve`]; no handler runs in that case.
    pub fn process<T>(&self, raw: &str, target: &mut T) -> Result<Outcome, DispatchError>
    where
        T: CommandTarget<H> + ?Sized,
    {
        let outcome = self.resolve(raw)?.map_or_else(
            || {
                debug!(target: DISPATCH_TARGET, command = raw, "no command matched");
                Outcome::Unmatched
            },
            |resolution| {
                debug!(
                    target: DISPATCH_TARGET,
                    command = raw,
                    template = resolution.descriptor.template().as_str(),
                    query = resolution.invocation.query,
                    channel = resolution.invocation.channel,
                    "dispatching command"
                );
                target.invoke(resolution.descriptor.handler(), &resolution.invocation);
                Outcome::Dispatched {
                    index: resolution.index,
                }
            },
        );
        Ok(outcome)
    }
}

fn matches_template<H>(descriptor: &CommandDescriptor<H>, input: &[&str]) -> bool {
    let template = descriptor.template().segments();
    template.len() == input.len()
        && template
            .iter()
            .zip(input)
            .all(|(expected, given)| starts_with_ignore_ascii_case(given, expected))
}

/// Returns `true` when `input` begins with `prefix`, ignoring ASCII case.
///
/// This is the per-segment rule the dispatcher applies; handlers parsing
/// abbreviated argument keywords use it too.
///
/// ```
/// use mscpi_core::starts_with_ignore_ascii_case;
///
/// assert!(starts_with_ignore_ascii_case("system", "SYST"));
/// assert!(!starts_with_ignore_ascii_case("SY", "SYST"));
/// ```
#[must_use]
pub fn starts_with_ignore_ascii_case(input: &str, prefix: &str) -> bool {
    input
        .as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}

fn channel_digit<H>(
    raw: &str,
    descriptor: &CommandDescriptor<H>,
    segments: &[&str],
) -> Result<u32, DispatchError> {
    let suffix = segments.first().and_then(|first| first.chars().next_back());
    suffix.and_then(|c| c.to_digit(10)).ok_or_else(|| {
        warn!(
            target: DISPATCH_TARGET,
            command = raw,
            template = descriptor.template().as_str(),
            suffix = ?suffix,
            "channel command without a channel digit"
        );
        DispatchError::InvalidChannel {
            command: raw.to_owned(),
            template: descriptor.template().as_str().to_owned(),
            suffix,
        }
    })
}
