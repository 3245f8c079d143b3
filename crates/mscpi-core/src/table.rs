//! Ordered, immutable command tables.
//!
//! A [`CommandTable`] maps templates to handler values. Tables are assembled
//! with [`CommandTableBuilder`], validated once, and never mutated afterwards.
//! Templates are tokenized at build time so matching only compares slices.

use crate::config::ParserConfig;
use crate::error::TableError;

/// Channel placeholder carried by the first segment of a template.
///
/// In `CHAN0:MODE` the trailing `0` of `CHAN0` is the placeholder. It is
/// stripped from the stored segment and the addressed channel is read from
/// the same position of the input instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSlot {
    placeholder: char,
}

impl ChannelSlot {
    /// Returns the placeholder digit as declared in the template.
    #[must_use]
    pub const fn placeholder(&self) -> char {
        self.placeholder
    }
}

/// A tokenized command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
    segments: Vec<String>,
    channel: Option<ChannelSlot>,
}

impl Template {
    fn parse(
        text: &str,
        supports_channel: bool,
        index: usize,
        config: &ParserConfig,
    ) -> Result<Self, TableError> {
        if text.is_empty() {
            return Err(TableError::EmptyTemplate { index });
        }

        let mut segments: Vec<String> = text.split(':').map(str::to_owned).collect();
        if segments.len() > config.max_segments() {
            return Err(TableError::TooManySegments {
                template: text.to_owned(),
                segments: segments.len(),
                max: config.max_segments(),
            });
        }

        let channel = if supports_channel {
            let placeholder = segments
                .first_mut()
                .and_then(String::pop)
                .filter(char::is_ascii_digit)
                .ok_or_else(|| TableError::MissingChannelPlaceholder {
                    template: text.to_owned(),
                })?;
            Some(ChannelSlot { placeholder })
        } else {
            None
        };

        Ok(Self {
            text: text.to_owned(),
            segments,
            channel,
        })
    }

    /// Returns the template text as declared, placeholder included.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the segments compared against input, placeholder removed.
    ///
    /// Stripping the placeholder may leave the first segment empty; an empty
    /// segment is a prefix of every input segment.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the channel placeholder, if the template addresses channels.
    #[must_use]
    pub const fn channel(&self) -> Option<ChannelSlot> {
        self.channel
    }
}

/// One entry of a [`CommandTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor<H> {
    template: Template,
    handler: H,
    help: String,
}

impl<H> CommandDescriptor<H> {
    /// Returns the tokenized template.
    #[must_use]
    pub const fn template(&self) -> &Template {
        &self.template
    }

    /// Returns the handler value invoked when this entry matches.
    #[must_use]
    pub const fn handler(&self) -> &H {
        &self.handler
    }

    /// Returns `true` when the first template segment carries a channel
    /// placeholder.
    #[must_use]
    pub const fn supports_channel(&self) -> bool {
        self.template.channel.is_some()
    }

    /// Returns the advisory help text.
    #[must_use]
    pub fn help(&self) -> &str {
        &self.help
    }
}

/// Ordered, read-only collection of command descriptors.
///
/// Entries are matched in declaration order and the first match wins, so a
/// shorter template declared early shadows longer ones sharing its prefix.
///
/// # Example
///
/// ```
/// use mscpi_core::CommandTable;
///
/// let table = CommandTable::builder()
///     .command("*IDN", "identify", "(QUERY ONLY)")
///     .channel_command("CHAN0", "channel", "{ ON | OFF }")
///     .build()
///     .expect("templates are valid");
///
/// let templates: Vec<&str> = table
///     .descriptors()
///     .map(|entry| entry.template().as_str())
///     .collect();
/// assert_eq!(templates, ["*IDN", "CHAN0"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTable<H> {
    descriptors: Vec<CommandDescriptor<H>>,
    config: ParserConfig,
}

impl<H> CommandTable<H> {
    /// Starts building a table.
    #[must_use]
    pub const fn builder() -> CommandTableBuilder<H> {
        CommandTableBuilder::new()
    }

    /// Iterates over the descriptors in declaration order.
    #[must_use]
    pub fn descriptors(&self) -> impl ExactSizeIterator<Item = &CommandDescriptor<H>> {
        self.descriptors.iter()
    }

    /// Returns the descriptor declared at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CommandDescriptor<H>> {
        self.descriptors.get(index)
    }

    /// Returns the number of descriptors.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` when the table has no descriptors.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Returns the limits the table was built with.
    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }
}

struct PendingEntry<H> {
    template: String,
    handler: H,
    supports_channel: bool,
    help: String,
}

/// Accumulates descriptors and validates them into a [`CommandTable`].
pub struct CommandTableBuilder<H> {
    entries: Vec<PendingEntry<H>>,
}

impl<H> CommandTableBuilder<H> {
    /// Creates an empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a descriptor.
    #[must_use]
    pub fn entry(
        mut self,
        template: impl Into<String>,
        handler: H,
        supports_channel: bool,
        help: impl Into<String>,
    ) -> Self {
        self.entries.push(PendingEntry {
            template: template.into(),
            handler,
            supports_channel,
            help: help.into(),
        });
        self
    }

    /// Appends a descriptor without a channel placeholder.
    #[must_use]
    pub fn command(
        self,
        template: impl Into<String>,
        handler: H,
        help: impl Into<String>,
    ) -> Self {
        self.entry(template, handler, false, help)
    }

    /// Appends a descriptor whose first segment ends in a channel
    /// placeholder digit.
    #[must_use]
    pub fn channel_command(
        self,
        template: impl Into<String>,
        handler: H,
        help: impl Into<String>,
    ) -> Self {
        self.entry(template, handler, true, help)
    }

    /// Validates the entries with the default [`ParserConfig`].
    ///
    /// # Errors
    ///
    /// See [`CommandTableBuilder::build_with`].
    pub fn build(self) -> Result<CommandTable<H>, TableError> {
        self.build_with(ParserConfig::default())
    }

    /// Validates the entries and produces the table.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::EmptyTemplate`] for an empty template,
    /// [`TableError::MissingChannelPlaceholder`] when a channel template's
    /// first segment does not end in an ASCII digit, and
    /// [`TableError::TooManySegments`] when a template exceeds the segment
    /// limit.
    pub fn build_with(self, config: ParserConfig) -> Result<CommandTable<H>, TableError> {
        let descriptors = self
            .entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let template =
                    Template::parse(&entry.template, entry.supports_channel, index, &config)?;
                Ok(CommandDescriptor {
                    template,
                    handler: entry.handler,
                    help: entry.help,
                })
            })
            .collect::<Result<Vec<_>, TableError>>()?;
        Ok(CommandTable {
            descriptors,
            config,
        })
    }
}

impl<H> Default for CommandTableBuilder<H> {
    fn default() -> Self {
        Self::new()
    }
}
