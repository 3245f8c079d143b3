//! Command matching and dispatch for colon-delimited instrument command
//! grammars.
//!
//! Commands follow the familiar instrument-control shape: hierarchical,
//! colon-separated segments (`SYST:ADDR`), an optional trailing `?` marking a
//! query, an optional per-channel digit suffix on the first segment
//! (`CHAN3:MODE`), and a free-form argument string after the first space.
//!
//! A [`CommandTable`] is built once from templates and handler values, then
//! injected into a [`Dispatcher`]. Each call to [`Dispatcher::process`]
//! tokenizes one line, finds the first template that fits, and invokes the
//! caller's [`CommandTarget`] with the normalized [`Invocation`].
//!
//! # Matching rules
//!
//! - Input and template must have the same number of segments.
//! - Every template segment must be an ASCII case-insensitive prefix of the
//!   input segment at the same position, so `SYSTEM:ADDRESS` matches the
//!   template `SYST:ADDR` but `SY:ADDR` does not.
//! - Entries are tried in declaration order and the first match wins.
//! - Lines matching nothing are absorbed and reported as
//!   [`Outcome::Unmatched`].
//!
//! # Example
//!
//! ```
//! use mscpi_core::{CommandTable, CommandTarget, Dispatcher, Invocation, Outcome};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Command {
//!     Address,
//!     Channel,
//! }
//!
//! #[derive(Default)]
//! struct Recorder {
//!     seen: Vec<(Command, u32, String)>,
//! }
//!
//! impl CommandTarget<Command> for Recorder {
//!     fn invoke(&mut self, handler: &Command, invocation: &Invocation<'_>) {
//!         self.seen
//!             .push((*handler, invocation.channel(), invocation.args().to_owned()));
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = CommandTable::builder()
//!     .command("SYST:ADDR", Command::Address, "(QUERY ONLY)")
//!     .channel_command("CHAN0", Command::Channel, "{ ON | OFF }")
//!     .build()?;
//! let dispatcher = Dispatcher::new(table);
//! let mut recorder = Recorder::default();
//!
//! let outcome = dispatcher.process("CHAN2 ON", &mut recorder)?;
//! assert_eq!(outcome, Outcome::Dispatched { index: 1 });
//! assert_eq!(recorder.seen, vec![(Command::Channel, 2, String::from("ON"))]);
//! # Ok(())
//! # }
//! ```

mod config;
mod dispatch;
mod error;
mod line;
mod table;

pub use config::ParserConfig;
pub use dispatch::{
    CommandTarget, Dispatcher, Invocation, Outcome, Resolution, starts_with_ignore_ascii_case,
};
pub use error::{DispatchError, TableError};
pub use line::ParsedLine;
pub use table::{ChannelSlot, CommandDescriptor, CommandTable, CommandTableBuilder, Template};

#[cfg(test)]
mod tests;
