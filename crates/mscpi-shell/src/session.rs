//! Line-oriented hosting loop around an [`Instrument`].

use std::io::{BufRead, Write};

use tracing::{debug, info};

use mscpi_config::Config;
use mscpi_core::Outcome;

use crate::error::ShellError;
use crate::instrument::Instrument;

const SESSION_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::session");

/// Reads command lines, feeds them to an instrument, and writes its replies.
#[derive(Debug)]
pub struct Session {
    instrument: Instrument,
    report_unmatched: bool,
}

impl Session {
    /// Wraps an existing instrument.
    #[must_use]
    pub const fn new(instrument: Instrument, report_unmatched: bool) -> Self {
        Self {
            instrument,
            report_unmatched,
        }
    }

    /// Builds the instrument described by `config` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::CommandTable`] when the configured segment limit
    /// cannot hold the command table.
    pub fn from_config(config: &Config) -> Result<Self, ShellError> {
        let instrument = Instrument::new(config)?;
        Ok(Self::new(instrument, config.report_unmatched()))
    }

    /// Returns the hosted instrument.
    #[must_use]
    pub const fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    /// Runs until `QUIT` or end of input.
    ///
    /// Surrounding whitespace is trimmed from each line and blank lines are
    /// skipped. Responses are flushed after every line.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::ReadInput`] or [`ShellError::WriteOutput`] when
    /// the underlying streams fail.
    pub fn run<R, W>(&mut self, reader: R, writer: &mut W) -> Result<(), ShellError>
    where
        R: BufRead,
        W: Write,
    {
        writeln!(
            writer,
            "*** mscpi shell at ADDR == {}; enter commands or type HELP? for more information",
            self.instrument.address()
        )
        .map_err(ShellError::WriteOutput)?;
        writeln!(
            writer,
            "*** to execute a query, append a '?' after the command"
        )
        .map_err(ShellError::WriteOutput)?;
        writer.flush().map_err(ShellError::WriteOutput)?;

        let mut processed = 0_usize;
        for read in reader.lines() {
            let line = read.map_err(ShellError::ReadInput)?;
            let command = line.trim();
            if command.is_empty() {
                continue;
            }
            processed += 1;
            let unknown = self.handle(command);
            self.flush_responses(unknown, writer)?;
            if self.instrument.quit_requested() {
                info!(target: SESSION_TARGET, processed, "quit requested");
                return Ok(());
            }
        }
        info!(target: SESSION_TARGET, processed, "input exhausted");
        Ok(())
    }

    /// Processes one line, returning the reply for an unmatched command when
    /// one is due.
    fn handle(&mut self, command: &str) -> Option<String> {
        match self.instrument.process(command) {
            Ok(Outcome::Unmatched) => {
                debug!(target: SESSION_TARGET, command, "no command matched");
                (self.report_unmatched && self.instrument.is_active())
                    .then(|| format!("ERR unknown command '{command}'"))
            }
            Ok(Outcome::Dispatched { index }) => {
                debug!(target: SESSION_TARGET, command, index, "command handled");
                None
            }
            Err(error) => {
                debug!(target: SESSION_TARGET, command, %error, "command rejected");
                None
            }
        }
    }

    fn flush_responses<W: Write>(
        &mut self,
        unknown: Option<String>,
        writer: &mut W,
    ) -> Result<(), ShellError> {
        for response in unknown.into_iter().chain(self.instrument.take_responses()) {
            writeln!(writer, "{response}").map_err(ShellError::WriteOutput)?;
        }
        writer.flush().map_err(ShellError::WriteOutput)
    }
}
