//! Interactive shell hosting an example instrument on the mscpi dispatcher.
//!
//! [`run`] is the whole program: it loads [`Config`] from the arguments and
//! the environment, installs telemetry, builds an [`Instrument`], and drives a
//! [`Session`] over the supplied streams. The binary only locks the standard
//! streams and delegates here, so tests can run the shell in-process.

use std::ffi::OsString;
use std::io::{BufRead, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use tracing::info;

use mscpi_config::Config;

mod error;
mod instrument;
mod session;
pub mod telemetry;

pub use error::ShellError;
pub use instrument::{ChannelMode, ChannelState, Command, Instrument, Level, command_table};
pub use session::Session;

/// Runs the shell with the provided arguments and streams.
///
/// Any failure is written to `stderr` and mapped to [`ExitCode::FAILURE`].
#[must_use]
pub fn run<I, R, W, E>(args: I, stdin: R, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
    E: Write,
{
    match try_run(args, stdin, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}

fn try_run<I, R, W>(args: I, stdin: R, stdout: &mut W) -> Result<(), ShellError>
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
{
    let config = Config::load_from_iter(args).map_err(ShellError::LoadConfiguration)?;
    config.validate()?;
    telemetry::initialise(&config)?;
    info!(
        target: concat!(env!("CARGO_PKG_NAME"), "::run"),
        unit_address = config.unit_address(),
        channels = config.channel_count(),
        "starting shell"
    );
    Session::from_config(&config)?.run(stdin, stdout)
}

#[cfg(test)]
mod tests;
