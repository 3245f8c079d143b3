//! Interactive shell for the example mscpi instrument.
//!
//! The binary delegates to [`mscpi_shell::run`], which loads configuration,
//! installs telemetry, and feeds standard input to the instrument line by
//! line.

use std::io::{self, StderrLock, StdinLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let stdin: StdinLock<'static> = io::stdin().lock();
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    mscpi_shell::run(std::env::args_os(), stdin, &mut stdout, &mut stderr)
}
