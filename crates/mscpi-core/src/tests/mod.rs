//! Unit and behaviour tests for `mscpi-core`.

use crate::{CommandTable, CommandTarget, Invocation};

mod dispatch_tests;


/// Handler variants used across the test suites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cmd {
    Address,
    Identify,
    Help,
    ShortId,
    SystemAddress,
    SystemTrigger,
    Channel,
    ChannelMode,
}

/// One recorded handler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Call {
    handler: Cmd,
    command: String,
    query: bool,
    channel: u32,
    args: String,
}

#[derive(Debug, Default)]
struct Recorder {
    calls: Vec<Call>,
}

impl CommandTarget<Cmd> for Recorder {
    fn invoke(&mut self, handler: &Cmd, invocation: &Invocation<'_>) {
        self.calls.push(Call {
            handler: *handler,
            command: invocation.command().to_owned(),
            query: invocation.is_query(),
            channel: invocation.channel(),
            args: invocation.args().to_owned(),
        });
    }
}

/// A table shaped like a small bench instrument.
fn instrument_table() -> CommandTable<Cmd> {
    CommandTable::builder()
        .command("++ADDR", Cmd::Address, "[ 0 -- 7 ]")
        .command("*IDN", Cmd::Identify, "(QUERY ONLY)")
        .command("HELP", Cmd::Help, "(QUERY ONLY)")
        .command("ID", Cmd::ShortId, "(QUERY ONLY)")
        .command("SYST:ADDR", Cmd::SystemAddress, "(QUERY ONLY)")
        .command("SYST:TRIG", Cmd::SystemTrigger, "(QUERY ONLY)")
        .channel_command("CHAN0", Cmd::Channel, "{ 0 | 1 | OFF | ON | LO | HI }")
        .channel_command("CHAN0:MODE", Cmd::ChannelMode, "{ INPUT | INPUT_PULLUP | OUTPUT }")
        .build()
        .expect("instrument table is valid")
}
