//! Example bench instrument driven by the command dispatcher.
//!
//! The instrument models a unit on a shared bus: it answers only while its
//! address is selected, except for `++ADDR` (which performs the selection)
//! and `*TRG` (which is broadcast to every unit). Handlers never write
//! directly; they queue response lines that the hosting session drains.

use std::collections::VecDeque;

use strum::Display;
use tracing::{debug, info, warn};

use mscpi_config::Config;
use mscpi_core::{
    CommandTable, CommandTarget, DispatchError, Dispatcher, Invocation, Outcome, ParserConfig,
    TableError, starts_with_ignore_ascii_case,
};

const INSTRUMENT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::instrument");

const QUERY_ONLY: &str = "(QUERY ONLY)";

/// Handlers registered in the instrument's command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `++ADDR n`: selects the unit with address `n`.
    Address,
    /// `*IDN?` and `ID?`: reports the identity string.
    Identify,
    /// `*SAV`: snapshots every channel.
    Save,
    /// `*RCL`: restores the snapshot.
    Recall,
    /// `*RST`: returns every channel to its power-on state.
    Reset,
    /// `*TRG`: counts a bus trigger.
    Trigger,
    /// `HELP?`: lists the command table.
    Help,
    /// `SYST:ADDR?`: reports the unit address.
    SystemAddress,
    /// `SYST:TRIG?`: reports the trigger count.
    SystemTrigger,
    /// `QUIT`: asks the hosting loop to stop.
    Quit,
    /// `CHANn` and `CHANn?`: sets or reports a channel level.
    Channel,
    /// `CHANn:MODE` and `CHANn:MODE?`: sets or reports a channel mode.
    ChannelMode,
}

/// Builds the instrument's command table.
///
/// # Errors
///
/// Returns [`TableError::TooManySegments`] when `config` allows fewer
/// segments than the longest template needs.
pub fn command_table(config: ParserConfig) -> Result<CommandTable<Command>, TableError> {
    CommandTable::builder()
        .command("++ADDR", Command::Address, "[ 0 -- 7 ]")
        .command("*IDN", Command::Identify, QUERY_ONLY)
        .command("*SAV", Command::Save, "")
        .command("*RCL", Command::Recall, "")
        .command("*RST", Command::Reset, "")
        .command("*TRG", Command::Trigger, "")
        .command("HELP", Command::Help, QUERY_ONLY)
        .command("ID", Command::Identify, QUERY_ONLY)
        .command("SYST:ADDR", Command::SystemAddress, QUERY_ONLY)
        .command("SYST:TRIG", Command::SystemTrigger, QUERY_ONLY)
        .command("QUIT", Command::Quit, "")
        .channel_command("CHAN0", Command::Channel, "{ 0 | 1 | OFF | ON | LO | HI }")
        .channel_command(
            "CHAN0:MODE",
            Command::ChannelMode,
            "{ INPUT | INPUT_PULLUP | OUTPUT }",
        )
        .build_with(config)
}

/// Logic level of a channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Level {
    /// Driven or read low.
    #[default]
    Lo,
    /// Driven or read high.
    Hi,
}

impl Level {
    fn parse(text: &str) -> Option<Self> {
        if text.eq_ignore_ascii_case("0")
            || text.eq_ignore_ascii_case("OFF")
            || starts_with_ignore_ascii_case(text, "LO")
        {
            Some(Self::Lo)
        } else if text.eq_ignore_ascii_case("1")
            || text.eq_ignore_ascii_case("ON")
            || starts_with_ignore_ascii_case(text, "HI")
        {
            Some(Self::Hi)
        } else {
            None
        }
    }
}

/// Pin configuration of a channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelMode {
    /// Floating input.
    #[default]
    Input,
    /// Input with the pull-up enabled.
    InputPullup,
    /// Push-pull output.
    Output,
}

impl ChannelMode {
    fn parse(text: &str) -> Option<Self> {
        if starts_with_ignore_ascii_case(text, "OUT") {
            Some(Self::Output)
        } else if starts_with_ignore_ascii_case(text, "INPUT_")
            || starts_with_ignore_ascii_case(text, "PUL")
        {
            Some(Self::InputPullup)
        } else if starts_with_ignore_ascii_case(text, "IN") {
            Some(Self::Input)
        } else {
            None
        }
    }
}

/// Level and mode of one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelState {
    /// Current logic level.
    pub level: Level,
    /// Current pin configuration.
    pub mode: ChannelMode,
}

/// A simulated unit answering commands on a shared bus.
#[derive(Debug)]
pub struct Instrument {
    dispatcher: Dispatcher<Command>,
    address: u8,
    active: bool,
    identity: String,
    channels: Vec<ChannelState>,
    saved: Vec<ChannelState>,
    triggers: u64,
    quit: bool,
    responses: VecDeque<String>,
}

impl Instrument {
    /// Creates an instrument from loaded configuration.
    ///
    /// The unit starts active when `initial_address` selects its own
    /// `unit_address`.
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] when the configured segment limit cannot hold
    /// the command table.
    pub fn new(config: &Config) -> Result<Self, TableError> {
        let table = command_table(ParserConfig::new(config.max_segments()))?;
        let channels = vec![ChannelState::default(); usize::from(config.channel_count())];
        Ok(Self {
            dispatcher: Dispatcher::new(table),
            address: config.unit_address(),
            active: config.initial_address() == config.unit_address(),
            identity: config.identity().to_owned(),
            saved: channels.clone(),
            channels,
            triggers: 0,
            quit: false,
            responses: VecDeque::new(),
        })
    }

    /// Feeds one command line to the instrument.
    ///
    /// An invalid channel suffix queues `ERR invalid channel` while the unit
    /// is active.
    ///
    /// # Errors
    ///
    /// Propagates the [`DispatchError`] after queuing the error line.
    pub fn process(&mut self, line: &str) -> Result<Outcome, DispatchError> {
        let dispatcher = self.dispatcher.clone();
        dispatcher.process(line, self).inspect_err(|error| {
            warn!(target: INSTRUMENT_TARGET, %error, "rejected command");
            if self.active {
                self.respond("ERR invalid channel");
            }
        })
    }

    /// Returns the command table the instrument answers to.
    #[must_use]
    pub fn table(&self) -> &CommandTable<Command> {
        self.dispatcher.table()
    }

    /// Returns the unit's bus address.
    #[must_use]
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Returns `true` while the unit's address is selected.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the number of triggers seen since start-up.
    #[must_use]
    pub const fn trigger_count(&self) -> u64 {
        self.triggers
    }

    /// Returns `true` once `QUIT` has been received.
    #[must_use]
    pub const fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Returns the state of channel `number`, counted from 1.
    #[must_use]
    pub fn channel(&self, number: u32) -> Option<ChannelState> {
        self.channel_slot(number).and_then(|slot| self.channels.get(slot)).copied()
    }

    /// Removes and returns every queued response line.
    #[must_use]
    pub fn take_responses(&mut self) -> Vec<String> {
        self.responses.drain(..).collect()
    }

    fn respond(&mut self, line: impl Into<String>) {
        self.responses.push_back(line.into());
    }

    fn channel_slot(&self, number: u32) -> Option<usize> {
        let slot = usize::try_from(number).ok()?.checked_sub(1)?;
        (slot < self.channels.len()).then_some(slot)
    }

    fn select(&mut self, invocation: &Invocation<'_>) {
        if invocation.is_query() {
            return;
        }
        let selected = leading_address(invocation.args());
        self.active = selected == Some(self.address);
        info!(
            target: INSTRUMENT_TARGET,
            address = self.address,
            selected = ?selected,
            active = self.active,
            "bus address selected"
        );
        if self.active {
            let dispatcher = self.dispatcher.clone();
            if let Err(error) = dispatcher.process("*IDN?", self) {
                warn!(target: INSTRUMENT_TARGET, %error, "identity announcement failed");
            }
        }
    }

    fn identify(&mut self, invocation: &Invocation<'_>) {
        if invocation.is_query() {
            let identity = self.identity.clone();
            self.respond(identity);
        }
    }

    fn save(&mut self, invocation: &Invocation<'_>) {
        if !invocation.is_query() {
            self.saved.clone_from(&self.channels);
            debug!(target: INSTRUMENT_TARGET, "channel snapshot saved");
        }
    }

    fn recall(&mut self, invocation: &Invocation<'_>) {
        if !invocation.is_query() {
            self.channels.clone_from(&self.saved);
            debug!(target: INSTRUMENT_TARGET, "channel snapshot recalled");
        }
    }

    fn reset(&mut self, invocation: &Invocation<'_>) {
        if !invocation.is_query() {
            self.channels.fill(ChannelState::default());
            debug!(target: INSTRUMENT_TARGET, "channels reset");
        }
    }

    fn help(&mut self, invocation: &Invocation<'_>) {
        if !invocation.is_query() {
            return;
        }
        for descriptor in self.dispatcher.table().descriptors() {
            let line = format!("{} {}", descriptor.template().as_str(), descriptor.help());
            self.responses.push_back(line.trim_end().to_owned());
        }
    }

    fn system_address(&mut self, invocation: &Invocation<'_>) {
        if invocation.is_query() {
            self.respond(self.address.to_string());
        }
    }

    fn system_trigger(&mut self, invocation: &Invocation<'_>) {
        if invocation.is_query() {
            self.respond(self.triggers.to_string());
        }
    }

    fn set_channel(&mut self, invocation: &Invocation<'_>) {
        let Some(slot) = self.checked_slot(invocation.channel()) else {
            return;
        };
        if invocation.is_query() {
            if let Some(state) = self.channels.get(slot) {
                let level = state.level.to_string();
                self.respond(level);
            }
            return;
        }
        match (Level::parse(invocation.args().trim()), self.channels.get_mut(slot)) {
            (Some(level), Some(state)) => state.level = level,
            _ => self.respond("ERR unsupported state"),
        }
    }

    fn set_channel_mode(&mut self, invocation: &Invocation<'_>) {
        let Some(slot) = self.checked_slot(invocation.channel()) else {
            return;
        };
        if invocation.is_query() {
            if let Some(state) = self.channels.get(slot) {
                let mode = state.mode.to_string();
                self.respond(mode);
            }
            return;
        }
        match (
            ChannelMode::parse(invocation.args().trim()),
            self.channels.get_mut(slot),
        ) {
            (Some(mode), Some(state)) => state.mode = mode,
            _ => self.respond("ERR unsupported mode"),
        }
    }

    fn checked_slot(&mut self, channel: u32) -> Option<usize> {
        let slot = self.channel_slot(channel);
        if slot.is_none() {
            self.respond("ERR channel out of range");
        }
        slot
    }
}

impl CommandTarget<Command> for Instrument {
    fn invoke(&mut self, handler: &Command, invocation: &Invocation<'_>) {
        debug!(
            target: INSTRUMENT_TARGET,
            handler = ?handler,
            channel = invocation.channel(),
            query = invocation.is_query(),
            "handling command"
        );
        match handler {
            Command::Address => self.select(invocation),
            Command::Trigger => {
                if !invocation.is_query() {
                    self.triggers += 1;
                }
            }
            Command::Quit => self.quit = true,
            _ if !self.active => {}
            Command::Identify => self.identify(invocation),
            Command::Save => self.save(invocation),
            Command::Recall => self.recall(invocation),
            Command::Reset => self.reset(invocation),
            Command::Help => self.help(invocation),
            Command::SystemAddress => self.system_address(invocation),
            Command::SystemTrigger => self.system_trigger(invocation),
            Command::Channel => self.set_channel(invocation),
            Command::ChannelMode => self.set_channel_mode(invocation),
        }
    }
}

/// Reads the decimal number at the start of `args`, ignoring anything after
/// it, so `7abc` selects address 7.
fn leading_address(args: &str) -> Option<u8> {
    let text = args.trim_start();
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text.get(..end)?.parse().ok()
}
