//! Unit and behaviour tests for `mscpi-shell`.

use rstest::fixture;

use mscpi_config::Config;

use crate::Instrument;



#[fixture]
fn instrument() -> Instrument {
    Instrument::new(&Config::default()).expect("default configuration builds")
}

/// Processes `line` and returns the responses it queued.
fn exchange(instrument: &mut Instrument, line: &str) -> Vec<String> {
    let _ = instrument.process(line);
    instrument.take_responses()
}
