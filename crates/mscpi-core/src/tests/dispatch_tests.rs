//! Tests for [`Dispatcher`] matching and invocation.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::{Call, Cmd, Recorder, instrument_table};
use crate::{
    CommandTable, DispatchError, Dispatcher, Outcome, ParserConfig, starts_with_ignore_ascii_case,
};

#[fixture]
fn dispatcher() -> Dispatcher<Cmd> {
    Dispatcher::new(instrument_table())
}

fn dispatch_one(dispatcher: &Dispatcher<Cmd>, line: &str) -> Call {
    let mut recorder = Recorder::default();
    let outcome = dispatcher
        .process(line, &mut recorder)
        .expect("dispatch succeeds");
    assert!(
        matches!(outcome, Outcome::Dispatched { .. }),
        "expected '{line}' to dispatch"
    );
    assert_eq!(recorder.calls.len(), 1, "exactly one handler runs");
    recorder.calls.remove(0)
}

// ---------------------------------------------------------------------------
// Basic dispatch
// ---------------------------------------------------------------------------

#[rstest]
fn two_segment_query_dispatches_without_channel(dispatcher: Dispatcher<Cmd>) {
    let call = dispatch_one(&dispatcher, "SYST:ADDR?");
    assert_eq!(
        call,
        Call {
            handler: Cmd::SystemAddress,
            command: String::from("SYST:ADDR?"),
            query: true,
            channel: 0,
            args: String::new(),
        }
    );
}

#[rstest]
fn channel_command_with_arguments(dispatcher: Dispatcher<Cmd>) {
    let call = dispatch_one(&dispatcher, "CHAN2 ON");
    assert_eq!(call.handler, Cmd::Channel);
    assert_eq!(call.channel, 2);
    assert_eq!(call.args, "ON");
    assert!(!call.query);
}

#[rstest]
#[case("CHAN3", 3, false)]
#[case("CHAN3?", 3, true)]
#[case("chan7?", 7, true)]
#[case("CHANNEL5", 5, false)]
#[case("CHAN0", 0, false)]
fn channel_digit_is_read_from_input(
    dispatcher: Dispatcher<Cmd>,
    #[case] line: &str,
    #[case] channel: u32,
    #[case] query: bool,
) {
    let call = dispatch_one(&dispatcher, line);
    assert_eq!(call.handler, Cmd::Channel);
    assert_eq!(call.channel, channel);
    assert_eq!(call.query, query);
}

#[rstest]
fn only_the_last_character_addresses_the_channel(dispatcher: Dispatcher<Cmd>) {
    let call = dispatch_one(&dispatcher, "CHAN12");
    assert_eq!(call.channel, 2);
}

#[rstest]
fn channel_subcommand_uses_segment_count(dispatcher: Dispatcher<Cmd>) {
    let call = dispatch_one(&dispatcher, "CHAN4:MODE OUTPUT");
    assert_eq!(call.handler, Cmd::ChannelMode);
    assert_eq!(call.channel, 4);
    assert_eq!(call.args, "OUTPUT");
}

#[rstest]
fn handler_receives_the_original_line(dispatcher: Dispatcher<Cmd>) {
    let call = dispatch_one(&dispatcher, "chan1:mode? now");
    assert_eq!(call.command, "chan1:mode? now");
    assert!(call.query);
    assert_eq!(call.args, "now");
}

// ---------------------------------------------------------------------------
// Prefix matching
// ---------------------------------------------------------------------------

#[rstest]
#[case::exact("SYST:TRIG?")]
#[case::lowercase("syst:trig?")]
#[case::longer_input("SYSTEM:TRIGGER?")]
#[case::mixed_case("System:Trigger")]
fn longer_or_differently_cased_input_matches(dispatcher: Dispatcher<Cmd>, #[case] line: &str) {
    let call = dispatch_one(&dispatcher, line);
    assert_eq!(call.handler, Cmd::SystemTrigger);
}

#[rstest]
#[case::abbreviated_first("SY:TRIG?")]
#[case::abbreviated_second("SYST:TR?")]
#[case::extra_segment("SYST:TRIG:NOW")]
#[case::missing_segment("SYST")]
#[case::prefix_not_at_start("XSYST:TRIG")]
#[case::unknown("BOGUS")]
#[case::empty("")]
fn non_matching_lines_are_absorbed(dispatcher: Dispatcher<Cmd>, #[case] line: &str) {
    let mut recorder = Recorder::default();
    let outcome = dispatcher
        .process(line, &mut recorder)
        .expect("unmatched lines are not errors");
    assert_eq!(outcome, Outcome::Unmatched);
    assert!(recorder.calls.is_empty());
}

#[rstest]
#[case::exact("SYST", "SYST", true)]
#[case::longer_input("system", "SYST", true)]
#[case::empty_prefix("CHAN", "", true)]
#[case::shorter_input("SY", "SYST", false)]
#[case::different_text("XSYST", "SYST", false)]
#[case::multibyte_input("\u{e9}t\u{e9}", "E", false)]
fn prefix_rule_ignores_ascii_case_only(
    #[case] input: &str,
    #[case] prefix: &str,
    #[case] expected: bool,
) {
    assert_eq!(starts_with_ignore_ascii_case(input, prefix), expected);
}

#[rstest]
fn earlier_entry_wins_on_shared_prefix(dispatcher: Dispatcher<Cmd>) {
    // "IDN" does not start with "*IDN", so the later "ID" entry takes it.
    assert_eq!(dispatch_one(&dispatcher, "IDN?").handler, Cmd::ShortId);
    assert_eq!(dispatch_one(&dispatcher, "*IDN?").handler, Cmd::Identify);
}

#[test]
fn first_declared_of_two_matching_templates_fires() {
    let table = CommandTable::builder()
        .command("ID", Cmd::ShortId, "")
        .command("IDN", Cmd::Identify, "")
        .build()
        .expect("valid table");
    let dispatcher = Dispatcher::new(table);
    let mut recorder = Recorder::default();

    let outcome = dispatcher
        .process("IDN?", &mut recorder)
        .expect("dispatch succeeds");

    assert_eq!(outcome, Outcome::Dispatched { index: 0 });
    assert_eq!(recorder.calls.len(), 1);
    assert_eq!(
        recorder.calls.first().map(|call| call.handler),
        Some(Cmd::ShortId)
    );
}

#[test]
fn empty_channel_segment_matches_any_first_segment() {
    let table = CommandTable::builder()
        .channel_command("0:LEVEL", Cmd::Channel, "")
        .build()
        .expect("valid table");
    let dispatcher = Dispatcher::new(table);
    let call = dispatch_one(&dispatcher, "6:LEVEL 3.3");
    assert_eq!(call.channel, 6);
    assert_eq!(call.args, "3.3");
}

// ---------------------------------------------------------------------------
// Channel digit validation
// ---------------------------------------------------------------------------

#[rstest]
#[case::letter("CHAN", Some('N'))]
#[case::symbol("CHAN#?", Some('#'))]
#[case::letter_before_subcommand("CHANX:MODE", Some('X'))]
fn missing_channel_digit_is_reported(
    dispatcher: Dispatcher<Cmd>,
    #[case] line: &str,
    #[case] suffix: Option<char>,
) {
    let mut recorder = Recorder::default();
    let error = dispatcher
        .process(line, &mut recorder)
        .expect_err("non-digit suffix must fail");
    let DispatchError::InvalidChannel {
        command,
        template,
        suffix: found,
    } = error;
    assert_eq!(command, line);
    assert!(template.starts_with("CHAN0"), "unexpected template {template}");
    assert_eq!(found, suffix);
    assert!(recorder.calls.is_empty(), "no handler runs on error");
}

#[test]
fn empty_first_segment_reports_missing_suffix() {
    let table = CommandTable::builder()
        .channel_command("0:LEVEL", Cmd::Channel, "")
        .build()
        .expect("valid table");
    let dispatcher = Dispatcher::new(table);
    let error = dispatcher
        .resolve(":LEVEL")
        .expect_err("empty first segment has no digit");
    assert!(matches!(
        error,
        DispatchError::InvalidChannel { suffix: None, .. }
    ));
}

// ---------------------------------------------------------------------------
// Limits, resolution, and sharing
// ---------------------------------------------------------------------------

#[test]
fn lines_over_segment_limit_never_match() {
    let table = CommandTable::builder()
        .command("A", Cmd::Help, "")
        .command("A:B", Cmd::Identify, "")
        .build_with(ParserConfig::new(2))
        .expect("valid table");
    let dispatcher = Dispatcher::new(table);
    assert!(dispatcher.resolve("A:B:C").expect("resolve").is_none());
    assert!(dispatcher.resolve("A:B").expect("resolve").is_some());
}

#[rstest]
fn resolve_reports_match_without_invoking(dispatcher: Dispatcher<Cmd>) {
    let resolution = dispatcher
        .resolve("CHAN5:MODE? ")
        .expect("resolve succeeds")
        .expect("line matches");
    assert_eq!(resolution.index(), 7);
    assert_eq!(resolution.descriptor().handler(), &Cmd::ChannelMode);
    assert_eq!(resolution.invocation().channel(), 5);
    assert!(resolution.invocation().is_query());
    assert_eq!(resolution.invocation().args(), "");
}

#[rstest]
fn processing_is_idempotent(dispatcher: Dispatcher<Cmd>) {
    let first = dispatch_one(&dispatcher, "CHAN6:MODE IN");
    let second = dispatch_one(&dispatcher, "CHAN6:MODE IN");
    assert_eq!(first, second);
}

#[rstest]
fn clones_share_one_table(dispatcher: Dispatcher<Cmd>) {
    let clone = dispatcher.clone();
    assert!(std::ptr::eq(dispatcher.table(), clone.table()));
}

#[test]
fn shared_table_can_back_several_dispatchers() {
    let table = Arc::new(instrument_table());
    let first = Dispatcher::from_shared(Arc::clone(&table));
    let second = Dispatcher::from_shared(table);
    assert_eq!(dispatch_one(&first, "HELP?").handler, Cmd::Help);
    assert_eq!(dispatch_one(&second, "HELP?").handler, Cmd::Help);
}

#[rstest]
fn address_command_receives_argument_text(dispatcher: Dispatcher<Cmd>) {
    let call = dispatch_one(&dispatcher, "++ADDR 3");
    assert_eq!(call.handler, Cmd::Address);
    assert_eq!(call.args, "3");
    assert!(!call.query);
    assert_eq!(call.channel, 0);
}
