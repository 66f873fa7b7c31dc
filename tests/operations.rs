//! Operation-sequence tests for the decoder
//!
//! The reference harness for the decoder's observable behavior: every
//! scenario feeds a byte stream and asserts the exact sequence of
//! trace events it produces, rather than poking at rendering state.

use std::sync::Once;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vtstream::{Parser, Recorder, Screen, TraceEvent, PARSER_BUF_SZ};

static TRACING: Once = Once::new();

/// Route parser diagnostics through the test harness, so running with
/// `RUST_LOG=warn` shows recovered protocol errors next to the
/// assertions they belong to.
fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .init();
    });
}

/// Screen that accepts everything and keeps nothing; all observable
/// output flows through the trace interface.
struct Null;

impl Screen for Null {}

fn record(bytes: &[u8]) -> Vec<TraceEvent> {
    init_tracing();
    let recorder = Recorder::new();
    let mut parser = Parser::with_tracer(Box::new(recorder.clone()));
    let mut screen = Null;
    parser.parse_bytes(&mut screen, bytes);
    recorder.take()
}

fn command(name: &str, args: &[u32]) -> TraceEvent {
    TraceEvent::Command {
        name: name.to_string(),
        args: args.to_vec(),
    }
}

#[test]
fn printable_ascii_is_one_draw_per_byte() {
    let input = "The quick brown fox jumps over the lazy dog 0123456789";
    let events = record(input.as_bytes());

    assert_eq!(events.len(), input.len());
    for (event, expected) in events.iter().zip(input.chars()) {
        assert_eq!(*event, TraceEvent::Draw(expected));
    }
}

#[test]
fn esc_c_is_exactly_one_reset() {
    let events = record(b"\x1bc");
    assert_eq!(events, vec![command("reset", &[b'c' as u32])]);
}

#[test]
fn csi_entry_emits_nothing() {
    assert!(record(b"\x1b[").is_empty());
}

#[test]
fn osc_terminators_yield_same_payload_length() {
    let by_bel = record(b"\x1b]0;window title\x07");
    let by_st = record(b"\x1b]0;window title\x1b\\");

    assert_eq!(by_bel, vec![command("osc", &[14])]);
    assert_eq!(by_bel, by_st);
}

#[test]
fn oversize_osc_truncates_with_one_error() {
    let mut input = vec![0x1b, b']'];
    input.extend(std::iter::repeat(b'x').take(PARSER_BUF_SZ * 2));
    let events = record(&input);

    // One error, one dispatch of the truncated payload, then the
    // remaining bytes draw from normal mode.
    assert_eq!(
        events[0],
        TraceEvent::Error("OSC sequence too long, truncating".to_string())
    );
    assert_eq!(events[1], command("osc", &[(PARSER_BUF_SZ - 1) as u32]));
    let drawn = events[2..]
        .iter()
        .filter(|ev| matches!(ev, TraceEvent::Draw('x')))
        .count();
    assert_eq!(drawn, events.len() - 2);
    assert_eq!(drawn, PARSER_BUF_SZ * 2 - (PARSER_BUF_SZ - 1) - 1);
}

#[test]
fn malformed_dcs_restarts_as_escape() {
    // ESC inside the DCS followed by 'c': the DCS dies with one error
    // and the 'c' becomes ESC c, a full reset.
    let events = record(b"\x1bPpayload\x1bc");

    assert_eq!(events.len(), 2);
    assert!(matches!(
        &events[0],
        TraceEvent::Error(msg) if msg.contains("DCS sequence contained non-printable character")
    ));
    assert_eq!(events[1], command("reset", &[b'c' as u32]));
}

#[test]
fn codepoint_split_across_chunks_draws_once() {
    init_tracing();
    let recorder = Recorder::new();
    let mut parser = Parser::with_tracer(Box::new(recorder.clone()));
    let mut screen = Null;

    let bytes = "🎉".as_bytes();
    parser.parse_bytes(&mut screen, &bytes[..2]);
    assert!(recorder.events().is_empty());
    parser.parse_bytes(&mut screen, &bytes[2..]);
    assert_eq!(recorder.take(), vec![TraceEvent::Draw('🎉')]);
}

#[test]
fn invalid_utf8_recovers_silently() {
    // Stray continuation byte: dropped without any event
    assert!(record(b"\x80").is_empty());

    // Lead byte followed by an invalid continuation: the second byte
    // is retried clean and draws, the broken lead vanishes silently
    let events = record(b"\xe4\xb8A");
    assert_eq!(events, vec![TraceEvent::Draw('A')]);
}

#[test]
fn control_codes_dispatch_by_name() {
    let events = record(b"\x07\x08\x09\x0a\x0d");
    assert_eq!(
        events,
        vec![
            command("bell", &[0x07]),
            command("backspace", &[0x08]),
            command("tab", &[0x09]),
            command("linefeed", &[0x0a]),
            command("carriage_return", &[0x0d]),
        ]
    );
}

#[test]
fn session_survives_garbage() {
    // A grab bag of malformed input must leave the parser able to
    // process clean input afterwards.
    init_tracing();
    let recorder = Recorder::new();
    let mut parser = Parser::with_tracer(Box::new(recorder.clone()));
    let mut screen = Null;

    parser.parse_bytes(&mut screen, b"\x1bZ\x1bP\x01\x02\x1bq\xff\xfe\x1b]\x00\x07");
    recorder.take();

    parser.parse_bytes(&mut screen, b"ok");
    assert_eq!(
        recorder.take(),
        vec![TraceEvent::Draw('o'), TraceEvent::Draw('k')]
    );
}
