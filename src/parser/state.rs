//! Parser state machine
//!
//! The decode-and-dispatch pipeline: every byte is fed through the
//! streaming UTF-8 decoder, and each accepted codepoint is handed to
//! the handler for the current control-level state. Handlers either
//! dispatch an operation on the screen, accumulate into the bounded
//! sequence buffer, or switch state.
//!
//! States:
//! - Normal: direct dispatch table over control codes, everything else draws
//! - Escape: one- or two-codepoint escape sequences
//! - Csi: body consumed by the screen's CSI capability
//! - Osc / Dcs: payload accumulation until a string terminator
//!
//! The parser never allocates after construction and recovers from any
//! malformed input; a bad sequence costs at most a truncated payload
//! and a logged diagnostic.

use std::fmt;

use tracing::warn;

use crate::control_codes as cc;
use crate::screen::{CsiFlow, Screen};
use crate::trace::Tracer;
use crate::utf8::{Utf8Decoder, Utf8Step};

/// Capacity of the sequence accumulation buffer. The write position
/// never reaches this value; a sequence that would is force-terminated.
pub const PARSER_BUF_SZ: usize = 8192;

/// Control-level parser state. Each variant carries only the data that
/// state needs, so nothing can read buffer content left over from a
/// previous state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    /// After ESC. `selector` holds the charset selector byte once one
    /// has been seen (ESC %, ESC (, ...), awaiting its argument.
    Escape { selector: Option<u8> },
    Csi,
    Osc,
    Dcs,
}

/// The control-stream decoder for one terminal session.
///
/// Holds the control-level state, the bounded accumulation buffer, and
/// the UTF-8 decoder state, all mutated in place by every processed
/// byte. One `Parser` per session; independent sessions are fully
/// independent values.
pub struct Parser {
    state: State,
    /// Accumulation buffer for OSC/DCS payloads and charset selectors
    buf: Box<[u8; PARSER_BUF_SZ]>,
    buf_pos: usize,
    /// UTF-8 decoder state, carried across chunks
    utf8: Utf8Decoder,
    /// Optional observer, unset in normal operation
    tracer: Option<Box<dyn Tracer>>,
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("state", &self.state)
            .field("buf_pos", &self.buf_pos)
            .field("utf8", &self.utf8)
            .field("traced", &self.tracer.is_some())
            .finish()
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a new parser in the normal state
    pub fn new() -> Self {
        Self {
            state: State::Normal,
            buf: Box::new([0; PARSER_BUF_SZ]),
            buf_pos: 0,
            utf8: Utf8Decoder::new(),
            tracer: None,
        }
    }

    /// Create a parser with a trace observer attached
    pub fn with_tracer(tracer: Box<dyn Tracer>) -> Self {
        let mut parser = Self::new();
        parser.tracer = Some(tracer);
        parser
    }

    /// Attach or detach the trace observer
    pub fn set_tracer(&mut self, tracer: Option<Box<dyn Tracer>>) {
        self.tracer = tracer;
    }

    /// Return the parser to its initial state: normal mode, empty
    /// buffer, UTF-8 decoder ready.
    pub fn reset(&mut self) {
        self.state = State::Normal;
        self.buf_pos = 0;
        self.utf8.reset();
    }

    /// Decode and dispatch a chunk of bytes.
    ///
    /// Processes the whole slice in one pass, in order, each byte once.
    /// Malformed UTF-8 is recovered silently: a byte that breaks a
    /// multi-byte sequence is re-offered from the clean decoder state,
    /// and a byte that is invalid on its own is dropped.
    pub fn parse_bytes<S: Screen>(&mut self, screen: &mut S, bytes: &[u8]) {
        for &byte in bytes {
            let mut step = self.utf8.advance(byte);
            if let Utf8Step::Reject { reoffer: true } = step {
                // The second offer runs from the ready state and can
                // never ask for a third.
                step = self.utf8.advance(byte);
            }
            if let Utf8Step::Accept(ch) = step {
                self.advance_char(screen, ch);
            }
        }
    }

    fn advance_char<S: Screen>(&mut self, screen: &mut S, ch: char) {
        match self.state {
            State::Normal => self.normal_char(screen, ch),
            State::Escape { selector } => self.escape_char(screen, ch, selector),
            State::Csi => {
                if screen.csi_put(ch) == CsiFlow::Done {
                    self.enter(State::Normal);
                }
            }
            State::Osc => self.osc_char(screen, ch),
            State::Dcs => {
                self.dcs_char(screen, ch);
                // A malformed terminator abandons the DCS and re-enters
                // escape mode; the offending codepoint doubles as the
                // first byte after ESC in the same cycle.
                if let State::Escape { selector } = self.state {
                    self.escape_char(screen, ch, selector);
                }
            }
        }
    }

    /// Switch state and logically clear the accumulation buffer.
    fn enter(&mut self, state: State) {
        self.state = state;
        self.buf_pos = 0;
    }

    // Normal mode

    fn normal_char<S: Screen>(&mut self, screen: &mut S, ch: char) {
        match ch {
            cc::BEL => self.call_handler(screen, "bell", ch, S::bell),
            cc::BS => self.call_handler(screen, "backspace", ch, S::backspace),
            cc::HT => self.call_handler(screen, "tab", ch, S::tab),
            cc::LF | cc::VT | cc::FF | cc::NEL => {
                self.call_handler(screen, "linefeed", ch, S::linefeed)
            }
            cc::CR => self.call_handler(screen, "carriage_return", ch, S::carriage_return),
            cc::SO | cc::SI => self.report_error(&format!(
                "unhandled charset change command ({:#04x}), ignoring",
                ch as u32
            )),
            cc::IND => self.call_handler(screen, "index", ch, S::index),
            cc::RI => self.call_handler(screen, "reverse_index", ch, S::reverse_index),
            cc::HTS => self.call_handler(screen, "set_tab_stop", ch, S::set_tab_stop),
            cc::ESC => self.enter(State::Escape { selector: None }),
            cc::CSI => self.enter(State::Csi),
            cc::OSC => self.enter(State::Osc),
            cc::DCS => self.enter(State::Dcs),
            cc::NUL | cc::DEL => {}
            _ => {
                self.trace_draw(ch);
                screen.draw(ch);
            }
        }
    }

    // Escape mode

    fn escape_char<S: Screen>(&mut self, screen: &mut S, ch: char, selector: Option<u8>) {
        let Some(first) = selector else {
            match ch {
                'P' => self.enter(State::Dcs),
                ']' => self.enter(State::Osc),
                '[' => self.enter(State::Csi),
                'c' => self.one_shot(screen, "reset", ch, S::reset),
                'D' => self.one_shot(screen, "index", ch, S::index),
                'E' => self.one_shot(screen, "linefeed", ch, S::linefeed),
                'M' => self.one_shot(screen, "reverse_index", ch, S::reverse_index),
                'H' => self.one_shot(screen, "set_tab_stop", ch, S::set_tab_stop),
                '7' => self.one_shot(screen, "save_cursor", ch, S::save_cursor),
                '8' => self.one_shot(screen, "restore_cursor", ch, S::restore_cursor),
                '>' => self.one_shot(screen, "normal_keypad_mode", ch, S::normal_keypad_mode),
                '=' => self.one_shot(screen, "alternate_keypad_mode", ch, S::alternate_keypad_mode),
                '%' | '(' | ')' | '*' | '+' | '-' | '.' | '/' | ' ' => {
                    self.state = State::Escape {
                        selector: Some(ch as u8),
                    };
                }
                _ => {
                    self.report_error(&format!("unknown char after ESC: {:#x}", ch as u32));
                    self.enter(State::Normal);
                }
            }
            return;
        };
        if first == b'%' && ch == 'G' {
            // Switch to UTF-8: we are permanently UTF-8, consume silently.
        } else {
            self.report_error(&format!(
                "unhandled charset related escape code: {:#x} {:#x}",
                first, ch as u32
            ));
        }
        self.enter(State::Normal);
    }

    // OSC accumulation

    fn osc_char<S: Screen>(&mut self, screen: &mut S, ch: char) {
        let done = match ch {
            cc::ST | cc::BEL => true,
            '\\' if self.last_buffered() == Some(cc::ESC_BYTE) => {
                // ESC \ terminator: retract the buffered ESC.
                self.buf_pos -= 1;
                true
            }
            cc::NUL | cc::DEL => false,
            _ => {
                if self.push_char(ch) {
                    false
                } else {
                    self.report_error("OSC sequence too long, truncating");
                    true
                }
            }
        };
        if done {
            self.dispatch_osc(screen);
            self.enter(State::Normal);
        }
    }

    // DCS accumulation

    fn dcs_char<S: Screen>(&mut self, screen: &mut S, ch: char) {
        let done = match ch {
            cc::ST => true,
            cc::NUL | cc::DEL => false,
            cc::ESC | '\u{20}'..='\u{7e}' => {
                if self.last_buffered() == Some(cc::ESC_BYTE) {
                    if ch == '\\' {
                        self.buf_pos -= 1;
                        true
                    } else {
                        // ESC followed by anything but a backslash is a
                        // malformed terminator: abandon the sequence and
                        // reinterpret this codepoint after a fresh ESC.
                        self.report_error(
                            "DCS sequence contained non-printable character: 0x1b, \
                             ignoring the sequence",
                        );
                        self.enter(State::Escape { selector: None });
                        return;
                    }
                } else if self.push_char(ch) {
                    false
                } else {
                    self.report_error("DCS sequence too long, truncating");
                    true
                }
            }
            _ => {
                self.report_error(&format!(
                    "DCS sequence contained non-printable character: {:#x}, ignoring it",
                    ch as u32
                ));
                false
            }
        };
        if done {
            self.dispatch_dcs(screen);
            self.enter(State::Normal);
        }
    }

    fn dispatch_osc<S: Screen>(&mut self, screen: &mut S) {
        self.trace_command("osc", &[self.buf_pos as u32]);
        screen.osc_dispatch(&self.buf[..self.buf_pos]);
    }

    fn dispatch_dcs<S: Screen>(&mut self, screen: &mut S) {
        self.trace_command("dcs", &[self.buf_pos as u32]);
        screen.dcs_dispatch(&self.buf[..self.buf_pos]);
    }

    // Buffer management

    /// Append one codepoint as UTF-8. Returns false when the sequence
    /// would overflow; nothing is written in that case.
    fn push_char(&mut self, ch: char) -> bool {
        let len = ch.len_utf8();
        if self.buf_pos + len > PARSER_BUF_SZ - 1 {
            return false;
        }
        ch.encode_utf8(&mut self.buf[self.buf_pos..]);
        self.buf_pos += len;
        true
    }

    fn last_buffered(&self) -> Option<u8> {
        self.buf_pos.checked_sub(1).map(|i| self.buf[i])
    }

    // Dispatch plumbing

    fn call_handler<S: Screen>(
        &mut self,
        screen: &mut S,
        name: &'static str,
        ch: char,
        op: fn(&mut S),
    ) {
        self.trace_command(name, &[ch as u32]);
        op(screen);
    }

    /// Dispatch one escape-mode operation and return to normal mode.
    fn one_shot<S: Screen>(
        &mut self,
        screen: &mut S,
        name: &'static str,
        ch: char,
        op: fn(&mut S),
    ) {
        self.call_handler(screen, name, ch, op);
        self.enter(State::Normal);
    }

    fn trace_command(&mut self, name: &'static str, args: &[u32]) {
        if let Some(tracer) = self.tracer.as_deref_mut() {
            tracer.command(name, args);
        }
    }

    fn trace_draw(&mut self, ch: char) {
        if let Some(tracer) = self.tracer.as_deref_mut() {
            tracer.draw(ch);
        }
    }

    fn report_error(&mut self, message: &str) {
        warn!("{message}");
        if let Some(tracer) = self.tracer.as_deref_mut() {
            tracer.error(message);
        }
    }
}
