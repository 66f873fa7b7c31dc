//! vtstream — control-stream decoder core for terminal emulators
//!
//! Consumes a raw terminal byte stream and turns it into discrete
//! operations on a screen model, decoding UTF-8 along the way. The
//! crate provides:
//!
//! - `parser`: the nested state machine (UTF-8 decoding composed with
//!   the control-sequence recognizer)
//! - `screen`: the dispatch-sink trait the decoder calls into
//! - `stream`: the fd read loop feeding the decoder
//! - `trace`: optional structured observation for test harnesses
//!
//! One [`Parser`] serves one terminal session and carries fixed memory
//! regardless of input: malformed or pathological streams can truncate
//! a sequence or cost a logged diagnostic, never grow state or crash
//! the session.

pub mod control_codes;
pub mod parser;
pub mod screen;
pub mod stream;
pub mod trace;

mod utf8;

pub use parser::{Parser, PARSER_BUF_SZ};
pub use screen::{CsiFlow, Screen};
pub use stream::{StreamError, StreamReader, StreamResult, READ_BUF_SZ};
pub use trace::{Recorder, TraceEvent, Tracer};
