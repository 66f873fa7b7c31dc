//! Control-stream recognizer
//!
//! A stateful decoder that turns a terminal byte stream into dispatched
//! operations on a [`Screen`](crate::screen::Screen). Bytes pass
//! through a streaming UTF-8 decoder first; decoded codepoints drive a
//! four-state control recognizer (normal, escape, OSC, DCS) plus a CSI
//! entry state whose body grammar belongs to the screen.

mod state;

pub use state::{Parser, PARSER_BUF_SZ};
