//! Streaming UTF-8 decoding for the terminal parser
//!
//! A DFA-based decoder: one byte in, one of pending / character /
//! rejected out. State is carried across calls so a multi-byte
//! character may be split across read chunks. Rejection returns the
//! decoder to its ready state and tells the caller whether the
//! offending byte should be offered again (it arrived mid-sequence and
//! may itself start a valid character).

const UTF8_ACCEPT: u32 = 0;
const UTF8_REJECT: u32 = 12;

/// Maps each byte to a character class.
#[rustfmt::skip]
static CLASS: [u8; 256] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 00..0f
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 10..1f
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 20..2f
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 30..3f
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 40..4f
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 50..5f
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 60..6f
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 70..7f
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, // 80..8f
    9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, // 90..9f
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, // a0..af
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, // b0..bf
    8, 8, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, // c0..cf
    2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, // d0..df
   10, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 4, 3, 3, // e0..ef
   11, 6, 6, 6, 5, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, // f0..ff
];

/// Maps (state + character class) to the next state. States are
/// multiples of 12 so the lookup is a single add and index.
#[rustfmt::skip]
static TRANSITION: [u8; 108] = [
     0, 12, 24, 36, 60, 96, 84, 12, 12, 12, 48, 72,
    12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12,
    12,  0, 12, 12, 12, 12, 12,  0, 12,  0, 12, 12,
    12, 24, 12, 12, 12, 12, 12, 24, 12, 24, 12, 12,
    12, 12, 12, 12, 12, 12, 12, 24, 12, 12, 12, 12,
    12, 24, 12, 12, 12, 12, 12, 12, 12, 24, 12, 12,
    12, 12, 12, 12, 12, 12, 12, 36, 12, 36, 12, 12,
    12, 36, 12, 12, 12, 12, 12, 36, 12, 36, 12, 12,
    12, 36, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12,
];

/// UTF-8 decoder state
#[derive(Debug, Clone, Default)]
pub struct Utf8Decoder {
    state: u32,
    codepoint: u32,
}

/// Result of feeding a byte to the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utf8Step {
    /// Need more bytes
    Incomplete,
    /// Successfully decoded a character
    Accept(char),
    /// Invalid sequence; the decoder is ready again. When `reoffer` is
    /// true the rejected byte arrived after a partial sequence and must
    /// be fed once more from the clean state.
    Reject { reoffer: bool },
}

impl Utf8Decoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the decoder state
    pub fn reset(&mut self) {
        self.state = UTF8_ACCEPT;
        self.codepoint = 0;
    }

    /// Feed a byte to the decoder
    pub fn advance(&mut self, byte: u8) -> Utf8Step {
        let class = u32::from(CLASS[byte as usize]);
        self.codepoint = if self.state == UTF8_ACCEPT {
            (0xff >> class) & u32::from(byte)
        } else {
            (u32::from(byte) & 0x3f) | (self.codepoint << 6)
        };
        let prev = self.state;
        self.state = u32::from(TRANSITION[(self.state + class) as usize]);
        match self.state {
            UTF8_ACCEPT => {
                // The DFA only accepts valid scalar values.
                let ch = char::from_u32(self.codepoint).unwrap_or(char::REPLACEMENT_CHARACTER);
                Utf8Step::Accept(ch)
            }
            UTF8_REJECT => {
                self.reset();
                Utf8Step::Reject {
                    reoffer: prev != UTF8_ACCEPT,
                }
            }
            _ => Utf8Step::Incomplete,
        }
    }
}
