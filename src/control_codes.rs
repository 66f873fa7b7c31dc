//! Control-code constants shared by the mode handlers
//!
//! The parser matches on decoded codepoints, so C1 controls appear here
//! as their Unicode values (they arrive on the wire as two-byte UTF-8).

// C0 controls
pub const NUL: char = '\u{00}';
pub const BEL: char = '\u{07}';
pub const BS: char = '\u{08}';
pub const HT: char = '\u{09}';
pub const LF: char = '\u{0a}';
pub const VT: char = '\u{0b}';
pub const FF: char = '\u{0c}';
pub const CR: char = '\u{0d}';
pub const SO: char = '\u{0e}';
pub const SI: char = '\u{0f}';
pub const ESC: char = '\u{1b}';
pub const DEL: char = '\u{7f}';

// C1 controls
pub const IND: char = '\u{84}';
pub const NEL: char = '\u{85}';
pub const HTS: char = '\u{88}';
pub const RI: char = '\u{8d}';
pub const DCS: char = '\u{90}';
pub const CSI: char = '\u{9b}';
pub const ST: char = '\u{9c}';
pub const OSC: char = '\u{9d}';

/// ESC as it sits in the accumulation buffer.
pub const ESC_BYTE: u8 = 0x1b;
