//! Dispatch sink for decoded terminal operations
//!
//! The decoder does not own a grid or a cursor; it calls into a
//! [`Screen`] implementation, which applies each operation to whatever
//! terminal model sits behind it. Every call is fire-and-forget.

/// Flow control returned by [`Screen::csi_put`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsiFlow {
    /// The control sequence continues; feed the next codepoint.
    More,
    /// The control sequence is complete; return to normal processing.
    Done,
}

/// Receiver for the operations the decoder produces.
///
/// All methods default to no-ops so an implementation only has to
/// handle the operations it cares about. `draw` is the only operation
/// carrying a payload besides the accumulated OSC/DCS strings.
pub trait Screen {
    /// Ring the bell.
    fn bell(&mut self) {}

    /// Move the cursor one column left.
    fn backspace(&mut self) {}

    /// Advance the cursor to the next tab stop.
    fn tab(&mut self) {}

    /// Move the cursor to the next line.
    fn linefeed(&mut self) {}

    /// Move the cursor to column zero.
    fn carriage_return(&mut self) {}

    /// Move down one line, scrolling if at the bottom margin.
    fn index(&mut self) {}

    /// Move up one line, scrolling if at the top margin.
    fn reverse_index(&mut self) {}

    /// Set a tab stop at the current column.
    fn set_tab_stop(&mut self) {}

    /// Place a character at the cursor position.
    fn draw(&mut self, _ch: char) {}

    /// Full terminal reset (RIS).
    fn reset(&mut self) {}

    /// Save cursor position and attributes (DECSC).
    fn save_cursor(&mut self) {}

    /// Restore cursor position and attributes (DECRC).
    fn restore_cursor(&mut self) {}

    /// Switch the keypad to numeric mode (DECPNM).
    fn normal_keypad_mode(&mut self) {}

    /// Switch the keypad to application mode (DECPAM).
    fn alternate_keypad_mode(&mut self) {}

    /// An operating system command finished accumulating. The payload
    /// is the raw accumulated bytes; interpreting them is the
    /// implementation's business.
    fn osc_dispatch(&mut self, _payload: &[u8]) {}

    /// A device control string finished accumulating.
    fn dcs_dispatch(&mut self, _payload: &[u8]) {}

    /// Consume one codepoint of a control sequence (CSI) body.
    ///
    /// The implementation owns the CSI grammar — parameters,
    /// intermediates, and dispatch are its concern. The decoder only
    /// needs to know when the sequence has ended. The default
    /// recognizes the standard final-byte range 0x40-0x7E without
    /// retaining anything; implementations that parse CSI bodies
    /// override it.
    fn csi_put(&mut self, ch: char) -> CsiFlow {
        if ('\u{40}'..='\u{7e}').contains(&ch) {
            CsiFlow::Done
        } else {
            CsiFlow::More
        }
    }
}
