//! Stream driver: feeds bytes from a readable fd into the decoder
//!
//! One blocking `read(2)` per call into a fixed buffer, then the whole
//! chunk goes through the decode-and-dispatch pipeline. EINTR is
//! retried transparently; EIO means the writing side of a PTY is gone
//! and counts as an orderly end of stream, not an error.

use std::os::fd::AsRawFd;

use nix::errno::Errno;
use nix::unistd;
use tracing::debug;

use crate::parser::Parser;
use crate::screen::Screen;

/// Size of the driver's read buffer.
pub const READ_BUF_SZ: usize = 8192;

/// Error for a stream read that failed for a reason other than the
/// stream ending.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("Failed to read from stream: {0}")]
    Read(#[source] nix::Error),
}

/// Result type for stream driver operations
pub type StreamResult<T> = Result<T, StreamError>;

/// Owns the fixed read buffer and pulls one chunk per call.
pub struct StreamReader {
    buf: Box<[u8; READ_BUF_SZ]>,
}

impl Default for StreamReader {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamReader {
    /// Create a reader with its buffer pre-allocated
    pub fn new() -> Self {
        Self {
            buf: Box::new([0; READ_BUF_SZ]),
        }
    }

    /// Read once from `fd` and feed whatever arrives to the parser.
    ///
    /// Returns `Ok(true)` if any bytes were processed and `Ok(false)`
    /// when the stream has ended (EOF, or EIO from a PTY whose other
    /// side closed). Any other read failure is propagated.
    pub fn read_into<F: AsRawFd, S: Screen>(
        &mut self,
        parser: &mut Parser,
        screen: &mut S,
        fd: &F,
    ) -> StreamResult<bool> {
        let raw = fd.as_raw_fd();
        let len = loop {
            match unistd::read(raw, &mut self.buf[..]) {
                Ok(len) => break len,
                Err(Errno::EINTR) => continue,
                Err(Errno::EIO) => {
                    debug!("stream read returned EIO, treating as end of stream");
                    return Ok(false);
                }
                Err(err) => return Err(StreamError::Read(err)),
            }
        };
        if len == 0 {
            debug!("stream reached end of file");
            return Ok(false);
        }
        parser.parse_bytes(screen, &self.buf[..len]);
        Ok(true)
    }
}
