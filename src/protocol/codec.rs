//! Protocol codec
//!
//! Encoding of client commands and incremental decoding of status lines.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! PUT <x> <y>\n
//! LOGIN <user> <password>\n
//! ```
//!
//! ### Response Format
//! ```text
//! ID <id> <width> <height> <boardString>\n
//! ```
//!
//! Reads arrive in arbitrary chunks, so bytes are accumulated in a
//! [`LineBuffer`] until a newline shows up. Only newly appended bytes are
//! scanned for the newline, keeping decode cost linear in bytes received.

use std::io::{ErrorKind, Read, Write};

use bytes::{Buf, BytesMut};

use crate::error::{BoardError, Result};
use super::Command;

/// Line terminator
pub const NEWLINE: u8 = b'\n';

/// Size of a single socket read
pub const READ_CHUNK_SIZE: usize = 1024;

/// Default maximum line length (64 KB)
pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024;

// =============================================================================
// Command Encoding
// =============================================================================

/// Encode a command as one newline-terminated line
pub fn encode_command(command: &Command) -> Result<Vec<u8>> {
    command.validate()?;
    let mut line = command.to_string().into_bytes();
    line.push(NEWLINE);
    Ok(line)
}

/// Write a command to a stream
///
/// The command is validated and encoded before the first byte is written.
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Line Decoding
// =============================================================================

/// Receive buffer that yields one complete line at a time
#[derive(Debug)]
pub struct LineBuffer {
    /// Bytes read from the stream that have not been returned yet
    buffer: BytesMut,

    /// Prefix of `buffer` already known to hold no newline
    scanned: usize,

    /// Max bytes in one line, newline excluded
    max_line_len: usize,

    /// Dropping the rest of an overlong line until its newline
    discarding: bool,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::with_max_line_len(DEFAULT_MAX_LINE_LEN)
    }

    pub fn with_max_line_len(max_line_len: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(READ_CHUNK_SIZE),
            scanned: 0,
            max_line_len,
            discarding: false,
        }
    }

    /// Append bytes read from the stream
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Read one chunk from `reader` into the buffer
    ///
    /// Returns the number of bytes read; 0 means the peer closed the stream.
    pub fn fill_from<R: Read>(&mut self, reader: &mut R) -> std::io::Result<usize> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let n = reader.read(&mut chunk)?;
        self.extend(&chunk[..n]);
        Ok(n)
    }

    /// Split off the next complete line, without its newline
    ///
    /// Returns `Ok(None)` when no newline has arrived yet. A line longer than
    /// `max_line_len` fails exactly once, whether it arrived whole or in
    /// pieces, and its bytes are dropped through the terminating newline so
    /// the following line decodes normally. Invalid UTF-8 also fails.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            let unscanned = &self.buffer[self.scanned..];
            match unscanned.iter().position(|&b| b == NEWLINE) {
                Some(offset) => {
                    let end = self.scanned + offset;
                    self.scanned = 0;

                    if self.discarding {
                        // Tail of a line already reported as too long
                        self.buffer.advance(end + 1);
                        self.discarding = false;
                        continue;
                    }
                    if end > self.max_line_len {
                        self.buffer.advance(end + 1);
                        return Err(self.too_long());
                    }

                    let line = self.buffer.split_to(end);
                    self.buffer.advance(1);
                    let line = String::from_utf8(line.to_vec()).map_err(|e| {
                        BoardError::Protocol(format!("status line is not valid UTF-8: {e}"))
                    })?;
                    return Ok(Some(line));
                }
                None if self.discarding => {
                    self.clear();
                    return Ok(None);
                }
                None => {
                    self.scanned = self.buffer.len();
                    if self.scanned > self.max_line_len {
                        self.clear();
                        self.discarding = true;
                        return Err(self.too_long());
                    }
                    return Ok(None);
                }
            }
        }
    }

    fn too_long(&self) -> BoardError {
        BoardError::Protocol(format!("line longer than {} bytes", self.max_line_len))
    }

    /// Bytes buffered but not yet returned as a line
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Drop everything buffered
    ///
    /// An overlong line being skipped stays skipped until its newline.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.scanned = 0;
    }
}

/// Read one complete line from a blocking stream
///
/// No deadline is applied beyond whatever the reader itself enforces.
/// A zero-byte read before the newline fails with `ConnectionClosed`.
pub fn read_line<R: Read>(reader: &mut R, buffer: &mut LineBuffer) -> Result<String> {
    loop {
        if let Some(line) = buffer.next_line()? {
            return Ok(line);
        }
        match buffer.fill_from(reader) {
            Ok(0) => {
                return Err(BoardError::ConnectionClosed(format!(
                    "peer closed the stream with {} bytes of a partial line buffered",
                    buffer.pending()
                )))
            }
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(BoardError::from_stream(e, std::time::Duration::ZERO)),
        }
    }
}
