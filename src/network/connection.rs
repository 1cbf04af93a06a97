//! Connection Handler
//!
//! Owns one live transport and its receive buffer.

use std::io::ErrorKind;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::{BoardError, Result};
use crate::protocol::{encode_command, Command, LineBuffer};
use super::{CancelToken, Transport};

/// A single connection to the game server
pub struct Connection<T: Transport> {
    /// Underlying byte stream
    transport: T,

    /// Bytes received but not yet returned as a line
    buffer: LineBuffer,

    /// Checked between read slices and partial writes
    cancel: CancelToken,

    /// Deadline for one complete line
    read_timeout: Option<Duration>,

    /// Deadline for one complete command
    write_timeout: Option<Duration>,

    /// Longest single blocking read or write
    poll_interval: Duration,

    /// Peer address for logging
    peer_addr: String,
}

impl<T: Transport> Connection<T> {
    /// Wrap an open transport
    pub fn new(transport: T, config: &Config, cancel: CancelToken) -> Result<Self> {
        let peer_addr = transport.peer_label();

        Ok(Self {
            transport,
            buffer: LineBuffer::with_max_line_len(config.max_line_len),
            cancel,
            read_timeout: config.read_timeout(),
            write_timeout: config.write_timeout(),
            poll_interval: config.poll_interval(),
            peer_addr,
        })
    }

    /// Read the next complete line (newline excluded)
    ///
    /// Blocks in slices of at most `poll_interval` so cancellation is noticed
    /// while waiting, and fails with `Timeout` once `read_timeout` elapses
    /// without a complete line.
    pub fn read_line(&mut self) -> Result<String> {
        let started = Instant::now();
        let deadline = self.read_timeout.map(|timeout| started + timeout);

        loop {
            if let Some(line) = self.buffer.next_line()? {
                tracing::trace!("Received line from {}: {}", self.peer_addr, line);
                return Ok(line);
            }

            self.check_cancelled()?;
            let slice = self.next_slice(started, deadline)?;
            self.transport.set_read_timeout(Some(slice))?;

            match self.buffer.fill_from(&mut self.transport) {
                Ok(0) => {
                    tracing::debug!("Peer {} closed the stream", self.peer_addr);
                    return Err(BoardError::ConnectionClosed(format!(
                        "peer closed the stream with {} bytes of a partial line buffered",
                        self.buffer.pending()
                    )));
                }
                Ok(n) => {
                    tracing::trace!("Read {} bytes from {}", n, self.peer_addr);
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
                    ) => {}
                Err(e) => return Err(BoardError::from_stream(e, started.elapsed())),
            }
        }
    }

    /// Write one command completely
    ///
    /// Partial writes are resumed from the first unwritten byte. Like reads,
    /// each blocking write lasts at most `poll_interval`, so a full send
    /// buffer cannot hide cancellation or the `write_timeout` deadline. The
    /// command is validated before anything is written.
    pub fn send(&mut self, command: &Command) -> Result<()> {
        let bytes = encode_command(command)?;
        let started = Instant::now();
        let deadline = self.write_timeout.map(|timeout| started + timeout);
        let mut written = 0;

        while written < bytes.len() {
            self.check_cancelled()?;
            let slice = self.next_slice(started, deadline)?;
            self.transport.set_write_timeout(Some(slice))?;

            match self.transport.write(&bytes[written..]) {
                Ok(0) => {
                    return Err(BoardError::ConnectionClosed(
                        "peer stopped accepting bytes".to_string(),
                    ))
                }
                Ok(n) => written += n,
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
                    ) => {}
                Err(e) => return Err(BoardError::from_stream(e, started.elapsed())),
            }
        }

        self.transport
            .flush()
            .map_err(|e| BoardError::from_stream(e, started.elapsed()))?;
        tracing::trace!("Sent to {}: {}", self.peer_addr, command);
        Ok(())
    }

    /// Shut the transport down
    pub fn close(&mut self) -> Result<()> {
        self.buffer.clear();
        self.transport.shutdown()?;
        Ok(())
    }

    /// Bytes received but not yet consumed by a query
    pub fn pending(&self) -> usize {
        self.buffer.pending()
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Borrow the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Longest single blocking call before `deadline`, never zero
    fn next_slice(&self, started: Instant, deadline: Option<Instant>) -> Result<Duration> {
        let slice = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return Err(BoardError::Timeout(started.elapsed()));
                }
                (deadline - now).min(self.poll_interval)
            }
            None => self.poll_interval,
        };
        Ok(slice.max(Duration::from_millis(1)))
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            tracing::debug!("I/O with {} cancelled", self.peer_addr);
            return Err(BoardError::ConnectionClosed("cancelled by caller".to_string()));
        }
        Ok(())
    }
}
