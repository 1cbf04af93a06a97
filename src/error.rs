//! Error types for boardwire
//!
//! Provides a unified error type for all client operations.

use std::io::ErrorKind;
use std::time::Duration;

use thiserror::Error;

/// Result type alias using BoardError
pub type Result<T> = std::result::Result<T, BoardError>;

/// Unified error type for boardwire operations
#[derive(Debug, Error)]
pub enum BoardError {
    // -------------------------------------------------------------------------
    // Connection Lifecycle Errors
    // -------------------------------------------------------------------------
    /// Connect failed (refused, timed out, or the host did not resolve)
    #[error("Connection to {addr} failed: {reason}")]
    Connection { addr: String, reason: String },

    /// Operation attempted without a bound connection
    #[error("Not connected")]
    NotConnected,

    /// Peer closed the stream, or the caller cancelled mid-read/write
    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    /// Deadline exceeded while waiting on the stream
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    /// Received bytes do not match the status line grammar
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Caller supplied arguments that cannot be sent
    #[error("Validation error: {0}")]
    Validation(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BoardError {
    /// Classify a stream I/O error.
    ///
    /// `timeout` is reported back in the `Timeout` variant when the error kind
    /// is a would-block/timed-out read or write.
    pub fn from_stream(err: std::io::Error, timeout: Duration) -> Self {
        match err.kind() {
            ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::WriteZero => BoardError::ConnectionClosed(err.to_string()),
            ErrorKind::WouldBlock | ErrorKind::TimedOut => BoardError::Timeout(timeout),
            _ => BoardError::Io(err),
        }
    }

    /// Whether the connection is unusable after this error.
    ///
    /// Protocol and validation errors leave the stream in sync (a whole line
    /// was consumed, or nothing was written). Everything else may have left a
    /// partial line or write behind.
    pub fn breaks_connection(&self) -> bool {
        matches!(
            self,
            BoardError::ConnectionClosed(_) | BoardError::Timeout(_) | BoardError::Io(_)
        )
    }
}
