//! Transport
//!
//! Byte stream abstraction under a connection, plus TCP connect.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{BoardError, Result};

/// Bidirectional byte stream the client can drive with deadlines
pub trait Transport: Read + Write {
    /// Set the timeout of a single blocking read (`None` blocks forever)
    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()>;

    /// Set the timeout of a single blocking write (`None` blocks forever)
    fn set_write_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()>;

    /// Close both directions of the stream
    fn shutdown(&mut self) -> io::Result<()>;

    /// Peer description for logging
    fn peer_label(&self) -> String {
        "unknown".to_string()
    }
}

impl Transport for TcpStream {
    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        TcpStream::set_read_timeout(self, timeout)
    }

    fn set_write_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        TcpStream::set_write_timeout(self, timeout)
    }

    fn shutdown(&mut self) -> io::Result<()> {
        match TcpStream::shutdown(self, Shutdown::Both) {
            // Peer already went away
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }

    fn peer_label(&self) -> String {
        self.peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }
}

/// Open a TCP stream to `host:port`
///
/// Every resolved address is tried in turn, each bounded by `timeout`.
/// Resolution failure, refusal and timeout all become `BoardError::Connection`.
pub fn connect_tcp(host: &str, port: u16, timeout: Option<Duration>) -> Result<TcpStream> {
    let addr = format!("{host}:{port}");
    let connection_error = |reason: String| BoardError::Connection {
        addr: addr.clone(),
        reason,
    };

    let candidates: Vec<_> = (host, port)
        .to_socket_addrs()
        .map_err(|e| connection_error(format!("could not resolve host: {e}")))?
        .collect();
    if candidates.is_empty() {
        return Err(connection_error("host resolved to no addresses".to_string()));
    }

    let mut last_error = None;
    for candidate in candidates {
        tracing::trace!("Trying {} for {}", candidate, addr);
        let attempt = match timeout {
            Some(timeout) => TcpStream::connect_timeout(&candidate, timeout),
            None => TcpStream::connect(candidate),
        };
        match attempt {
            Ok(stream) => {
                // Disable Nagle's algorithm; commands are tiny and latency bound
                stream
                    .set_nodelay(true)
                    .map_err(|e| connection_error(format!("could not configure socket: {e}")))?;
                return Ok(stream);
            }
            Err(e) => {
                tracing::debug!("Connect to {} failed: {}", candidate, e);
                last_error = Some(e);
            }
        }
    }

    let reason = last_error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "no address accepted the connection".to_string());
    Err(connection_error(reason))
}
