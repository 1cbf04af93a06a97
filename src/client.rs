//! Protocol Client
//!
//! Typed operations over one connection, plus the connection state machine.
//!
//! ## State Machine
//! ```text
//!                 connect()                 disconnect()
//!  Unconnected ─────────────► Connected ──────────────────► Closed
//!                                │  ▲                          ▲
//!              I/O error,        │  │ connect()                │ disconnect()
//!              timeout, cancel   ▼  │                          │
//!                              Broken ─────────────────────────┘
//! ```
//!
//! - Operations in `Unconnected` or `Closed` fail with `NotConnected`
//! - Operations in `Broken` fail with `ConnectionClosed`
//! - `connect()` may rebind from `Broken` or `Closed`
//!
//! The status line is pull-based: each query consumes exactly one line from
//! the receive buffer, whenever the server happens to have sent it.

use std::net::TcpStream;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::config::Config;
use crate::error::{BoardError, Result};
use crate::network::{connect_tcp, CancelToken, Connection, Transport};
use crate::protocol::{Board, Command, StatusLine, StatusTokens};

/// Observable client state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// No connection was ever bound
    Unconnected,
    Connected,
    /// The last I/O failed; the connection was dropped
    Broken,
    /// Closed by `disconnect()`
    Closed,
}

enum State<T: Transport> {
    Unconnected,
    Connected(Connection<T>),
    Broken,
    Closed,
}

/// Client for the board game protocol
///
/// Provides no internal locking; wrap it in a [`SharedClient`] to share it
/// between threads.
pub struct Client<T: Transport = TcpStream> {
    config: Config,
    state: State<T>,
    cancel: CancelToken,
}

impl Client<TcpStream> {
    /// Connect to `host:port` with otherwise default settings
    pub fn connect_to(host: impl Into<String>, port: u16) -> Result<Self> {
        let mut client = Self::new(Config::builder().host(host).port(port).build());
        client.connect()?;
        Ok(client)
    }

    /// Open a TCP connection to the configured endpoint
    ///
    /// Any previous connection is closed first. On failure the client is left
    /// without a connection and the error says why.
    pub fn connect(&mut self) -> Result<()> {
        let addr = self.config.addr();
        self.release();

        let stream = connect_tcp(
            &self.config.host,
            self.config.port,
            self.config.connect_timeout(),
        )?;
        self.bind(stream)?;
        tracing::debug!("Connected to {}", addr);
        Ok(())
    }
}

impl<T: Transport> Client<T> {
    /// Create an unconnected client
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: State::Unconnected,
            cancel: CancelToken::new(),
        }
    }

    /// Create a client over an already open transport
    pub fn from_transport(config: Config, transport: T) -> Result<Self> {
        let mut client = Self::new(config);
        client.bind(transport)?;
        Ok(client)
    }

    /// Bind an open transport, replacing any previous connection
    pub fn attach(&mut self, transport: T) -> Result<()> {
        self.release();
        self.bind(transport)
    }

    fn bind(&mut self, transport: T) -> Result<()> {
        self.cancel.reset();
        let connection = Connection::new(transport, &self.config, self.cancel.clone())?;
        self.state = State::Connected(connection);
        Ok(())
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Send `PUT <x> <y>`
    ///
    /// Negative coordinates fail with `Validation` and write nothing.
    pub fn submit_move(&mut self, x: i64, y: i64) -> Result<()> {
        let command = Command::put(x, y)?;
        self.send(&command)
    }

    /// Send `LOGIN <user> <password>`
    pub fn login(&mut self, user: &str, password: &str) -> Result<()> {
        let command = Command::login(user, password)?;
        self.send(&command)
    }

    /// Send an arbitrary command
    pub fn send(&mut self, command: &Command) -> Result<()> {
        command.validate()?;
        self.with_connection(|conn| conn.send(command))
    }

    // =========================================================================
    // Queries (each consumes one status line)
    // =========================================================================

    /// Read one status line and interpret every field
    pub fn read_status(&mut self) -> Result<StatusLine> {
        self.query(|tokens| tokens.status())
    }

    pub fn query_board(&mut self) -> Result<Board> {
        self.query(|tokens| tokens.board())
    }

    pub fn query_width(&mut self) -> Result<u32> {
        self.query(|tokens| tokens.width())
    }

    pub fn query_height(&mut self) -> Result<u32> {
        self.query(|tokens| tokens.height())
    }

    /// The marker assigned to this client
    pub fn query_identity(&mut self) -> Result<char> {
        self.query(|tokens| tokens.identity())
    }

    /// Read the next raw status line (newline excluded)
    pub fn read_line(&mut self) -> Result<String> {
        self.with_connection(|conn| conn.read_line())
    }

    fn query<R>(&mut self, extract: impl FnOnce(&StatusTokens<'_>) -> Result<R>) -> Result<R> {
        let line = self.read_line()?;
        let tokens = StatusTokens::parse(&line)?;
        extract(&tokens)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Close the connection
    ///
    /// Idempotent: succeeds in every state, including before `connect()`.
    pub fn disconnect(&mut self) -> Result<()> {
        match self.state {
            State::Unconnected | State::Closed => {}
            State::Connected(_) | State::Broken => {
                self.release();
                self.state = State::Closed;
            }
        }
        Ok(())
    }

    /// Token that aborts in-flight I/O
    ///
    /// The same token serves every connection of this client; a successful
    /// (re)connect clears an earlier cancellation.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> ClientState {
        match self.state {
            State::Unconnected => ClientState::Unconnected,
            State::Connected(_) => ClientState::Connected,
            State::Broken => ClientState::Broken,
            State::Closed => ClientState::Closed,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, State::Connected(_))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The live connection, if any
    pub fn connection(&self) -> Option<&Connection<T>> {
        match &self.state {
            State::Connected(conn) => Some(conn),
            _ => None,
        }
    }

    /// Run `op` on the live connection, marking the client broken when the
    /// connection cannot be trusted afterwards
    fn with_connection<R>(
        &mut self,
        op: impl FnOnce(&mut Connection<T>) -> Result<R>,
    ) -> Result<R> {
        let conn = match &mut self.state {
            State::Connected(conn) => conn,
            State::Unconnected | State::Closed => return Err(BoardError::NotConnected),
            State::Broken => {
                return Err(BoardError::ConnectionClosed(
                    "connection is broken; reconnect first".to_string(),
                ))
            }
        };

        let result = op(conn);
        if let Err(e) = &result {
            if e.breaks_connection() {
                tracing::warn!("Connection to {} broken: {}", conn.peer_addr(), e);
                self.release();
                self.state = State::Broken;
            }
        }
        result
    }

    /// Close and drop the current connection, if any
    fn release(&mut self) {
        if let State::Connected(conn) = &mut self.state {
            match conn.close() {
                Ok(()) => tracing::debug!("Disconnected from {}", conn.peer_addr()),
                Err(e) => tracing::debug!("Error while closing {}: {}", conn.peer_addr(), e),
            }
            self.state = State::Closed;
        }
    }
}

impl<T: Transport> Drop for Client<T> {
    fn drop(&mut self) {
        self.release();
    }
}

// =============================================================================
// Shared access
// =============================================================================

/// A client behind one exclusive-access guard
///
/// Clones share the same connection; each call holds the lock for the whole
/// request so commands and status lines never interleave.
pub struct SharedClient<T: Transport = TcpStream> {
    inner: Arc<Mutex<Client<T>>>,
    cancel: CancelToken,
}

impl<T: Transport> Clone for SharedClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            cancel: self.cancel.clone(),
        }
    }
}

impl<T: Transport> SharedClient<T> {
    pub fn new(client: Client<T>) -> Self {
        let cancel = client.cancel_token();
        Self {
            inner: Arc::new(Mutex::new(client)),
            cancel,
        }
    }

    /// Exclusive access for a multi-step exchange
    pub fn lock(&self) -> MutexGuard<'_, Client<T>> {
        self.inner.lock()
    }

    /// Send a move and read the status line that follows it
    pub fn submit_move_and_read(&self, x: i64, y: i64) -> Result<StatusLine> {
        let mut client = self.inner.lock();
        client.submit_move(x, y)?;
        client.read_status()
    }

    pub fn read_status(&self) -> Result<StatusLine> {
        self.inner.lock().read_status()
    }

    /// Token that aborts the in-flight call without taking the lock
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}
