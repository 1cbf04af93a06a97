//! # boardwire
//!
//! Client for the line-based board game protocol with:
//! - Bounded connect, read and write timeouts
//! - Incremental line decoding across arbitrary read chunks
//! - Strict status line validation
//! - An explicit connection state machine and caller-driven cancellation
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Client                               │
//! │    submit_move / login / query_board / query_width / ...     │
//! │        (Unconnected → Connected → Broken / Closed)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Connection                              │
//! │        (deadlines, cancellation, partial write retry)        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Transport  │          │ LineBuffer  │
//!   │ (TcpStream) │          │  (BytesMut) │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │ StatusLine  │
//!                           │   / Board   │
//!                           └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use boardwire::Client;
//!
//! let mut client = Client::connect_to("localhost", 1312)?;
//! let width = client.query_width()?;
//! client.submit_move(0, 0)?;
//! let board = client.query_board()?;
//! println!("{width} columns, {board}");
//! client.disconnect()?;
//! # Ok::<(), boardwire::BoardError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BoardError, Result};
pub use config::Config;
pub use client::{Client, ClientState, SharedClient};
pub use network::CancelToken;
pub use protocol::{Board, Cell, Command, StatusLine};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of boardwire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
