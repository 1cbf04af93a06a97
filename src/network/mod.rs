//! Network Module
//!
//! Transport, connection and cancellation plumbing under the client.
//!
//! ## Architecture
//! - One blocking TCP stream per client
//! - Reads are sliced by a poll interval so cancellation is observed
//! - No internal threads or locking

mod cancel;
mod connection;
mod transport;

pub use cancel::CancelToken;
pub use connection::Connection;
pub use transport::{connect_tcp, Transport};
