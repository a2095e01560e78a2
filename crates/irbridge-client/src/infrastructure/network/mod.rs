//! Network infrastructure: the TCP connection to the IR daemon.
//!
//! Architecture:
//! - [`EventTransport`] opens one byte stream to the daemon.  [`TcpTransport`]
//!   is the production implementation; tests substitute a mock.
//! - [`ConnectionManager`] drives connect → read → reconnect, frames the byte
//!   stream into lines and forwards each line to the engine channel.

pub mod connection_manager;
pub mod transport;

pub use connection_manager::{ConnectionError, ConnectionManager, ConnectionState, ConnectionStats};
pub use transport::{EventTransport, LineStream, TcpTransport};
