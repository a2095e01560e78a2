//! Byte-stream transport to the IR daemon.

use std::io;

use async_trait::async_trait;
use tokio::io::AsyncRead;
use tokio::net::TcpStream;
use tracing::debug;

/// Any readable byte stream the connection manager can consume.
pub trait LineStream: AsyncRead + Unpin + Send {}

impl<T: AsyncRead + Unpin + Send> LineStream for T {}

/// Opens connections to the daemon.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventTransport: Send + Sync {
    /// Opens a fresh connection.
    async fn connect(&self) -> io::Result<Box<dyn LineStream>>;

    /// Human-readable peer address for logs.
    fn endpoint(&self) -> String;
}

/// Plain TCP connection to `host:port`.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    endpoint: String,
}

impl TcpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl EventTransport for TcpTransport {
    async fn connect(&self) -> io::Result<Box<dyn LineStream>> {
        let stream = TcpStream::connect(&self.endpoint).await?;
        // Lines are tiny and latency-sensitive.
        stream.set_nodelay(true)?;
        debug!("tcp stream open to {}", self.endpoint);
        Ok(Box::new(stream))
    }

    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }
}
