//! Connect / read / reconnect loop for the daemon connection.
//!
//! ```text
//! Disconnected ──► Connecting ──ok──► Connected ──EOF / I/O error──► Disconnected
//!                      │
//!                      └─fail─► wait reconnect_interval ─► Connecting
//! ```
//!
//! The attempt counter resets on every successful connect, so
//! `reconnect_max_attempts` bounds *consecutive* failures.  A dropped
//! connection never touches the press state: a key held when the link drops
//! stays held until the idle timeout or the next press releases it.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use irbridge_core::{FramingError, LineBuffer};
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use super::transport::{EventTransport, LineStream};
use crate::application::engine::EngineMessage;
use crate::application::shutdown::Shutdown;
use crate::domain::RuntimeConfig;

/// Size of the per-read receive buffer.
const RECV_BUF_SIZE: usize = 4096;

/// Errors that end the connection loop.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The endpoint can never be reached (e.g. malformed address).
    #[error("connection I/O error: {0}")]
    Io(#[from] io::Error),
    /// `reconnect_max_attempts` consecutive attempts failed.
    #[error("gave up after {attempts} failed connection attempts")]
    ReconnectExhausted { attempts: u32 },
}

/// Where the connection loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Counters returned when the loop ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionStats {
    /// Successful connects.
    pub connects: u64,
    /// Failed connect attempts.
    pub failed_attempts: u64,
    /// Lines forwarded to the engine.
    pub lines: u64,
    /// Bytes dropped by the framer because a line had no terminator.
    pub bytes_dropped: u64,
}

enum ReadOutcome {
    /// The peer closed or the link failed; reconnect.
    Disconnected,
    /// Shutdown was requested or the engine went away.
    Stopped,
}

/// Keeps a line-oriented connection to the daemon alive.
pub struct ConnectionManager {
    transport: Arc<dyn EventTransport>,
    max_attempts: u32,
    retry_interval: Duration,
    state: watch::Sender<ConnectionState>,
}

impl ConnectionManager {
    pub fn new(transport: Arc<dyn EventTransport>, config: &RuntimeConfig) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            transport,
            max_attempts: config.reconnect_max_attempts,
            retry_interval: config.reconnect_interval,
            state,
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    fn set_state(&self, next: ConnectionState) {
        let prev = self.state.send_replace(next);
        if prev != next {
            debug!("connection state {prev:?} → {next:?}");
        }
    }

    /// Runs until shutdown, until the engine channel closes, or until the
    /// retry policy gives up.
    ///
    /// # Errors
    ///
    /// - [`ConnectionError::ReconnectExhausted`] once `reconnect_max_attempts`
    ///   consecutive attempts failed (never when it is `0`).
    /// - [`ConnectionError::Io`] for connect errors that retrying cannot fix.
    pub async fn run(
        &self,
        tx: mpsc::Sender<EngineMessage>,
        shutdown: Shutdown,
    ) -> Result<ConnectionStats, ConnectionError> {
        let endpoint = self.transport.endpoint();
        let mut stats = ConnectionStats::default();
        let mut attempts: u32 = 0;

        while !shutdown.is_triggered() {
            self.set_state(ConnectionState::Connecting);
            let connected = tokio::select! {
                result = self.transport.connect() => result,
                _ = shutdown.wait() => break,
            };

            match connected {
                Ok(stream) => {
                    attempts = 0;
                    stats.connects += 1;
                    self.set_state(ConnectionState::Connected);
                    info!("connected to {endpoint}");

                    match self.read_lines(stream, &tx, &shutdown, &mut stats).await {
                        ReadOutcome::Disconnected => {
                            self.set_state(ConnectionState::Disconnected);
                            info!("connection to {endpoint} lost; reconnecting");
                        }
                        ReadOutcome::Stopped => break,
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::InvalidInput => {
                    self.set_state(ConnectionState::Disconnected);
                    error!("cannot connect to {endpoint}: {e}");
                    return Err(ConnectionError::Io(e));
                }
                Err(e) => {
                    attempts += 1;
                    stats.failed_attempts += 1;
                    self.set_state(ConnectionState::Disconnected);
                    warn!("connection attempt {attempts} to {endpoint} failed: {e}");

                    if self.max_attempts > 0 && attempts >= self.max_attempts {
                        error!("giving up on {endpoint} after {attempts} attempts");
                        return Err(ConnectionError::ReconnectExhausted { attempts });
                    }

                    tokio::select! {
                        _ = tokio::time::sleep(self.retry_interval) => {}
                        _ = shutdown.wait() => break,
                    }
                }
            }
        }

        self.set_state(ConnectionState::Disconnected);
        info!(
            "connection loop stopped ({} connects, {} lines)",
            stats.connects, stats.lines
        );
        Ok(stats)
    }

    /// Reads from one established stream until it ends.
    async fn read_lines(
        &self,
        mut stream: Box<dyn LineStream>,
        tx: &mpsc::Sender<EngineMessage>,
        shutdown: &Shutdown,
        stats: &mut ConnectionStats,
    ) -> ReadOutcome {
        let mut framer = LineBuffer::new();
        let mut recv_buf = vec![0u8; RECV_BUF_SIZE];

        loop {
            if shutdown.is_triggered() {
                return ReadOutcome::Stopped;
            }

            let read = tokio::select! {
                result = stream.read(&mut recv_buf) => result,
                _ = shutdown.wait() => return ReadOutcome::Stopped,
            };

            let n = match read {
                Ok(0) => return ReadOutcome::Disconnected,
                Ok(n) => n,
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                    ) =>
                {
                    continue
                }
                Err(e) => {
                    warn!("read error: {e}");
                    return ReadOutcome::Disconnected;
                }
            };

            let received_at = Instant::now();
            match framer.extend(&recv_buf[..n]) {
                Ok(()) => {}
                Err(FramingError::LineTooLong { max, dropped }) => {
                    warn!("line longer than {max} bytes; dropped {dropped} bytes");
                    stats.bytes_dropped += dropped as u64;
                }
            }

            while let Some(text) = framer.next_line() {
                stats.lines += 1;
                let message = EngineMessage::Line { text, received_at };
                if tx.send(message).await.is_err() {
                    debug!("engine channel closed; stopping reader");
                    return ReadOutcome::Stopped;
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::network::transport::MockEventTransport;
    use mockall::Sequence;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn refused() -> io::Error {
        io::Error::from(io::ErrorKind::ConnectionRefused)
    }

    fn config(max_attempts: u32) -> RuntimeConfig {
        RuntimeConfig {
            reconnect_max_attempts: max_attempts,
            reconnect_interval: Duration::from_millis(1),
            ..Default::default()
        }
    }

    fn mock_transport() -> MockEventTransport {
        let mut mock = MockEventTransport::new();
        mock.expect_endpoint()
            .return_const("mock-lircd:8765".to_string());
        mock
    }

    fn lines(rx: &mut mpsc::Receiver<EngineMessage>) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            if let EngineMessage::Line { text, .. } = msg {
                out.push(text);
            }
        }
        out
    }

    #[tokio::test]
    async fn test_max_three_attempts_connects_exactly_three_times() {
        // Arrange
        let mut mock = mock_transport();
        mock.expect_connect().times(3).returning(|| Err(refused()));
        let manager = ConnectionManager::new(Arc::new(mock), &config(3));
        let (tx, _rx) = mpsc::channel(8);

        // Act
        let result = manager.run(tx, Shutdown::new()).await;

        // Assert – the mock panics on drop if connect ran more or fewer times
        assert!(matches!(
            result,
            Err(ConnectionError::ReconnectExhausted { attempts: 3 })
        ));
        assert_eq!(manager.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_zero_max_attempts_keeps_trying_until_shutdown() {
        // Arrange
        let shutdown = Shutdown::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut mock = mock_transport();
        {
            let calls = Arc::clone(&calls);
            let shutdown = shutdown.clone();
            mock.expect_connect().returning(move || {
                if calls.fetch_add(1, Ordering::SeqCst) + 1 >= 25 {
                    shutdown.trigger();
                }
                Err(refused())
            });
        }
        let manager = ConnectionManager::new(Arc::new(mock), &config(0));
        let (tx, _rx) = mpsc::channel(8);

        // Act
        let stats = manager.run(tx, shutdown).await.unwrap();

        // Assert
        assert_eq!(calls.load(Ordering::SeqCst), 25);
        assert_eq!(stats.failed_attempts, 25);
    }

    #[tokio::test]
    async fn test_line_split_across_reads_is_delivered_whole() {
        // Arrange – one connection delivering a line in two pieces, then EOF;
        // the reconnect fails and the policy (max 1) ends the loop.
        let stream = tokio_test::io::Builder::new()
            .read(b"0000000000000001 00 PL")
            .read(b"AY remote\n0000000000000001 01 PLAY remote\n")
            .build();
        let mut seq = Sequence::new();
        let mut mock = mock_transport();
        mock.expect_connect()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(move || Ok(Box::new(stream) as Box<dyn LineStream>));
        mock.expect_connect()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(refused()));
        let manager = ConnectionManager::new(Arc::new(mock), &config(1));
        let (tx, mut rx) = mpsc::channel(8);

        // Act
        let result = manager.run(tx, Shutdown::new()).await;

        // Assert
        assert!(matches!(
            result,
            Err(ConnectionError::ReconnectExhausted { attempts: 1 })
        ));
        assert_eq!(
            lines(&mut rx),
            vec![
                "0000000000000001 00 PLAY remote".to_string(),
                "0000000000000001 01 PLAY remote".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_successful_connect_resets_attempt_counter() {
        // Arrange – fail, fail, succeed (EOF), fail, fail, fail with max 3:
        // the first two failures must not count towards the final three.
        let mut seq = Sequence::new();
        let mut mock = mock_transport();
        mock.expect_connect()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|| Err(refused()));
        mock.expect_connect()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|| {
                Ok(Box::new(tokio_test::io::Builder::new().build()) as Box<dyn LineStream>)
            });
        mock.expect_connect()
            .times(3)
            .in_sequence(&mut seq)
            .returning(|| Err(refused()));
        let manager = ConnectionManager::new(Arc::new(mock), &config(3));
        let (tx, _rx) = mpsc::channel(8);

        // Act
        let result = manager.run(tx, Shutdown::new()).await;

        // Assert
        assert!(matches!(
            result,
            Err(ConnectionError::ReconnectExhausted { attempts: 3 })
        ));
    }

    #[tokio::test]
    async fn test_invalid_endpoint_is_fatal_without_retry() {
        let mut mock = mock_transport();
        mock.expect_connect()
            .times(1)
            .returning(|| Err(io::Error::new(io::ErrorKind::InvalidInput, "bad address")));
        let manager = ConnectionManager::new(Arc::new(mock), &config(0));
        let (tx, _rx) = mpsc::channel(8);

        let result = manager.run(tx, Shutdown::new()).await;

        assert!(matches!(result, Err(ConnectionError::Io(_))));
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_long_reconnect_wait() {
        // Arrange – a one-hour retry interval that shutdown must cut short
        let mut mock = mock_transport();
        mock.expect_connect().returning(|| Err(refused()));
        let manager = ConnectionManager::new(
            Arc::new(mock),
            &RuntimeConfig {
                reconnect_interval: Duration::from_secs(3600),
                ..Default::default()
            },
        );
        let shutdown = Shutdown::new();
        let (tx, _rx) = mpsc::channel(8);
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.trigger();
        });

        // Act
        let result =
            tokio::time::timeout(Duration::from_secs(5), manager.run(tx, shutdown)).await;

        // Assert
        let stats = result.expect("run must return promptly").unwrap();
        assert_eq!(stats.failed_attempts, 1);
    }

    #[tokio::test]
    async fn test_closed_engine_channel_stops_reader() {
        let stream = tokio_test::io::Builder::new()
            .read(b"0000000000000001 00 PLAY remote\n")
            .build();
        let mut mock = mock_transport();
        mock.expect_connect()
            .times(1)
            .return_once(move || Ok(Box::new(stream) as Box<dyn LineStream>));
        let manager = ConnectionManager::new(Arc::new(mock), &config(0));
        let (tx, rx) = mpsc::channel(8);
        drop(rx);

        let stats = manager.run(tx, Shutdown::new()).await.unwrap();

        assert_eq!(stats.connects, 1);
    }
}
