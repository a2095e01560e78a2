//! Runtime configuration.
//!
//! [`RuntimeConfig`] is the single source of truth for all runtime settings.
//! The storage layer builds it from `config.json`; tests build it directly.
//! Nothing in the engine reads environment variables or files.

use std::time::Duration;

/// Default daemon port (WinLIRC and `lircd --listen` both use 8765).
pub const DEFAULT_PORT: u16 = 8765;

/// All runtime settings of the bridge.  Read-only after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Host name or IP of the IR daemon.
    pub host: String,
    /// TCP port of the IR daemon.
    pub port: u16,
    /// Consecutive failed connection attempts before giving up; `0` = never.
    pub reconnect_max_attempts: u32,
    /// Pause between failed connection attempts.
    pub reconnect_interval: Duration,
    /// Silence after which a held key is released.
    pub key_timeout: Duration,
    /// Lowest repeat counter treated as a held-key continuation.
    pub repeat_delay_threshold: u32,
    /// Period of the idle-timeout check.
    pub tick_interval: Duration,
}

impl RuntimeConfig {
    /// `host:port` for logging and for `TcpStream::connect`.
    ///
    /// IPv6 literals are bracketed (`[::1]:8765`).
    pub fn endpoint(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for RuntimeConfig {
    /// | Field                   | Default       |
    /// |-------------------------|---------------|
    /// | host                    | `127.0.0.1`   |
    /// | port                    | `8765`        |
    /// | reconnect_max_attempts  | `0` (forever) |
    /// | reconnect_interval      | 1 ms          |
    /// | key_timeout             | 150 ms        |
    /// | repeat_delay_threshold  | 3             |
    /// | tick_interval           | 5 ms          |
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            reconnect_max_attempts: 0,
            reconnect_interval: Duration::from_millis(1),
            key_timeout: Duration::from_millis(150),
            repeat_delay_threshold: 3,
            tick_interval: Duration::from_millis(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port_is_8765() {
        assert_eq!(RuntimeConfig::default().port, 8765);
    }

    #[test]
    fn test_default_retries_forever() {
        assert_eq!(RuntimeConfig::default().reconnect_max_attempts, 0);
    }

    #[test]
    fn test_default_timings() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.reconnect_interval, Duration::from_millis(1));
        assert_eq!(cfg.key_timeout, Duration::from_millis(150));
        assert_eq!(cfg.repeat_delay_threshold, 3);
        assert!(cfg.tick_interval < Duration::from_millis(10));
    }

    #[test]
    fn test_endpoint_joins_host_and_port() {
        let cfg = RuntimeConfig {
            host: "htpc.local".to_string(),
            port: 9000,
            ..Default::default()
        };
        assert_eq!(cfg.endpoint(), "htpc.local:9000");
    }

    #[test]
    fn test_endpoint_brackets_ipv6_host() {
        let cfg = RuntimeConfig {
            host: "::1".to_string(),
            ..Default::default()
        };
        assert_eq!(cfg.endpoint(), "[::1]:8765");
        assert!(cfg.endpoint().parse::<std::net::SocketAddr>().is_ok());
    }

    #[test]
    fn test_endpoint_keeps_already_bracketed_host() {
        let cfg = RuntimeConfig {
            host: "[fe80::1]".to_string(),
            port: 9000,
            ..Default::default()
        };
        assert_eq!(cfg.endpoint(), "[fe80::1]:9000");
    }
}
