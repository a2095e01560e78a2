//! `config.json`: runtime settings.
//!
//! Every key is optional:
//!
//! ```json
//! {
//!   "lirc_host": "127.0.0.1",
//!   "lirc_port": 8765,
//!   "lirc_rc_attempts": 0,
//!   "lirc_rc_inverval": 1,
//!   "key_timeout": 150,
//!   "key_repeat_delay": 3,
//!   "log_level": "info",
//!   "tick_interval_ms": 5
//! }
//! ```
//!
//! All durations are milliseconds.  `lirc_rc_inverval` keeps the historical
//! spelling; `lirc_rc_interval` is accepted as well.
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` take the value of
//! `some_fn()` when the key is absent, so an empty `{}` is a valid config.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::config::DEFAULT_PORT;
use crate::domain::RuntimeConfig;

/// Error type for configuration and keymap files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON or does not match the schema.
    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A keymap entry carries a key code that cannot be interpreted.
    #[error("button {button:?} has invalid key code {value}")]
    InvalidKeyCode { button: String, value: String },
}

// ── Config schema ─────────────────────────────────────────────────────────────

/// On-disk shape of `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default = "default_host")]
    pub lirc_host: String,
    #[serde(default = "default_port")]
    pub lirc_port: u16,
    /// `0` retries forever.
    #[serde(default)]
    pub lirc_rc_attempts: u32,
    #[serde(default = "default_rc_interval", alias = "lirc_rc_interval")]
    pub lirc_rc_inverval: u64,
    #[serde(default = "default_key_timeout")]
    pub key_timeout: u64,
    #[serde(default = "default_key_repeat_delay")]
    pub key_repeat_delay: u32,
    /// `tracing` filter directive: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_rc_interval() -> u64 {
    1
}
fn default_key_timeout() -> u64 {
    150
}
fn default_key_repeat_delay() -> u32 {
    3
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_tick_interval() -> u64 {
    5
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            lirc_host: default_host(),
            lirc_port: default_port(),
            lirc_rc_attempts: 0,
            lirc_rc_inverval: default_rc_interval(),
            key_timeout: default_key_timeout(),
            key_repeat_delay: default_key_repeat_delay(),
            log_level: default_log_level(),
            tick_interval_ms: default_tick_interval(),
        }
    }
}

impl ConfigFile {
    /// Converts file units into the runtime value.
    ///
    /// A zero tick interval would spin the ticker, so it is raised to 1 ms.
    pub fn to_runtime(&self) -> RuntimeConfig {
        RuntimeConfig {
            host: self.lirc_host.clone(),
            port: self.lirc_port,
            reconnect_max_attempts: self.lirc_rc_attempts,
            reconnect_interval: Duration::from_millis(self.lirc_rc_inverval),
            key_timeout: Duration::from_millis(self.key_timeout),
            repeat_delay_threshold: self.key_repeat_delay,
            tick_interval: Duration::from_millis(self.tick_interval_ms.max(1)),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parses `config.json` content.  `origin` is only used in error messages.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the JSON is malformed or a value has the
/// wrong type.
pub fn parse_config(content: &str, origin: &Path) -> Result<ConfigFile, ConfigError> {
    serde_json::from_str(content).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })
}

/// Loads `config.json` from `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read (including when it
/// does not exist) and [`ConfigError::Parse`] if it is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&content, path)?;
    debug!("loaded config from {}: {config:?}", path.display());
    Ok(config)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
