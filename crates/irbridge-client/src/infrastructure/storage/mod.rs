//! JSON configuration files.
//!
//! - **`config`** – `config.json`: daemon address, retry policy and timings.
//! - **`keymap`** – `keymap.json`: button name → key binding.
//!
//! Both loaders fail with [`ConfigError`]; a missing or broken file is fatal
//! at startup.

pub mod config;
pub mod keymap;

pub use config::{load_config, ConfigError, ConfigFile};
pub use keymap::load_keymap;
