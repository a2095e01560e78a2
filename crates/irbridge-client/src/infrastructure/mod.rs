//! Infrastructure layer for the bridge.
//!
//! Contains OS-facing adapters: key injection APIs, the TCP connection to the
//! IR daemon and the JSON configuration files.
//!
//! **Dependency rule**: this layer may depend on `application`, `domain` and
//! `irbridge_core`, but MUST NOT be imported by the `application` or domain
//! layers.
//!
//! # Sub-modules
//!
//! - **`input_emulation`** – OS-specific implementations of `InputInjector`.
//!   The correct implementation is selected at compile time using
//!   `#[cfg(target_os)]`.  A `MockInputInjector` is also provided for tests
//!   and for `--dry-run`.
//!
//! - **`network`** – TCP connection to the daemon: connects, reads lines and
//!   reconnects when the connection drops.
//!
//! - **`storage`** – Loads `config.json` and `keymap.json`.
//!
//! - **`runner`** – [`run_bridge`], which starts the engine, the idle ticker
//!   and the connection loop and waits for them to finish.

pub mod input_emulation;
pub mod network;
pub mod runner;
pub mod storage;

pub use runner::{run_bridge, BridgeReport};
