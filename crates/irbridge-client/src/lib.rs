//! irbridge-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does irbridge do?
//!
//! WinLIRC and `lircd --listen` broadcast every decoded infrared button press
//! as a text line over TCP.  irbridge:
//!
//! 1. Connects to that socket and keeps reconnecting when it drops.
//! 2. Parses each line into a button name and a repeat counter.
//! 3. Looks the button up in the keymap and decides, through the press state
//!    machine, whether to press, re-press, debounce or release a key.
//! 4. Injects the resulting key events (`SendInput` on Windows, XTest on
//!    Linux) so the focused application sees ordinary keyboard input.
//! 5. Releases a held key once the remote goes quiet for `key_timeout`.

/// Domain layer: runtime settings.
pub mod domain;

/// Application layer: key emulation, the press engine, shutdown.
pub mod application;

/// Infrastructure layer: OS injectors, network, configuration files.
pub mod infrastructure;
