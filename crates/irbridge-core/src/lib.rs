//! # irbridge-core
//!
//! Shared library for the IR-remote keyboard bridge containing the WinLIRC
//! line protocol parser, key binding types, the virtual-key name table, and
//! the press state machine.
//!
//! This crate has zero dependencies on OS APIs or network sockets.  Everything
//! that touches the outside world (TCP, `SendInput`, XTest, config files) lives
//! in `irbridge-client`.
//!
//! # Architecture overview (for beginners)
//!
//! An infrared receiver daemon (WinLIRC or `lircd`) decodes the IR pulses of a
//! TV remote and broadcasts one text line per received code:
//!
//! ```text
//! 0000000000f40bf0 00 VOL_UP samsung
//! 0000000000f40bf0 01 VOL_UP samsung
//! ```
//!
//! The bridge turns those lines into synthesized keyboard input:
//!
//! - **`protocol`** – Splits the TCP byte stream into lines and parses each
//!   line into a [`RemoteEvent`] (button name + repeat counter).
//!
//! - **`keymap`** – The [`KeyMappingTable`] that maps button names to
//!   [`KeyBinding`]s (a virtual key plus shift/ctrl/alt flags), and the table of
//!   Windows virtual-key names used by the keymap file.
//!
//! - **`domain`** – The [`PressStateMachine`]: decides when to press, release,
//!   or re-assert a key.  The protocol has no "release" message, so the state
//!   machine also implements the idle timeout.

pub mod domain;
pub mod keymap;
pub mod protocol;

pub use domain::press::{PressState, PressStateMachine, Transition};
pub use keymap::{KeyBinding, KeyCode, KeyMappingTable};
pub use protocol::framing::{FramingError, LineBuffer};
pub use protocol::line::{parse_line, ParseError, RemoteEvent};
