//! Domain layer: pure press/release logic with no I/O.
//!
//! The [`press`] module holds the only piece of mutable runtime state in the
//! bridge.  It takes timestamps as arguments instead of reading the clock so
//! every rule can be tested deterministically.

pub mod press;

pub use press::{PressState, PressStateMachine, Transition};
