//! Application layer use cases for the bridge.
//!
//! # What lives here?
//!
//! - **`emulate_input`** – Turns [`irbridge_core::Transition`]s into ordered
//!   key-down / key-up events.  The actual OS call is made by an
//!   `InputInjector` implementation that is injected at construction time.
//!
//! - **`engine`** – The single task that owns the press state.  Received lines
//!   and idle ticks arrive on one channel and are applied in order.
//!
//! - **`shutdown`** – The process-wide stop flag every loop observes.

pub mod emulate_input;
pub mod engine;
pub mod shutdown;
