//! Domain types for the client application.
//!
//! - **`config`** – [`RuntimeConfig`], the immutable settings value built once
//!   at startup and handed to every component's constructor.

pub mod config;

pub use config::RuntimeConfig;
