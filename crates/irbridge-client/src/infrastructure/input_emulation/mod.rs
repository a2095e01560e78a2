//! Platform-specific key injection implementations.
//!
//! The correct implementation is selected at compile time via `#[cfg(target_os = ...)]`.

use std::sync::Arc;
use std::time::Duration;

use crate::application::emulate_input::{EmulationError, InputInjector};

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "linux")]
pub mod linux;

/// Pause after every injected event.  Some applications drop a key-up that
/// arrives in the same input batch as its key-down.
pub const INTER_EVENT_DELAY: Duration = Duration::from_millis(1);

/// Returns the native injector for the build target.
///
/// # Errors
///
/// Returns [`EmulationError::Platform`] if the OS input facility cannot be
/// opened (for example no X display), or on targets without an injector.
pub fn native_injector() -> Result<Arc<dyn InputInjector>, EmulationError> {
    #[cfg(target_os = "windows")]
    return Ok(Arc::new(windows::SendInputInjector::new()));

    #[cfg(target_os = "linux")]
    return Ok(Arc::new(linux::XTestInjector::new()?));

    #[cfg(not(any(target_os = "windows", target_os = "linux")))]
    return Err(EmulationError::Platform(
        "key injection is not supported on this platform; use --dry-run".to_string(),
    ));
}
