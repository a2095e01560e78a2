//! Recording key injector.
//!
//! # Why a mock injector?
//!
//! The real injectors (`SendInputInjector`, `XTestInjector`) make OS API calls
//! that need a desktop session and actually press keys on the machine running
//! the tests.  `MockInputInjector` replaces them with in-memory recording:
//! every event is pushed into a `Mutex<Vec<...>>` so assertions can inspect
//! exactly what was injected and in what order.
//!
//! The binary also uses it for `--dry-run`, where each event is logged at
//! `info` instead of being injected.
//!
//! # `should_fail` flag
//!
//! Construct with [`MockInputInjector::failing`] to make every call return
//! `EmulationError::Platform`.

use std::sync::Mutex;

use irbridge_core::KeyCode;
use tracing::info;

use crate::application::emulate_input::{EmulationError, InputInjector, KeyDirection};

/// An injector that records all calls without performing OS API calls.
#[derive(Default)]
pub struct MockInputInjector {
    /// Every `(key, direction)` pair passed to `send_key`, in order.
    pub events: Mutex<Vec<(KeyCode, KeyDirection)>>,
    /// When `true`, every call returns an `EmulationError::Platform`.
    pub should_fail: bool,
    /// When `true`, every recorded event is also logged at `info`.
    pub log_events: bool,
    /// Keys reported as unsupported by `supports`.
    pub unsupported: Vec<KeyCode>,
}

impl MockInputInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// An injector whose every call fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// An injector that logs instead of injecting.
    pub fn dry_run() -> Self {
        Self {
            log_events: true,
            ..Self::default()
        }
    }

    /// An injector that cannot produce any of `keys`.
    pub fn without_keys(keys: impl IntoIterator<Item = KeyCode>) -> Self {
        Self {
            unsupported: keys.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<(KeyCode, KeyDirection)> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl InputInjector for MockInputInjector {
    fn send_key(&self, key: KeyCode, direction: KeyDirection) -> Result<(), EmulationError> {
        if self.should_fail {
            return Err(EmulationError::Platform("mock failure".into()));
        }
        if self.log_events {
            info!("[dry-run] {key} {direction:?}");
        }
        self.events
            .lock()
            .map_err(|_| EmulationError::Platform("mock event log poisoned".into()))?
            .push((key, direction));
        Ok(())
    }

    fn supports(&self, key: KeyCode) -> bool {
        !self.unsupported.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_events_in_order() {
        let mock = MockInputInjector::new();
        mock.send_key(KeyCode(0x41), KeyDirection::Down).unwrap();
        mock.send_key(KeyCode(0x41), KeyDirection::Up).unwrap();
        assert_eq!(
            mock.events(),
            vec![
                (KeyCode(0x41), KeyDirection::Down),
                (KeyCode(0x41), KeyDirection::Up)
            ]
        );
    }

    #[test]
    fn test_without_keys_reports_only_listed_keys_unsupported() {
        let mock = MockInputInjector::without_keys([KeyCode(0x07)]);
        assert!(!mock.supports(KeyCode(0x07)));
        assert!(mock.supports(KeyCode(0x41)));
    }

    #[test]
    fn test_failing_mock_records_nothing() {
        let mock = MockInputInjector::failing();
        assert!(mock.send_key(KeyCode(0x41), KeyDirection::Down).is_err());
        assert!(mock.events().is_empty());
    }
}
