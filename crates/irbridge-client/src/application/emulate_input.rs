//! EmulateInputUseCase: turns key bindings into ordered OS key events.
//!
//! This use case sits at the application layer and delegates to an
//! [`InputInjector`] trait object for OS-level event injection.
//! The platform-specific implementations are in the infrastructure layer.
//!
//! # Modifier ordering
//!
//! A binding such as `Ctrl+Alt+F5` is four OS events.  The order matters: if
//! the OS ever sees F5 go down while Ctrl is not yet down, the focused
//! application receives a bare F5.  So:
//!
//! ```text
//! key-down:  Shift↓ Ctrl↓ Alt↓ F5↓
//! key-up:    F5↑ Shift↑ Ctrl↑ Alt↑
//! ```
//!
//! A failed event must never leave a modifier held in the OS: `key_down`
//! lifts the modifiers it already pressed, and `key_up` attempts every
//! release before reporting the first error.

use std::sync::Arc;

use irbridge_core::{KeyBinding, KeyCode, KeyMappingTable, Transition};
use thiserror::Error;
use tracing::{trace, warn};

/// Error type for input emulation operations.
#[derive(Debug, Error)]
pub enum EmulationError {
    #[error("platform error: {0}")]
    Platform(String),
    #[error("key code {0} has no equivalent on this platform")]
    UnsupportedKey(KeyCode),
}

/// Direction of a single injected key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDirection {
    Down,
    Up,
}

/// Platform-agnostic key injection primitive.
///
/// Implementations inject exactly one key event per call and are responsible
/// for any pacing the OS needs between consecutive events.
pub trait InputInjector: Send + Sync {
    /// Injects one key-down or key-up for `key`.
    fn send_key(&self, key: KeyCode, direction: KeyDirection) -> Result<(), EmulationError>;

    /// `false` if `key` can never be injected on this platform.
    fn supports(&self, _key: KeyCode) -> bool {
        true
    }
}

/// The Emulate Input use case.
///
/// Receives bindings and state-machine transitions and drives the injector
/// in the modifier-safe order.
pub struct EmulateInputUseCase {
    injector: Arc<dyn InputInjector>,
}

impl EmulateInputUseCase {
    /// Creates a new use case with the given platform injector.
    pub fn new(injector: Arc<dyn InputInjector>) -> Self {
        Self { injector }
    }

    /// Presses `binding`: modifiers first (shift, ctrl, alt), then the base key.
    ///
    /// # Errors
    ///
    /// Returns the first [`EmulationError`].  Modifiers already pressed are
    /// released again, in reverse order, before returning.
    pub fn key_down(&self, binding: &KeyBinding) -> Result<(), EmulationError> {
        trace!("key down {binding}");
        let mut pressed = Vec::with_capacity(3);
        for modifier in binding.modifiers() {
            if let Err(e) = self.injector.send_key(modifier, KeyDirection::Down) {
                self.lift(&pressed);
                return Err(e);
            }
            pressed.push(modifier);
        }
        if let Err(e) = self.injector.send_key(binding.key, KeyDirection::Down) {
            self.lift(&pressed);
            return Err(e);
        }
        Ok(())
    }

    /// Releases `binding`: base key first, then modifiers (shift, ctrl, alt).
    ///
    /// # Errors
    ///
    /// Every key-up is attempted; the first [`EmulationError`] is returned.
    pub fn key_up(&self, binding: &KeyBinding) -> Result<(), EmulationError> {
        trace!("key up {binding}");
        let mut first_error = None;
        for key in std::iter::once(binding.key).chain(binding.modifiers()) {
            if let Err(e) = self.injector.send_key(key, KeyDirection::Up) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Rolls back a partial key-down.
    fn lift(&self, pressed: &[KeyCode]) {
        for &modifier in pressed.iter().rev() {
            if let Err(e) = self.injector.send_key(modifier, KeyDirection::Up) {
                warn!("could not release modifier {modifier}: {e}");
            }
        }
    }

    /// `true` if the injector can produce the base key and every modifier.
    pub fn supports(&self, binding: &KeyBinding) -> bool {
        std::iter::once(binding.key)
            .chain(binding.modifiers())
            .all(|key| self.injector.supports(key))
    }

    /// Drops bindings the injector can never produce, with a warning each.
    pub fn retain_supported(&self, table: &KeyMappingTable) -> KeyMappingTable {
        table
            .iter()
            .filter(|(button, binding)| {
                let ok = self.supports(binding);
                if !ok {
                    warn!("button {button:?}: {binding} cannot be injected here; skipped");
                }
                ok
            })
            .map(|(button, binding)| (button.to_string(), *binding))
            .collect()
    }

    /// Performs whatever key events `transition` calls for.
    ///
    /// # Errors
    ///
    /// Returns [`EmulationError`] if the OS event injection fails.
    pub fn apply(&self, transition: &Transition) -> Result<(), EmulationError> {
        match transition {
            Transition::Press { release, press } => {
                if let Some(previous) = release {
                    self.key_up(previous)?;
                }
                self.key_down(press)
            }
            Transition::Repeat(binding) => self.key_down(binding),
            Transition::Release(binding) => self.key_up(binding),
            Transition::Debounced | Transition::Unmapped | Transition::Ignored => Ok(()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use KeyDirection::{Down, Up};

    // ── Recording injector ────────────────────────────────────────────────────

    #[derive(Default)]
    struct RecordingInjector {
        events: Mutex<Vec<(KeyCode, KeyDirection)>>,
        fail_on: Option<KeyCode>,
    }

    impl InputInjector for RecordingInjector {
        fn send_key(&self, key: KeyCode, direction: KeyDirection) -> Result<(), EmulationError> {
            if self.fail_on == Some(key) {
                return Err(EmulationError::Platform("injected failure".to_string()));
            }
            self.events.lock().unwrap().push((key, direction));
            Ok(())
        }

        fn supports(&self, key: KeyCode) -> bool {
            self.fail_on != Some(key)
        }
    }

    fn make_use_case() -> (EmulateInputUseCase, Arc<RecordingInjector>) {
        let injector = Arc::new(RecordingInjector::default());
        let uc = EmulateInputUseCase::new(Arc::clone(&injector) as Arc<dyn InputInjector>);
        (uc, injector)
    }

    const F5: KeyCode = KeyCode(0x74);

    fn all_mods() -> KeyBinding {
        KeyBinding {
            key: F5,
            with_shift: true,
            with_ctrl: true,
            with_alt: true,
        }
    }

    // ── Ordering ──────────────────────────────────────────────────────────────

    #[test]
    fn test_key_down_asserts_modifiers_before_base_key() {
        // Arrange
        let (uc, inj) = make_use_case();

        // Act
        uc.key_down(&all_mods()).unwrap();

        // Assert
        assert_eq!(
            *inj.events.lock().unwrap(),
            vec![
                (KeyCode::SHIFT, Down),
                (KeyCode::CONTROL, Down),
                (KeyCode::ALT, Down),
                (F5, Down),
            ]
        );
    }

    #[test]
    fn test_key_up_releases_base_key_before_modifiers() {
        let (uc, inj) = make_use_case();

        uc.key_up(&all_mods()).unwrap();

        assert_eq!(
            *inj.events.lock().unwrap(),
            vec![
                (F5, Up),
                (KeyCode::SHIFT, Up),
                (KeyCode::CONTROL, Up),
                (KeyCode::ALT, Up),
            ]
        );
    }

    #[test]
    fn test_plain_binding_sends_single_event() {
        let (uc, inj) = make_use_case();
        uc.key_down(&KeyBinding::plain(F5)).unwrap();
        assert_eq!(*inj.events.lock().unwrap(), vec![(F5, Down)]);
    }

    // ── Transitions ───────────────────────────────────────────────────────────

    #[test]
    fn test_apply_press_with_release_emits_up_then_down() {
        let (uc, inj) = make_use_case();
        let a = KeyBinding::plain(KeyCode(0x41));
        let b = KeyBinding::plain(KeyCode(0x42));

        uc.apply(&Transition::Press {
            release: Some(a),
            press: b,
        })
        .unwrap();

        assert_eq!(
            *inj.events.lock().unwrap(),
            vec![(KeyCode(0x41), Up), (KeyCode(0x42), Down)]
        );
    }

    #[test]
    fn test_apply_repeat_emits_down_only() {
        let (uc, inj) = make_use_case();
        uc.apply(&Transition::Repeat(KeyBinding::plain(F5))).unwrap();
        assert_eq!(*inj.events.lock().unwrap(), vec![(F5, Down)]);
    }

    #[test]
    fn test_apply_non_injecting_transitions_emit_nothing() {
        let (uc, inj) = make_use_case();
        for t in [Transition::Debounced, Transition::Unmapped, Transition::Ignored] {
            uc.apply(&t).unwrap();
        }
        assert!(inj.events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_failed_modifier_lifts_modifiers_already_pressed() {
        // Arrange – Ctrl fails, so Shift must come back up and Alt/F5 never go down
        let injector = Arc::new(RecordingInjector {
            fail_on: Some(KeyCode::CONTROL),
            ..Default::default()
        });
        let uc = EmulateInputUseCase::new(Arc::clone(&injector) as Arc<dyn InputInjector>);

        // Act
        let result = uc.key_down(&all_mods());

        // Assert
        assert!(matches!(result, Err(EmulationError::Platform(_))));
        assert_eq!(
            *injector.events.lock().unwrap(),
            vec![(KeyCode::SHIFT, Down), (KeyCode::SHIFT, Up)]
        );
    }

    #[test]
    fn test_rejected_base_key_never_leaves_modifier_held() {
        // Arrange – Ctrl+0x07 where the injector rejects 0x07
        let bell = KeyCode(0x07);
        let injector = Arc::new(RecordingInjector {
            fail_on: Some(bell),
            ..Default::default()
        });
        let uc = EmulateInputUseCase::new(Arc::clone(&injector) as Arc<dyn InputInjector>);
        let binding = KeyBinding {
            key: bell,
            with_shift: false,
            with_ctrl: true,
            with_alt: false,
        };

        // Act
        let pressed = uc.apply(&Transition::Press {
            release: None,
            press: binding,
        });
        let released = uc.apply(&Transition::Release(binding));

        // Assert – every Ctrl down is matched by a Ctrl up
        assert!(pressed.is_err());
        assert!(released.is_err());
        let events = injector.events.lock().unwrap();
        let downs = events.iter().filter(|e| **e == (KeyCode::CONTROL, Down)).count();
        let ups = events.iter().filter(|e| **e == (KeyCode::CONTROL, Up)).count();
        assert_eq!(downs, 1);
        assert!(ups >= downs);
        assert_eq!(events.last(), Some(&(KeyCode::CONTROL, Up)));
    }

    #[test]
    fn test_key_up_attempts_every_release_after_failure() {
        let injector = Arc::new(RecordingInjector {
            fail_on: Some(F5),
            ..Default::default()
        });
        let uc = EmulateInputUseCase::new(Arc::clone(&injector) as Arc<dyn InputInjector>);

        let result = uc.key_up(&all_mods());

        assert!(result.is_err());
        assert_eq!(
            *injector.events.lock().unwrap(),
            vec![
                (KeyCode::SHIFT, Up),
                (KeyCode::CONTROL, Up),
                (KeyCode::ALT, Up),
            ]
        );
    }

    // ── Startup filtering ─────────────────────────────────────────────────────

    #[test]
    fn test_retain_supported_drops_bindings_with_unsupported_keys() {
        // Arrange
        let injector = Arc::new(RecordingInjector {
            fail_on: Some(KeyCode(0x07)),
            ..Default::default()
        });
        let uc = EmulateInputUseCase::new(Arc::clone(&injector) as Arc<dyn InputInjector>);
        let table: KeyMappingTable = [
            ("BELL".to_string(), KeyBinding::plain(KeyCode(0x07))),
            ("INFO".to_string(), all_mods()),
        ]
        .into_iter()
        .collect();

        // Act
        let kept = uc.retain_supported(&table);

        // Assert
        assert!(!kept.contains("BELL"));
        assert_eq!(kept.get("INFO"), Some(&all_mods()));
        assert_eq!(kept.len(), 1);
    }
}
