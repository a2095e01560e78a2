//! Press state machine: turns remote events into key transitions.
//!
//! # Why a state machine? (for beginners)
//!
//! An IR remote never says "button released".  While a button is held the
//! daemon keeps re-sending the same code with an increasing repeat counter;
//! when the user lets go, the lines simply stop.  So the bridge has to:
//!
//! - press the key on a fresh code (`repeat == 0`), releasing whatever key it
//!   was holding first,
//! - re-assert the held key while repeats keep coming (OS auto-repeat),
//! - release the key itself once the lines have been silent for
//!   `key_timeout` ([`PressStateMachine::on_tick`]).
//!
//! At most one key is held at any time.
//!
//! The machine itself never injects anything.  It returns a [`Transition`]
//! describing what the injector must do, which keeps it pure and testable
//! with synthetic timestamps.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::keymap::{KeyBinding, KeyMappingTable};
use crate::protocol::RemoteEvent;

/// The single "currently held" key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PressState {
    /// Button whose binding is authoritative while held.
    pub active_button: Option<String>,
    /// `true` while a key-down has been injected without its key-up.
    pub is_down: bool,
    /// Arrival time of the last event for a mapped button.
    pub last_event: Instant,
}

/// What the injector must do in response to one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Fresh press: release `release` (if any) then press `press`.
    Press {
        release: Option<KeyBinding>,
        press: KeyBinding,
    },
    /// Held-key continuation: re-assert key-down without a key-up.
    Repeat(KeyBinding),
    /// Timeout release.
    Release(KeyBinding),
    /// Repeat inside the debounce window.
    Debounced,
    /// Fresh press of a button with no binding (informational).
    Unmapped,
    /// Nothing to do.
    Ignored,
}

impl Transition {
    /// `true` if the transition injects at least one key event.
    pub fn injects(&self) -> bool {
        matches!(
            self,
            Transition::Press { .. } | Transition::Repeat(_) | Transition::Release(_)
        )
    }
}

/// Owns [`PressState`] and applies the press/repeat/timeout rules.
///
/// Not synchronised: exactly one task owns it and feeds it both events and
/// timeout ticks in arrival order.
#[derive(Debug)]
pub struct PressStateMachine {
    state: PressState,
    active_binding: Option<KeyBinding>,
    key_timeout: Duration,
    repeat_threshold: u32,
}

impl PressStateMachine {
    /// Creates an idle machine.  `now` seeds `last_event`.
    pub fn new(key_timeout: Duration, repeat_threshold: u32, now: Instant) -> Self {
        Self {
            state: PressState {
                active_button: None,
                is_down: false,
                last_event: now,
            },
            active_binding: None,
            key_timeout,
            repeat_threshold,
        }
    }

    /// Read-only view of the current state.
    pub fn state(&self) -> &PressState {
        &self.state
    }

    /// Binding of the active button, if any.
    pub fn active_binding(&self) -> Option<KeyBinding> {
        self.active_binding
    }

    /// Applies one parsed event received at `now`.
    pub fn on_event(
        &mut self,
        event: &RemoteEvent,
        table: &KeyMappingTable,
        now: Instant,
    ) -> Transition {
        let Some(binding) = table.get(&event.button).copied() else {
            return if event.is_fresh_press() {
                Transition::Unmapped
            } else {
                Transition::Ignored
            };
        };

        self.state.last_event = now;

        if event.is_fresh_press() {
            let release = if self.state.is_down {
                self.active_binding
            } else {
                None
            };
            self.state.active_button = Some(event.button.clone());
            self.active_binding = Some(binding);
            self.state.is_down = true;
            return Transition::Press {
                release,
                press: binding,
            };
        }

        if event.repeat < self.repeat_threshold {
            return Transition::Debounced;
        }

        match self.active_binding {
            Some(active) => {
                if !self.state.is_down {
                    debug!(
                        "repeat of {} after timeout release; pressing again",
                        event.button
                    );
                }
                self.state.is_down = true;
                Transition::Repeat(active)
            }
            None => Transition::Ignored,
        }
    }

    /// Idle-timeout check at `now`.
    ///
    /// Returns [`Transition::Release`] exactly once per stuck key: when a key
    /// is down and more than `key_timeout` has passed since the last mapped
    /// event.
    pub fn on_tick(&mut self, now: Instant) -> Transition {
        if !self.state.is_down {
            return Transition::Ignored;
        }
        let idle = now.saturating_duration_since(self.state.last_event);
        if idle <= self.key_timeout {
            return Transition::Ignored;
        }
        self.state.is_down = false;
        self.active_binding
            .map_or(Transition::Ignored, Transition::Release)
    }

    /// Releases the held key unconditionally (used on shutdown).
    pub fn release_all(&mut self) -> Transition {
        match (self.state.is_down, self.active_binding) {
            (true, Some(active)) => {
                self.state.is_down = false;
                Transition::Release(active)
            }
            _ => Transition::Ignored,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
