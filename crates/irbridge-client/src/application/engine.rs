//! The press engine: single owner of the press state.
//!
//! # Architecture
//!
//! ```text
//! ConnectionManager ──Line──┐
//!                           ├──► mpsc ──► PressEngine ──► EmulateInputUseCase
//! idle ticker ───────Tick───┘
//! ```
//!
//! Received lines and idle-timeout ticks travel through one channel and are
//! handled strictly in arrival order by one task.  Because nothing else ever
//! touches the [`PressStateMachine`], the "is a key down / which key is it"
//! check and the release that follows can never interleave with an incoming
//! press, and no lock is needed.
//!
//! The engine runs on a blocking thread because the OS injection primitive
//! paces consecutive events with a short sleep.

use std::sync::Arc;
use std::time::{Duration, Instant};

use irbridge_core::{parse_line, KeyMappingTable, PressState, PressStateMachine, Transition};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::application::emulate_input::EmulateInputUseCase;
use crate::application::shutdown::Shutdown;
use crate::domain::RuntimeConfig;

/// Capacity of the engine input channel.
pub const ENGINE_CHANNEL_CAPACITY: usize = 256;

/// Everything the engine reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineMessage {
    /// One complete protocol line and the instant it was received.
    Line { text: String, received_at: Instant },
    /// Idle-timeout check.
    Tick(Instant),
}

impl EngineMessage {
    /// A line stamped with the current instant.
    pub fn line(text: impl Into<String>) -> Self {
        EngineMessage::Line {
            text: text.into(),
            received_at: Instant::now(),
        }
    }
}

/// Counters reported when the engine stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    pub lines: u64,
    pub parse_errors: u64,
    pub unmapped: u64,
    pub presses: u64,
    pub repeats: u64,
    pub timeout_releases: u64,
    pub injection_errors: u64,
}

/// Owns the press state machine and applies its transitions.
pub struct PressEngine {
    machine: PressStateMachine,
    table: Arc<KeyMappingTable>,
    emulator: EmulateInputUseCase,
    stats: EngineStats,
}

impl PressEngine {
    pub fn new(
        config: &RuntimeConfig,
        table: Arc<KeyMappingTable>,
        emulator: EmulateInputUseCase,
    ) -> Self {
        Self {
            machine: PressStateMachine::new(
                config.key_timeout,
                config.repeat_delay_threshold,
                Instant::now(),
            ),
            table,
            emulator,
            stats: EngineStats::default(),
        }
    }

    pub fn state(&self) -> &PressState {
        self.machine.state()
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Processes one message and returns the transition that was applied.
    ///
    /// Malformed lines are logged and dropped without touching the state.
    pub fn handle(&mut self, message: EngineMessage) -> Transition {
        let transition = match message {
            EngineMessage::Line { text, received_at } => {
                self.stats.lines += 1;
                let event = match parse_line(&text) {
                    Ok(event) => event,
                    Err(e) => {
                        self.stats.parse_errors += 1;
                        warn!("discarding malformed line {text:?}: {e}");
                        return Transition::Ignored;
                    }
                };
                let transition = self.machine.on_event(&event, &self.table, received_at);
                match &transition {
                    Transition::Unmapped => {
                        self.stats.unmapped += 1;
                        info!("unmapped button pressed: {}", text.trim());
                    }
                    Transition::Press { press, .. } => {
                        self.stats.presses += 1;
                        debug!("{} → {press}", event.button);
                    }
                    Transition::Repeat(_) => self.stats.repeats += 1,
                    _ => {}
                }
                transition
            }
            EngineMessage::Tick(now) => {
                let transition = self.machine.on_tick(now);
                if let Transition::Release(binding) = &transition {
                    self.stats.timeout_releases += 1;
                    debug!("idle timeout: releasing {binding}");
                }
                transition
            }
        };

        self.inject(&transition);
        transition
    }

    /// Releases a held key, if any.  Called once on shutdown.
    pub fn release_all(&mut self) {
        let transition = self.machine.release_all();
        if let Transition::Release(binding) = &transition {
            info!("releasing held key {binding} on shutdown");
        }
        self.inject(&transition);
    }

    fn inject(&mut self, transition: &Transition) {
        if let Err(e) = self.emulator.apply(transition) {
            self.stats.injection_errors += 1;
            error!("key injection failed: {e}");
        }
    }

    /// Drains `rx` until it closes or `shutdown` is triggered, then releases
    /// any held key.  Blocks the calling thread.
    pub fn run_blocking(
        mut self,
        mut rx: mpsc::Receiver<EngineMessage>,
        shutdown: Shutdown,
    ) -> EngineStats {
        while let Some(message) = rx.blocking_recv() {
            if shutdown.is_triggered() {
                break;
            }
            self.handle(message);
        }
        self.release_all();
        self.stats
    }

    /// Runs [`Self::run_blocking`] on Tokio's blocking pool.
    pub fn spawn(
        self,
        rx: mpsc::Receiver<EngineMessage>,
        shutdown: Shutdown,
    ) -> JoinHandle<EngineStats> {
        tokio::task::spawn_blocking(move || self.run_blocking(rx, shutdown))
    }
}

/// Feeds [`EngineMessage::Tick`] into the engine every `period` until
/// shutdown or until the engine goes away.
pub fn spawn_idle_ticker(
    period: Duration,
    tx: mpsc::Sender<EngineMessage>,
    shutdown: Shutdown,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            if shutdown.is_triggered() {
                break;
            }
            tokio::select! {
                _ = interval.tick() => {}
                _ = shutdown.wait() => break,
            }
            // A full channel means the engine is already busy; the next tick
            // carries a later instant anyway.
            match tx.try_send(EngineMessage::Tick(Instant::now())) {
                Ok(()) | Err(mpsc::error::TrySendError::Full(_)) => {}
                Err(mpsc::error::TrySendError::Closed(_)) => break,
            }
        }
        debug!("idle ticker stopped");
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
