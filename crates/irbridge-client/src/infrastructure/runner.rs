//! Wires the connection loop, the idle ticker and the press engine together.
//!
//! ```text
//! run_bridge()
//!  ├─ PressEngine::spawn()        -- blocking thread, owns the press state
//!  ├─ spawn_idle_ticker()         -- Tick every tick_interval
//!  └─ ConnectionManager::run()    -- Line per received line (awaited here)
//! ```
//!
//! When the connection loop returns, for whatever reason, shutdown is
//! triggered so the ticker stops, the channel closes and the engine releases
//! any held key before exiting.

use std::sync::Arc;

use irbridge_core::KeyMappingTable;
use tokio::sync::mpsc;
use tracing::{error, info};

use super::network::{ConnectionError, ConnectionManager, ConnectionStats, EventTransport};
use crate::application::emulate_input::{EmulateInputUseCase, InputInjector};
use crate::application::engine::{spawn_idle_ticker, EngineStats, PressEngine, ENGINE_CHANNEL_CAPACITY};
use crate::application::shutdown::Shutdown;
use crate::domain::RuntimeConfig;

/// Counters from both halves of a finished run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BridgeReport {
    pub connection: ConnectionStats,
    pub engine: EngineStats,
}

/// Runs the bridge until `shutdown` is triggered or the connection policy
/// gives up.
///
/// Bindings the injector cannot produce are dropped from `table` up front.
///
/// # Errors
///
/// Propagates the [`ConnectionError`] that ended the connection loop.  The
/// engine has already released any held key when this returns.
pub async fn run_bridge(
    config: &RuntimeConfig,
    table: KeyMappingTable,
    injector: Arc<dyn InputInjector>,
    transport: Arc<dyn EventTransport>,
    shutdown: Shutdown,
) -> Result<BridgeReport, ConnectionError> {
    let (tx, rx) = mpsc::channel(ENGINE_CHANNEL_CAPACITY);

    let emulator = EmulateInputUseCase::new(injector);
    let table = emulator.retain_supported(&table);
    let engine = PressEngine::new(config, Arc::new(table), emulator);
    let engine_task = engine.spawn(rx, shutdown.clone());
    let ticker = spawn_idle_ticker(config.tick_interval, tx.clone(), shutdown.clone());

    let manager = ConnectionManager::new(transport, config);
    let result = manager.run(tx, shutdown.clone()).await;

    shutdown.trigger();
    if let Err(e) = ticker.await {
        error!("idle ticker task failed: {e}");
    }
    let engine_stats = engine_task.await.unwrap_or_else(|e| {
        error!("engine task failed: {e}");
        EngineStats::default()
    });
    info!("engine stopped: {engine_stats:?}");

    result.map(|connection| BridgeReport {
        connection,
        engine: engine_stats,
    })
}
