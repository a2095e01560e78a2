//! irbridge entry point.
//!
//! # Usage
//!
//! ```text
//! irbridge [OPTIONS]
//!
//! Options:
//!   --config <PATH>   Runtime settings [default: config.json]
//!   --keymap <PATH>   Button → key bindings [default: keymap.json]
//!   --dry-run         Log key events instead of injecting them
//! ```
//!
//! | Variable           | Default       |
//! |--------------------|---------------|
//! | `IRBRIDGE_CONFIG`  | `config.json` |
//! | `IRBRIDGE_KEYMAP`  | `keymap.json` |
//! | `IRBRIDGE_DRY_RUN` | unset         |
//!
//! `RUST_LOG` overrides the `log_level` from `config.json`.
//!
//! Exit status is 0 after Ctrl-C and 1 when a file cannot be loaded, the
//! injector cannot be opened or the daemon stays unreachable for
//! `lirc_rc_attempts` attempts.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use irbridge_client::application::emulate_input::InputInjector;
use irbridge_client::application::shutdown::Shutdown;
use irbridge_client::infrastructure::input_emulation::{mock::MockInputInjector, native_injector};
use irbridge_client::infrastructure::network::TcpTransport;
use irbridge_client::infrastructure::run_bridge;
use irbridge_client::infrastructure::storage::{load_config, load_keymap, ConfigError, ConfigFile};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Turns IR remote button presses from WinLIRC/lircd into keyboard input.
#[derive(Debug, Parser)]
#[command(name = "irbridge", version)]
struct Cli {
    /// Path of the JSON runtime configuration.
    #[arg(long, default_value = "config.json", env = "IRBRIDGE_CONFIG")]
    config: PathBuf,

    /// Path of the JSON keymap.
    #[arg(long, default_value = "keymap.json", env = "IRBRIDGE_KEYMAP")]
    keymap: PathBuf,

    /// Log key events instead of injecting them.
    #[arg(long, env = "IRBRIDGE_DRY_RUN")]
    dry_run: bool,
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // The log level lives in the config file, so logging starts after it is
    // read; a broken config still gets logged at the default level.
    let config_file = load_config(&cli.config);
    init_logging(
        config_file
            .as_ref()
            .map(|c| c.log_level.as_str())
            .unwrap_or("info"),
    );

    // Logged once; the exit status carries the failure.
    match run(cli, config_file).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config_file: Result<ConfigFile, ConfigError>) -> anyhow::Result<()> {
    let config = config_file
        .with_context(|| format!("loading {}", cli.config.display()))?
        .to_runtime();
    let table = load_keymap(&cli.keymap)
        .with_context(|| format!("loading {}", cli.keymap.display()))?;

    info!("irbridge starting; daemon at {}", config.endpoint());

    // ── Key injector ──────────────────────────────────────────────────────────
    let injector: Arc<dyn InputInjector> = if cli.dry_run {
        info!("dry run: key events are logged, not injected");
        Arc::new(MockInputInjector::dry_run())
    } else {
        native_injector().context("opening the key injector")?
    };

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let shutdown = Shutdown::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            on_signal.trigger();
        }
    });

    let transport = Arc::new(TcpTransport::new(config.endpoint()));
    let report = run_bridge(&config, table, injector, transport, shutdown)
        .await
        .context("connection to the IR daemon failed")?;

    info!(
        "irbridge stopped: {} connects, {} lines, {} presses",
        report.connection.connects, report.connection.lines, report.engine.presses
    );
    Ok(())
}
