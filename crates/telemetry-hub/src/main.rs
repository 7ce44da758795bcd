//! Telemetry hub entry point.
//!
//! Starts a WebSocket server and broadcasts a synthetic telemetry snapshot to
//! every connected client once per interval, until Ctrl+C.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ Hub::start()          -- WebSocket listener (tokio task)
//!  └─ start_publishing()    -- ScheduledTask: sample → broadcast
//!  └─ ctrl_c()              -- cancel ticker, then stop listener
//! ```
//!
//! # Usage
//!
//! ```text
//! telemetry-hub [--host <HOST>] [--port <PORT>] [--interval-ms <MS>]
//!               [--tls-cert <PEM> --tls-key <PEM>] [--pretty[=BOOL]] [--config <TOML>]
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hub_server::{Hub, HubArgs};
use telemetry_hub::application::generate::TelemetryClock;
use telemetry_hub::application::publish::start_publishing;
use telemetry_hub::application::settings::resolve_interval;

/// Port the telemetry hub listens on unless configured otherwise.
const DEFAULT_PORT: u16 = 8766;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "telemetry-hub",
    version,
    about = "Broadcast synthetic telemetry to WebSocket clients"
)]
struct Cli {
    #[command(flatten)]
    hub: HubArgs,

    /// Milliseconds between telemetry broadcasts (default: 1000)
    #[arg(long, env = "HUB_INTERVAL_MS")]
    interval_ms: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let file = cli.hub.load_file().context("failed to load configuration file")?;
    let config = cli
        .hub
        .resolve(&file, DEFAULT_PORT)
        .context("invalid configuration")?;
    let interval = resolve_interval(cli.interval_ms, &file).context("invalid configuration")?;

    let hub = Hub::new(config.wire_format);
    let running = hub
        .start(&config)
        .await
        .with_context(|| format!("failed to start telemetry server on {}", config.bind_target()))?;
    info!("Telemetry WebSocket server running on {}", running.url());

    let ticker = start_publishing(Arc::clone(hub.dispatcher()), TelemetryClock::start(), interval);
    info!(interval_ms = interval.as_millis() as u64, "telemetry broadcasting started");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;
    info!("Shutting down telemetry server...");

    // Ticker first, so no broadcast races the listener shutdown.
    let ticks = ticker.cancel().await;
    running.stop().await;
    info!(ticks, "telemetry hub stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
