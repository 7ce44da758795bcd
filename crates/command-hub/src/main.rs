//! Command hub entry point.
//!
//! Starts a WebSocket server and turns single key presses on the controlling
//! terminal into UX commands broadcast to every connected client.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ Hub::start()            -- WebSocket listener (tokio task)
//!  └─ TerminalKeySource       -- raw-mode reader (OS thread)
//!  └─ run_command_loop()      -- keystroke → broadcast, until Ctrl+C
//! ```
//!
//! # Usage
//!
//! ```text
//! command-hub [--host <HOST>] [--port <PORT>] [--tls-cert <PEM> --tls-key <PEM>]
//!             [--pretty[=BOOL]] [--config <TOML>]
//! ```
//!
//! Every option can also be set through its `HUB_*` environment variable.
//! Set `RUST_LOG=debug` to see per-client delivery details.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use command_hub::application::command_loop::{run_command_loop, LoopExit};
use command_hub::application::key_commands::banner;
use command_hub::infrastructure::console;
use command_hub::infrastructure::key_source::{terminal::TerminalKeySource, KeySource};
use hub_server::{Hub, HubArgs};

/// Port the command hub listens on unless configured otherwise.
const DEFAULT_PORT: u16 = 8765;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "command-hub",
    version,
    about = "Broadcast keyboard-triggered UX commands to WebSocket clients"
)]
struct Cli {
    #[command(flatten)]
    hub: HubArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(console::stdout)
        .init();

    let cli = Cli::parse();
    let file = cli.hub.load_file().context("failed to load configuration file")?;
    let config = cli
        .hub
        .resolve(&file, DEFAULT_PORT)
        .context("invalid configuration")?;

    info!("Starting WebSocket server...");
    let hub = Hub::new(config.wire_format);
    let running = hub
        .start(&config)
        .await
        .with_context(|| format!("failed to start WebSocket server on {}", config.bind_target()))?;
    info!("WebSocket server started on {}", running.url());

    info!("Initializing keyboard input handler...");
    let keys = TerminalKeySource::new();
    let mut rx = match keys.start() {
        Ok(rx) => rx,
        Err(e) => {
            running.stop().await;
            return Err(e).context("keyboard input requires an interactive terminal");
        }
    };
    {
        use std::io::Write;
        let mut out = console::stdout();
        writeln!(out, "{}", banner()).context("failed to write to stdout")?;
    }

    let exit = tokio::select! {
        exit = run_command_loop(&mut rx, hub.dispatcher()) => exit,
        _ = tokio::signal::ctrl_c() => LoopExit::Interrupted,
    };
    match exit {
        LoopExit::Interrupted => info!("Exiting..."),
        LoopExit::InputClosed => info!("keyboard input closed; exiting"),
    }

    keys.stop();
    running.stop().await;
    info!("command hub stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_defaults_resolve_to_port_8765() {
        // Arrange
        let cli = Cli::parse_from(["command-hub"]);

        // Act
        let config = cli
            .hub
            .resolve(&Default::default(), DEFAULT_PORT)
            .expect("defaults are valid");

        // Assert
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 8765);
        assert_eq!(config.security.scheme(), "ws");
    }

    #[test]
    fn test_cli_parses_listener_flags() {
        let cli = Cli::parse_from(["command-hub", "--host", "0.0.0.0", "--port", "9999"]);
        assert_eq!(cli.hub.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(cli.hub.port, Some(9999));
    }

    #[test]
    fn test_cli_parses_tls_flags() {
        let cli = Cli::parse_from([
            "command-hub",
            "--tls-cert",
            "cert.pem",
            "--tls-key",
            "key.pem",
        ]);
        assert_eq!(cli.hub.tls_cert, Some(PathBuf::from("cert.pem")));
        assert_eq!(cli.hub.tls_key, Some(PathBuf::from("key.pem")));
    }

    #[test]
    fn test_cli_rejects_non_numeric_port() {
        let result = Cli::try_parse_from(["command-hub", "--port", "eighty"]);
        assert!(result.is_err());
    }
}
