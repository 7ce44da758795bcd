//! hub-server library crate.
//!
//! This crate provides the network side of a broadcast hub: it accepts
//! WebSocket clients (plain or TLS), keeps the connection registry in step
//! with their lifecycle, and runs scheduled work until shutdown.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Clients (JSON over WebSocket)
//!         ↑
//! [hub-server]
//!   ├── domain/            Pure types: HubConfig, TransportSecurity
//!   ├── cli                Shared command-line arguments → HubConfig
//!   └── infrastructure/
//!         ├── config_file/ Optional TOML configuration file
//!         ├── tls/         PEM key/cert loading → TLS acceptor
//!         ├── ws_server/   TransportListener accept loop (tokio-tungstenite)
//!         ├── ws_connection/ Connection impl backed by a session writer task
//!         ├── scheduler/   Cancellable fixed-period task
//!         └── hub/         Registry + dispatcher + listener wiring
//!         ↑
//! [hub-core]   registry, dispatcher, messages
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O, no async.
//! - `infrastructure` depends on `domain`, `hub-core`, `tokio`, `tungstenite`
//!   and `rustls`.
//! - Message sources (the `command-hub` and `telemetry-hub` binaries) only
//!   see [`Hub`], [`RunningHub`], [`ScheduledTask`], and the dispatcher.

/// Domain layer: configuration types (no I/O).
pub mod domain;

/// Command-line arguments shared by every hub binary.
pub mod cli;

/// Infrastructure layer: TLS, WebSocket server, scheduling, wiring.
pub mod infrastructure;

pub use cli::HubArgs;
pub use domain::config::{HubConfig, TransportSecurity};
pub use infrastructure::config_file::{ConfigError, FileConfig};
pub use infrastructure::hub::{Hub, RunningHub};
pub use infrastructure::scheduler::ScheduledTask;
pub use infrastructure::tls::TlsError;
pub use infrastructure::ws_server::{TransportError, TransportListener};
