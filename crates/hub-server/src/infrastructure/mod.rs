//! Infrastructure layer for hub-server.
//!
//! The infrastructure layer handles all I/O: reading configuration and TLS
//! material from disk, accepting WebSocket connections, writing frames to
//! clients, and driving timers.
//!
//! # Responsibilities
//!
//! - Loading the optional TOML configuration file
//! - Loading PEM certificate material and building the TLS acceptor
//! - Binding the listener and running the accept loop
//! - Performing the WebSocket HTTP upgrade handshake
//! - Spawning per-session reader/writer tasks
//! - Running cancellable fixed-period tasks
//! - Stopping everything in order on shutdown
//!
//! # What does NOT belong here?
//!
//! - Message shapes and fan-out rules (that is `hub-core`)
//! - What a hub broadcasts and when (that is the hub binaries)

pub mod config_file;
pub mod hub;
pub mod scheduler;
pub mod tls;
pub mod ws_connection;
pub mod ws_server;

// Re-export the primary entry points so the binaries can call them concisely.
pub use hub::{Hub, RunningHub};
pub use scheduler::ScheduledTask;
pub use ws_server::TransportListener;
