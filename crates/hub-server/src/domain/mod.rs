//! Domain layer for hub-server.
//!
//! Plain configuration types with no dependencies on I/O or the async
//! runtime.  The infrastructure layer turns them into sockets and acceptors.

pub mod config;

pub use config::{HubConfig, TransportSecurity, DEFAULT_HOST};
