//! # hub-core
//!
//! Shared library for the broadcast hubs containing the message types, the
//! connection registry, and the broadcast dispatcher.
//!
//! This crate is used by the transport (`hub-server`) and by both message
//! sources (`command-hub`, `telemetry-hub`).  It has zero dependencies on
//! sockets, TLS, terminals, or async runtimes.
//!
//! # Architecture overview (for beginners)
//!
//! A broadcast hub keeps a set of live client connections and pushes every
//! message it produces to all of them.  The pieces are:
//!
//! - **`domain`** – What travels and who it travels to.  [`CommandMessage`]
//!   and [`TelemetrySnapshot`] are the two message shapes; the [`Connection`]
//!   trait is the only thing the core knows about a client.
//!
//! - **`registry`** – The [`ConnectionRegistry`]: the set of connections that
//!   are currently open, keyed by [`ConnectionId`].
//!
//! - **`dispatch`** – The [`BroadcastDispatcher`]: serializes a message once
//!   and hands the same bytes to every open connection in the registry.
//!
//! - **`lifecycle`** – The [`LifecycleObserver`] callbacks a transport fires
//!   when a connection opens, sends data, closes, or fails, and the
//!   [`RegistryObserver`] that turns those callbacks into registry updates.
//!
//! ```text
//! transport ──on_open/on_close/on_error──► RegistryObserver ──► ConnectionRegistry
//!                                                                      ▲
//! message source ──broadcast(msg)──► BroadcastDispatcher ──snapshot────┘
//!                                           │
//!                                           └──send(payload)──► each open Connection
//! ```

pub mod dispatch;
pub mod domain;
pub mod lifecycle;
pub mod mock;
pub mod registry;

// Re-export the most-used types at the crate root so callers can write
// `hub_core::ConnectionRegistry` instead of `hub_core::registry::ConnectionRegistry`.
pub use dispatch::{BroadcastDispatcher, BroadcastReport, WireFormat};
pub use domain::connection::{
    AtomicReadyState, Connection, ConnectionId, ReadyState, SendError, WirePayload,
};
pub use domain::message::{
    Accelerometer, CommandKind, CommandMessage, HubMessage, TelemetrySnapshot,
};
pub use lifecycle::{LifecycleObserver, RegistryObserver};
pub use registry::ConnectionRegistry;
