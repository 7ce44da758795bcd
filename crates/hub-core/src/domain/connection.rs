//! Connection identity, readiness state, and the [`Connection`] trait.
//!
//! # Readiness states (for beginners)
//!
//! Every client connection moves through four states, mirroring the
//! WebSocket `readyState` attribute:
//!
//! ```text
//! Connecting ──► Open ──► Closing ──► Closed
//!                  │                     ▲
//!                  └─────────────────────┘  (transport error)
//! ```
//!
//! Only `Open` connections are eligible to receive a broadcast.  The
//! dispatcher checks the state immediately before each send, so a connection
//! that started closing after the registry snapshot was taken is skipped.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

// ── Identity ──────────────────────────────────────────────────────────────────

/// Unique identity of one accepted client connection.
///
/// Two handles to the same underlying session always report the same id; the
/// registry uses it to guarantee that a connection is counted at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generates a fresh random (v4) connection id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The simple (hyphen-less) form keeps log lines short.
        write!(f, "{}", self.0.simple())
    }
}

// ── Readiness state ───────────────────────────────────────────────────────────

/// Lifecycle stage of a connection.  Determines send eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ReadyState {
    /// Handshake still in progress.
    Connecting = 0,
    /// Handshake complete; frames may be sent.
    Open = 1,
    /// A close has been initiated by either side.
    Closing = 2,
    /// The connection is finished.
    Closed = 3,
}

impl ReadyState {
    /// Returns `true` only for [`ReadyState::Open`].
    pub fn is_open(self) -> bool {
        self == ReadyState::Open
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => ReadyState::Connecting,
            1 => ReadyState::Open,
            2 => ReadyState::Closing,
            _ => ReadyState::Closed,
        }
    }
}

/// A [`ReadyState`] that can be read and updated from several tasks without a
/// lock.
///
/// Transports keep one of these per session: the session task moves it
/// forward while the dispatcher reads it during a broadcast.
#[derive(Debug)]
pub struct AtomicReadyState(AtomicU8);

impl AtomicReadyState {
    /// Creates a new cell holding `state`.
    pub fn new(state: ReadyState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    /// Returns the current state.
    pub fn load(&self) -> ReadyState {
        ReadyState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Replaces the current state.
    pub fn store(&self, state: ReadyState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

impl Default for AtomicReadyState {
    fn default() -> Self {
        Self::new(ReadyState::Connecting)
    }
}

// ── Wire payload ──────────────────────────────────────────────────────────────

/// The serialized (UTF-8 JSON) form of one message.
///
/// A broadcast serializes its message exactly once and hands every recipient
/// a clone of the same `WirePayload`.  Cloning only bumps a reference count,
/// so fan-out to many connections never copies the text up front.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WirePayload(Arc<str>);

impl WirePayload {
    /// Returns the payload text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the payload in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for WirePayload {
    fn from(text: String) -> Self {
        Self(Arc::from(text))
    }
}

impl From<&str> for WirePayload {
    fn from(text: &str) -> Self {
        Self(Arc::from(text))
    }
}

impl fmt::Display for WirePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Connection trait ──────────────────────────────────────────────────────────

/// Error returned when a payload cannot be handed to a connection.
///
/// Send errors are always local to one connection.  The dispatcher logs them
/// and moves on; the connection is reaped by its own close/error callback.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SendError {
    /// The connection's outbound side has already shut down.
    #[error("connection {0} is closed")]
    Closed(ConnectionId),

    /// The connection exists but is not in the `Open` state.
    #[error("connection {id} is not open (state: {state:?})")]
    NotOpen {
        /// Connection that refused the payload.
        id: ConnectionId,
        /// State it was in at the time.
        state: ReadyState,
    },

    /// The underlying transport rejected the frame.
    #[error("transport error on connection {id}: {reason}")]
    Transport {
        /// Connection that failed.
        id: ConnectionId,
        /// Human-readable cause.
        reason: String,
    },
}

/// A live, bidirectional channel to one client, as seen by the core.
///
/// The transport owns the session; the registry and dispatcher only hold
/// `Arc<dyn Connection>` references to it.  Implementations must make
/// [`send`](Connection::send) non-blocking: it enqueues the payload and
/// returns, leaving the actual network write to the transport.
pub trait Connection: Send + Sync {
    /// Stable identity of this connection.
    fn id(&self) -> ConnectionId;

    /// Current readiness state.
    fn ready_state(&self) -> ReadyState;

    /// Enqueues `payload` for delivery to the client.
    ///
    /// # Errors
    ///
    /// Returns a [`SendError`] if the connection can no longer accept frames.
    fn send(&self, payload: &WirePayload) -> Result<(), SendError>;
}

// ── Tests ─────────────────────────────────────────────────────────────────────
