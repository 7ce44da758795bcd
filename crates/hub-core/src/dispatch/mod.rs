//! Broadcast dispatch: serialize once, send to every open connection.
//!
//! # Failure isolation
//!
//! A broadcast never fails as a whole.  If one connection rejects the payload
//! (it closed between the registry snapshot and the send, its writer task
//! died, ...), the error is logged and the loop moves on to the next
//! connection.  The dispatcher also never unregisters anything: removing a
//! connection is the job of the transport's close/error callback, so there is
//! exactly one code path that shrinks the registry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::domain::connection::WirePayload;
use crate::domain::message::HubMessage;
use crate::registry::ConnectionRegistry;

/// JSON layout used on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WireFormat {
    /// Single-line JSON with no insignificant whitespace.
    #[default]
    Compact,
    /// Indented, human-readable JSON.
    Pretty,
}

/// Per-broadcast counters.
///
/// Purely informational; message sources are free to ignore it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Connections in the snapshot the broadcast iterated.
    pub recipients: usize,
    /// Sends that were accepted.
    pub delivered: usize,
    /// Connections skipped because they were not `Open`.
    pub skipped: usize,
    /// Sends that returned an error.
    pub failed: usize,
}

/// Fans messages out to the connections in a [`ConnectionRegistry`].
#[derive(Debug)]
pub struct BroadcastDispatcher {
    registry: Arc<ConnectionRegistry>,
    format: WireFormat,
    serializations: AtomicU64,
}

impl BroadcastDispatcher {
    /// Creates a dispatcher that emits compact JSON.
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self::with_format(registry, WireFormat::Compact)
    }

    /// Creates a dispatcher that emits JSON in `format`.
    pub fn with_format(registry: Arc<ConnectionRegistry>, format: WireFormat) -> Self {
        Self {
            registry,
            format,
            serializations: AtomicU64::new(0),
        }
    }

    /// The registry this dispatcher reads from.
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// The JSON layout this dispatcher emits.
    pub fn format(&self) -> WireFormat {
        self.format
    }

    /// Total number of messages serialized over this dispatcher's lifetime.
    pub fn serialization_count(&self) -> u64 {
        self.serializations.load(Ordering::Relaxed)
    }

    /// Sends `message` to every `Open` connection in the registry.
    ///
    /// With no registered connections this returns immediately without
    /// serializing.  Otherwise the message is serialized exactly once and the
    /// same payload is handed to each open connection in a snapshot taken at
    /// call time.  Connections registered after that snapshot do not receive
    /// this message.
    pub fn broadcast<M: HubMessage + ?Sized>(&self, message: &M) -> BroadcastReport {
        if self.registry.is_empty() {
            trace!(kind = message.kind(), "no connections; broadcast skipped");
            return BroadcastReport::default();
        }

        let payload = match self.encode(message) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(kind = message.kind(), error = %e, "failed to serialize broadcast message");
                return BroadcastReport::default();
            }
        };

        let snapshot = self.registry.snapshot();
        let mut report = BroadcastReport {
            recipients: snapshot.len(),
            ..BroadcastReport::default()
        };

        for connection in &snapshot {
            let state = connection.ready_state();
            if !state.is_open() {
                trace!(
                    connection = %connection.id(),
                    ?state,
                    "skipping connection that is not open"
                );
                report.skipped += 1;
                continue;
            }

            match connection.send(&payload) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    // Left for the connection's own close/error callback to reap.
                    debug!(connection = %connection.id(), error = %e, "broadcast send failed");
                    report.failed += 1;
                }
            }
        }

        debug!(
            kind = message.kind(),
            bytes = payload.len(),
            recipients = report.recipients,
            delivered = report.delivered,
            skipped = report.skipped,
            failed = report.failed,
            "broadcast complete"
        );
        report
    }

    /// Serializes `message` in this dispatcher's [`WireFormat`].
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the value cannot be represented as
    /// JSON (for example a map with non-string keys).
    pub fn encode<M: Serialize + ?Sized>(
        &self,
        message: &M,
    ) -> Result<WirePayload, serde_json::Error> {
        self.serializations.fetch_add(1, Ordering::Relaxed);
        let text = match self.format {
            WireFormat::Compact => serde_json::to_string(message)?,
            WireFormat::Pretty => serde_json::to_string_pretty(message)?,
        };
        Ok(WirePayload::from(text))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
