//! In-memory [`Connection`] for unit and integration testing.
//!
//! Records every payload it is asked to send instead of writing to a socket,
//! and can be told to fail sends so that partial-failure behaviour of the
//! dispatcher can be exercised without a network.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domain::connection::{
    AtomicReadyState, Connection, ConnectionId, ReadyState, SendError, WirePayload,
};

/// A recording mock implementation of [`Connection`].
#[derive(Debug)]
pub struct MockConnection {
    id: ConnectionId,
    state: AtomicReadyState,
    fail_sends: AtomicBool,
    attempts: AtomicUsize,
    received: Mutex<Vec<WirePayload>>,
}

impl MockConnection {
    /// Creates an `Open` connection with a fresh id.
    pub fn open() -> Self {
        Self::with_id(ConnectionId::new())
    }

    /// Creates an `Open` connection with the given id.
    pub fn with_id(id: ConnectionId) -> Self {
        Self {
            id,
            state: AtomicReadyState::new(ReadyState::Open),
            fail_sends: AtomicBool::new(false),
            attempts: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Creates a connection in `state` with a fresh id.
    pub fn with_state(state: ReadyState) -> Self {
        let conn = Self::open();
        conn.set_state(state);
        conn
    }

    /// Creates an `Open` connection whose every send fails.
    pub fn failing() -> Self {
        let conn = Self::open();
        conn.set_failing(true);
        conn
    }

    /// Moves the connection to `state`.
    pub fn set_state(&self, state: ReadyState) {
        self.state.store(state);
    }

    /// Makes subsequent sends fail (`true`) or succeed (`false`).
    pub fn set_failing(&self, failing: bool) {
        self.fail_sends.store(failing, Ordering::Relaxed);
    }

    /// Number of times [`Connection::send`] was called, successful or not.
    pub fn send_attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Payloads accepted so far, in order.
    pub fn received(&self) -> Vec<WirePayload> {
        self.received.lock().expect("lock poisoned").clone()
    }

    /// Payload texts accepted so far, in order.
    pub fn received_text(&self) -> Vec<String> {
        self.received()
            .iter()
            .map(|payload| payload.as_str().to_string())
            .collect()
    }
}

impl Default for MockConnection {
    fn default() -> Self {
        Self::open()
    }
}

impl Connection for MockConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn ready_state(&self) -> ReadyState {
        self.state.load()
    }

    fn send(&self, payload: &WirePayload) -> Result<(), SendError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        if self.fail_sends.load(Ordering::Relaxed) {
            return Err(SendError::Transport {
                id: self.id,
                reason: "mock send failure".to_string(),
            });
        }
        self.received
            .lock()
            .expect("lock poisoned")
            .push(payload.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_connection_records_payloads_in_order() {
        // Arrange
        let conn = MockConnection::open();

        // Act
        conn.send(&WirePayload::from("one")).unwrap();
        conn.send(&WirePayload::from("two")).unwrap();

        // Assert
        assert_eq!(conn.received_text(), vec!["one", "two"]);
        assert_eq!(conn.send_attempts(), 2);
    }

    #[test]
    fn test_failing_mock_counts_attempts_but_records_nothing() {
        let conn = MockConnection::failing();

        let result = conn.send(&WirePayload::from("lost"));

        assert!(matches!(result, Err(SendError::Transport { .. })));
        assert_eq!(conn.send_attempts(), 1);
        assert!(conn.received().is_empty());
    }

    #[test]
    fn test_with_state_sets_ready_state() {
        let conn = MockConnection::with_state(ReadyState::Closing);
        assert_eq!(conn.ready_state(), ReadyState::Closing);
    }
}
