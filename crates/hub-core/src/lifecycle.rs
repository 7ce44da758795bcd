//! Connection lifecycle callbacks.
//!
//! A transport reports what happens to each accepted connection through the
//! [`LifecycleObserver`] trait.  [`RegistryObserver`] is the implementation
//! the hubs use: it keeps the [`ConnectionRegistry`] in step with the
//! transport and logs inbound traffic.
//!
//! Keeping the callbacks behind a trait means the transport never touches the
//! registry directly, and tests can observe a real listener without a
//! registry at all.

use std::error::Error;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::connection::{Connection, ConnectionId};
use crate::registry::ConnectionRegistry;

/// Receives lifecycle events for every connection a transport accepts.
///
/// For a given connection the transport calls `on_open` once, then any
/// number of `on_message`, then exactly one of `on_close` or `on_error`.
pub trait LifecycleObserver: Send + Sync {
    /// The connection finished its handshake and is ready for broadcasts.
    fn on_open(&self, connection: Arc<dyn Connection>);

    /// The client sent a text frame.
    fn on_message(&self, id: ConnectionId, text: &str);

    /// The connection closed in an orderly way.
    fn on_close(&self, id: ConnectionId);

    /// The connection failed.  It is terminal; nothing reconnects it.
    fn on_error(&self, id: ConnectionId, error: &dyn Error);
}

/// Binds transport lifecycle events to a [`ConnectionRegistry`].
///
/// Inbound text frames have no functional effect; they are logged so an
/// operator can see what clients are sending.
#[derive(Debug, Clone)]
pub struct RegistryObserver {
    registry: Arc<ConnectionRegistry>,
}

impl RegistryObserver {
    /// Creates an observer that updates `registry`.
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this observer updates.
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }
}

impl LifecycleObserver for RegistryObserver {
    fn on_open(&self, connection: Arc<dyn Connection>) {
        let id = connection.id();
        if self.registry.register(connection) {
            info!(connection = %id, clients = self.registry.size(), "client connected");
        } else {
            warn!(connection = %id, "duplicate open ignored");
        }
    }

    fn on_message(&self, id: ConnectionId, text: &str) {
        info!(connection = %id, message = text, "received message");
    }

    fn on_close(&self, id: ConnectionId) {
        if self.registry.unregister(id) {
            info!(connection = %id, clients = self.registry.size(), "client disconnected");
        }
    }

    fn on_error(&self, id: ConnectionId, error: &dyn Error) {
        self.registry.unregister(id);
        warn!(
            connection = %id,
            clients = self.registry.size(),
            error = %error,
            "client connection failed"
        );
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockConnection;

    fn observer() -> (RegistryObserver, Arc<ConnectionRegistry>) {
        let registry = Arc::new(ConnectionRegistry::new());
        (RegistryObserver::new(Arc::clone(&registry)), registry)
    }

    #[test]
    fn test_on_open_registers_connection() {
        // Arrange
        let (observer, registry) = observer();
        let conn = Arc::new(MockConnection::open());
        let id = conn.id();

        // Act
        observer.on_open(conn);

        // Assert
        assert!(registry.contains(id));
    }

    #[test]
    fn test_duplicate_open_keeps_first_connection() {
        // Arrange
        let (observer, registry) = observer();
        let first = Arc::new(MockConnection::open());
        let id = first.id();
        let second = Arc::new(MockConnection::with_id(id));
        observer.on_open(Arc::clone(&first) as Arc<dyn Connection>);

        // Act
        observer.on_open(Arc::clone(&second) as Arc<dyn Connection>);

        // Assert
        assert_eq!(registry.size(), 1);
        let kept = registry.snapshot().pop().expect("one entry");
        assert_eq!(
            Arc::as_ptr(&kept) as *const (),
            Arc::as_ptr(&first) as *const ()
        );
    }

    #[test]
    fn test_on_close_unregisters_connection() {
        let (observer, registry) = observer();
        let conn = Arc::new(MockConnection::open());
        let id = conn.id();
        observer.on_open(conn);

        observer.on_close(id);

        assert!(registry.is_empty());
    }

    #[test]
    fn test_on_error_unregisters_connection() {
        // Arrange
        let (observer, registry) = observer();
        let conn = Arc::new(MockConnection::open());
        let id = conn.id();
        observer.on_open(conn);
        let error = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");

        // Act
        observer.on_error(id, &error);

        // Assert
        assert!(!registry.contains(id));
    }

    #[test]
    fn test_close_after_error_is_harmless() {
        let (observer, registry) = observer();
        let conn = Arc::new(MockConnection::open());
        let id = conn.id();
        observer.on_open(conn);
        let error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken pipe");

        observer.on_error(id, &error);
        observer.on_close(id);

        assert!(registry.is_empty());
    }

    #[test]
    fn test_on_message_does_not_touch_registry() {
        let (observer, registry) = observer();
        let conn = Arc::new(MockConnection::open());
        let id = conn.id();
        observer.on_open(conn);

        observer.on_message(id, "hello from the client");
        observer.on_message(ConnectionId::new(), "{not json");

        assert_eq!(registry.size(), 1);
    }
}
