//! The set of currently open client connections.
//!
//! The registry is the single source of truth for "who receives the next
//! broadcast".  The transport adds a connection when its handshake completes
//! and removes it when the connection closes or fails; the dispatcher only
//! ever reads it.
//!
//! # Locking
//!
//! The map sits behind a `std::sync::RwLock`.  Every operation holds the lock
//! for a single map access and never across a send or an `.await`, so
//! [`snapshot`](ConnectionRegistry::snapshot) can hand out a detached copy
//! that stays valid while connections join and leave.  A poisoned lock is
//! recovered rather than propagated: the map holds no invariant a panic
//! elsewhere could have broken halfway.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::connection::{Connection, ConnectionId};

/// Set of live connections, unique by [`ConnectionId`].
///
/// All operations are total: none of them fail or panic.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, Arc<dyn Connection>>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `connection` to the set.
    ///
    /// Registering a connection whose id is already present is a no-op: the
    /// existing entry is kept.  Returns `true` if the connection was newly
    /// added.
    pub fn register(&self, connection: Arc<dyn Connection>) -> bool {
        match self.write().entry(connection.id()) {
            Entry::Vacant(slot) => {
                slot.insert(connection);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Removes the connection with `id` if present.
    ///
    /// Safe to call twice (close and error can both fire) or for an id that
    /// was never registered.  Returns `true` if an entry was removed.
    pub fn unregister(&self, id: ConnectionId) -> bool {
        self.write().remove(&id).is_some()
    }

    /// Returns a detached copy of the current set.
    ///
    /// The returned vector is unaffected by later register/unregister calls,
    /// so callers may iterate it at leisure.
    pub fn snapshot(&self) -> Vec<Arc<dyn Connection>> {
        self.read().values().cloned().collect()
    }

    /// Number of registered connections.
    pub fn size(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if no connection is registered.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns `true` if a connection with `id` is registered.
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.read().contains_key(&id)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<ConnectionId, Arc<dyn Connection>>> {
        self.connections.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ConnectionId, Arc<dyn Connection>>> {
        self.connections.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("size", &self.size())
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockConnection;

    #[test]
    fn test_registry_starts_empty() {
        let registry = ConnectionRegistry::new();
        assert_eq!(registry.size(), 0);
        assert!(registry.is_empty());
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    fn test_register_adds_connection() {
        // Arrange
        let registry = ConnectionRegistry::new();
        let conn = Arc::new(MockConnection::open());
        let id = conn.id();

        // Act
        let added = registry.register(conn);

        // Assert
        assert!(added);
        assert!(registry.contains(id));
        assert_eq!(registry.size(), 1);
    }

    #[test]
    fn test_register_twice_counts_once() {
        // Arrange
        let registry = ConnectionRegistry::new();
        let conn = Arc::new(MockConnection::open());

        // Act
        let first = registry.register(conn.clone());
        let second = registry.register(conn);

        // Assert
        assert!(first);
        assert!(!second, "re-registering must be a no-op");
        assert_eq!(registry.size(), 1);
    }

    #[test]
    fn test_register_distinct_handles_with_same_id_counts_once() {
        // Two handles sharing an identity are the same connection.
        let registry = ConnectionRegistry::new();
        let a = Arc::new(MockConnection::open());
        let twin = Arc::new(MockConnection::with_id(a.id()));

        registry.register(a);
        registry.register(twin);

        assert_eq!(registry.size(), 1);
    }

    #[test]
    fn test_unregister_removes_connection() {
        let registry = ConnectionRegistry::new();
        let conn = Arc::new(MockConnection::open());
        let id = conn.id();
        registry.register(conn);

        assert!(registry.unregister(id));
        assert!(!registry.contains(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unregister_twice_is_a_no_op() {
        // Arrange
        let registry = ConnectionRegistry::new();
        let keep = Arc::new(MockConnection::open());
        let gone = Arc::new(MockConnection::open());
        let gone_id = gone.id();
        registry.register(keep.clone());
        registry.register(gone);

        // Act
        let first = registry.unregister(gone_id);
        let second = registry.unregister(gone_id);

        // Assert
        assert!(first);
        assert!(!second);
        assert_eq!(registry.size(), 1);
        assert!(registry.contains(keep.id()));
    }

    #[test]
    fn test_unregister_unknown_id_leaves_state_unchanged() {
        let registry = ConnectionRegistry::new();
        registry.register(Arc::new(MockConnection::open()));

        assert!(!registry.unregister(ConnectionId::new()));
        assert_eq!(registry.size(), 1);
    }

    #[test]
    fn test_snapshot_is_detached_from_later_changes() {
        // Arrange
        let registry = ConnectionRegistry::new();
        let a = Arc::new(MockConnection::open());
        let a_id = a.id();
        registry.register(a);

        // Act: take a snapshot, then mutate the registry.
        let snapshot = registry.snapshot();
        registry.unregister(a_id);
        registry.register(Arc::new(MockConnection::open()));
        registry.register(Arc::new(MockConnection::open()));

        // Assert: the snapshot still shows the state at the time it was taken.
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id(), a_id);
        assert_eq!(registry.size(), 2);
    }

    #[test]
    fn test_debug_output_shows_size() {
        let registry = ConnectionRegistry::new();
        registry.register(Arc::new(MockConnection::open()));
        assert_eq!(format!("{registry:?}"), "ConnectionRegistry { size: 1 }");
    }
}
