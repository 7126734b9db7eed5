//! Table of live connections and their outbound queues.
//!
//! [`ConnectionRegistry`] follows the same `RwLock<HashMap<..>>` layout as
//! the other shared tables in this crate. Each entry owns the sending half
//! of a bounded per-connection queue; the transport task drains the
//! receiving half, which keeps per-connection delivery order equal to emit
//! order.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{RwLock, mpsc};

use super::{ConnectionId, OutboundMessage, SubscriptionRouter, TopicKey};

/// Sending half of a connection's outbound queue.
pub type OutboundSender = mpsc::Sender<Arc<OutboundMessage>>;

/// Receiving half of a connection's outbound queue.
pub type OutboundReceiver = mpsc::Receiver<Arc<OutboundMessage>>;

#[derive(Debug)]
struct ConnectionEntry {
    connected_at: DateTime<Utc>,
    outbound: OutboundSender,
}

/// Read-only view of a registered connection.
#[derive(Debug, Clone, Serialize)]
pub struct Connection {
    /// Connection identifier.
    pub id: ConnectionId,
    /// When the connection was registered.
    pub connected_at: DateTime<Utc>,
    /// Topics the connection currently belongs to.
    pub subscriptions: HashSet<TopicKey>,
}

/// A freshly registered connection and the queue its transport must drain.
#[derive(Debug)]
pub struct RegisteredConnection {
    /// Identifier assigned at registration.
    pub id: ConnectionId,
    /// Messages addressed to this connection, in emit order.
    pub outbound: OutboundReceiver,
}

/// Registry of every live connection.
#[derive(Debug)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, ConnectionEntry>>,
    router: Arc<SubscriptionRouter>,
    queue_capacity: usize,
}

impl ConnectionRegistry {
    /// Creates an empty registry whose connections get outbound queues of
    /// `queue_capacity` messages.
    #[must_use]
    pub fn new(router: Arc<SubscriptionRouter>, queue_capacity: usize) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            router,
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Registers a new connection with an empty subscription set.
    pub async fn register(&self) -> RegisteredConnection {
        let id = ConnectionId::new();
        let (outbound, rx) = mpsc::channel(self.queue_capacity);
        self.connections.write().await.insert(
            id,
            ConnectionEntry {
                connected_at: Utc::now(),
                outbound,
            },
        );
        tracing::debug!(connection_id = %id, "connection registered");
        RegisteredConnection { id, outbound: rx }
    }

    /// Removes a connection and drops it from every router topic.
    ///
    /// Unknown ids are ignored. Returns `true` if the connection existed.
    pub async fn unregister(&self, id: ConnectionId) -> bool {
        let existed = self.connections.write().await.remove(&id).is_some();
        let dropped = self.router.drop_all(id).await;
        if existed {
            tracing::debug!(connection_id = %id, dropped, "connection unregistered");
        }
        existed
    }

    /// Returns a snapshot of the connection, if it is registered.
    pub async fn get(&self, id: ConnectionId) -> Option<Connection> {
        let connected_at = self.connections.read().await.get(&id)?.connected_at;
        Some(Connection {
            id,
            connected_at,
            subscriptions: self.router.subscriptions_of(id).await,
        })
    }

    /// Returns `true` if the connection is registered.
    pub async fn contains(&self, id: ConnectionId) -> bool {
        self.connections.read().await.contains_key(&id)
    }

    /// Returns the outbound queue of one connection.
    pub async fn sender(&self, id: ConnectionId) -> Option<OutboundSender> {
        self.connections
            .read()
            .await
            .get(&id)
            .map(|entry| entry.outbound.clone())
    }

    /// Returns the outbound queues of every registered connection.
    pub async fn all_senders(&self) -> Vec<(ConnectionId, OutboundSender)> {
        self.connections
            .read()
            .await
            .iter()
            .map(|(id, entry)| (*id, entry.outbound.clone()))
            .collect()
    }

    /// Returns the outbound queues of the given connections that are still
    /// registered.
    pub async fn senders_for(
        &self,
        ids: &HashSet<ConnectionId>,
    ) -> Vec<(ConnectionId, OutboundSender)> {
        let map = self.connections.read().await;
        ids.iter()
            .filter_map(|id| map.get(id).map(|entry| (*id, entry.outbound.clone())))
            .collect()
    }

    /// Returns a snapshot of every registered connection id.
    pub async fn ids(&self) -> Vec<ConnectionId> {
        self.connections.read().await.keys().copied().collect()
    }

    /// Returns the number of registered connections.
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Returns `true` if no connection is registered.
    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }

    /// Returns the router this registry keeps in sync.
    #[must_use]
    pub const fn router(&self) -> &Arc<SubscriptionRouter> {
        &self.router
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::StationId;

    fn station(raw: i64) -> TopicKey {
        let Ok(id) = StationId::new(raw) else {
            panic!("valid station id");
        };
        TopicKey::Station(id)
    }

    fn registry() -> ConnectionRegistry {
        ConnectionRegistry::new(Arc::new(SubscriptionRouter::new()), 8)
    }

    #[tokio::test]
    async fn register_creates_empty_connection() {
        let registry = registry();
        let conn = registry.register().await;

        let Some(view) = registry.get(conn.id).await else {
            panic!("connection should be registered");
        };
        assert_eq!(view.id, conn.id);
        assert!(view.subscriptions.is_empty());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn unregister_removes_connection_and_memberships() {
        let registry = registry();
        let conn = registry.register().await;
        registry.router().join(conn.id, station(1)).await;
        registry.router().join(conn.id, station(2)).await;

        assert!(registry.unregister(conn.id).await);
        assert!(registry.get(conn.id).await.is_none());
        assert!(registry.is_empty().await);
        assert!(!registry.router().members_of(&station(1)).await.contains(&conn.id));
        assert!(!registry.router().members_of(&station(2)).await.contains(&conn.id));
    }

    #[tokio::test]
    async fn unregister_unknown_is_noop() {
        let registry = registry();
        let _kept = registry.register().await;
        assert!(!registry.unregister(ConnectionId::new()).await);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn get_reflects_router_subscriptions() {
        let registry = registry();
        let conn = registry.register().await;
        registry.router().join(conn.id, station(5)).await;

        let Some(view) = registry.get(conn.id).await else {
            panic!("connection should be registered");
        };
        assert!(view.subscriptions.contains(&station(5)));
    }

    #[tokio::test]
    async fn senders_for_skips_unregistered() {
        let registry = registry();
        let a = registry.register().await;
        let ghost = ConnectionId::new();
        let ids: HashSet<ConnectionId> = [a.id, ghost].into();
        let senders = registry.senders_for(&ids).await;
        assert_eq!(senders.len(), 1);
        assert_eq!(registry.all_senders().await.len(), 1);
    }

    #[tokio::test]
    async fn ids_snapshot_lists_live_connections() {
        let registry = registry();
        let a = registry.register().await;
        let b = registry.register().await;
        registry.unregister(a.id).await;
        assert_eq!(registry.ids().await, vec![b.id]);
    }
}
