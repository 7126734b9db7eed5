//! Fan-out of outbound messages to connections.
//!
//! [`Broadcaster`] is the only place that pushes into connection queues.
//! Delivery is best effort and at most once: each push is a non-blocking
//! `try_send`, a full or closed queue loses that one message, and no
//! failure is ever reported back to the emitter. Messages are wrapped in an
//! [`Arc`] so a fan-out serializes nothing and clones only a pointer per
//! recipient.

use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;

use super::connection_registry::OutboundSender;
use super::{ConnectionId, ConnectionRegistry, EventName, OutboundMessage, TopicKey};

/// Emit primitive shared by the router-driven and system-wide paths.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl Broadcaster {
    /// Creates a broadcaster delivering to the connections of `registry`.
    #[must_use]
    pub const fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Delivers `data` to every registered connection, subscribed or not.
    ///
    /// Returns the number of connections the message was queued for.
    pub async fn emit_all(&self, event: EventName, data: serde_json::Value) -> usize {
        self.publish_all(OutboundMessage::new(event, data)).await
    }

    /// Delivers a prepared message to every registered connection.
    pub async fn publish_all(&self, message: OutboundMessage) -> usize {
        let targets = self.registry.all_senders().await;
        deliver(&targets, message)
    }

    /// Delivers `data` to the members of `topic` as resolved at call time.
    ///
    /// Connections joining after resolution miss this message; connections
    /// leaving concurrently may or may not get it.
    pub async fn emit_to_topic(
        &self,
        topic: &TopicKey,
        event: EventName,
        data: serde_json::Value,
    ) -> usize {
        self.publish_to_topic(topic, OutboundMessage::new(event, data))
            .await
    }

    /// Delivers a prepared message to the members of `topic`.
    pub async fn publish_to_topic(&self, topic: &TopicKey, message: OutboundMessage) -> usize {
        let members = self.registry.router().members_of(topic).await;
        if members.is_empty() {
            return 0;
        }
        let targets = self.registry.senders_for(&members).await;
        deliver(&targets, message.for_topic(topic))
    }

    /// Delivers `data` to a single connection.
    ///
    /// Returns `false` if the connection is unknown or its queue refused
    /// the message.
    pub async fn emit_to_connection(
        &self,
        connection: ConnectionId,
        event: EventName,
        data: serde_json::Value,
    ) -> bool {
        let Some(sender) = self.registry.sender(connection).await else {
            tracing::debug!(connection_id = %connection, event = event.as_str(), "emit to unknown connection");
            return false;
        };
        deliver(&[(connection, sender)], OutboundMessage::new(event, data)) == 1
    }
}

/// Pushes `message` into each queue, skipping the ones that refuse it.
fn deliver(targets: &[(ConnectionId, OutboundSender)], message: OutboundMessage) -> usize {
    let event = message.event.as_str();
    let message = Arc::new(message);
    let mut delivered = 0usize;
    for (connection_id, sender) in targets {
        match sender.try_send(Arc::clone(&message)) {
            Ok(()) => delivered = delivered.saturating_add(1),
            Err(TrySendError::Full(_)) => {
                tracing::warn!(%connection_id, event, "outbound queue full, message dropped");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(%connection_id, event, "outbound queue closed, message dropped");
            }
        }
    }
    delivered
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{StationId, SubscriptionRouter};
    use serde_json::json;

    fn station(raw: i64) -> TopicKey {
        let Ok(id) = StationId::new(raw) else {
            panic!("valid station id");
        };
        TopicKey::Station(id)
    }

    fn setup(capacity: usize) -> (Arc<ConnectionRegistry>, Broadcaster) {
        let registry = Arc::new(ConnectionRegistry::new(
            Arc::new(SubscriptionRouter::new()),
            capacity,
        ));
        let broadcaster = Broadcaster::new(Arc::clone(&registry));
        (registry, broadcaster)
    }

    #[tokio::test]
    async fn emit_all_reaches_unsubscribed_connections() {
        let (registry, broadcaster) = setup(8);
        let mut a = registry.register().await;
        let mut b = registry.register().await;

        let sent = broadcaster
            .emit_all(EventName::SystemHeartbeat, json!({"status": "operational"}))
            .await;
        assert_eq!(sent, 2);

        let Some(msg) = a.outbound.recv().await else {
            panic!("a should receive");
        };
        assert_eq!(msg.event, EventName::SystemHeartbeat);
        assert!(b.outbound.recv().await.is_some());
    }

    #[tokio::test]
    async fn emit_to_topic_reaches_only_members() {
        let (registry, broadcaster) = setup(8);
        let mut member = registry.register().await;
        let mut outsider = registry.register().await;
        registry.router().join(member.id, station(1)).await;

        let sent = broadcaster
            .emit_to_topic(&station(1), EventName::TrainUpdate, json!({"n": 1}))
            .await;
        assert_eq!(sent, 1);

        let Some(msg) = member.outbound.recv().await else {
            panic!("member should receive");
        };
        assert_eq!(msg.station_id.map(StationId::get), Some(1));
        assert!(outsider.outbound.try_recv().is_err());
    }

    #[tokio::test]
    async fn emit_to_empty_topic_is_not_an_error() {
        let (_registry, broadcaster) = setup(8);
        let sent = broadcaster
            .emit_to_topic(&station(42), EventName::TrainUpdate, json!({}))
            .await;
        assert_eq!(sent, 0);
    }

    #[tokio::test]
    async fn emit_to_connection_targets_one() {
        let (registry, broadcaster) = setup(8);
        let mut a = registry.register().await;
        let mut b = registry.register().await;

        assert!(
            broadcaster
                .emit_to_connection(a.id, EventName::TrainNotFound, json!({}))
                .await
        );
        assert!(a.outbound.recv().await.is_some());
        assert!(b.outbound.try_recv().is_err());
        assert!(
            !broadcaster
                .emit_to_connection(ConnectionId::new(), EventName::TrainNotFound, json!({}))
                .await
        );
    }

    #[tokio::test]
    async fn full_queue_does_not_block_other_recipients() {
        let (registry, broadcaster) = setup(1);
        let _stalled = registry.register().await;
        let mut healthy = registry.register().await;

        assert_eq!(broadcaster.emit_all(EventName::SystemUpdate, json!({"i": 1})).await, 2);
        assert!(healthy.outbound.recv().await.is_some());

        // The stalled queue is still full; only the drained one accepts.
        assert_eq!(broadcaster.emit_all(EventName::SystemUpdate, json!({"i": 2})).await, 1);
        let Some(msg) = healthy.outbound.recv().await else {
            panic!("healthy should receive the second message");
        };
        assert_eq!(msg.data["i"], 2);
    }

    #[tokio::test]
    async fn closed_queue_is_skipped() {
        let (registry, broadcaster) = setup(4);
        let dropped = registry.register().await;
        let mut alive = registry.register().await;
        drop(dropped.outbound);

        assert_eq!(broadcaster.emit_all(EventName::SystemUpdate, json!({})).await, 1);
        assert!(alive.outbound.recv().await.is_some());
    }

    #[tokio::test]
    async fn per_connection_order_is_preserved() {
        let (registry, broadcaster) = setup(8);
        let mut conn = registry.register().await;
        for i in 0..5 {
            broadcaster
                .emit_to_connection(conn.id, EventName::ManualUpdate, json!({"i": i}))
                .await;
        }
        for i in 0..5 {
            let Some(msg) = conn.outbound.recv().await else {
                panic!("expected message {i}");
            };
            assert_eq!(msg.data["i"], i);
        }
    }
}
