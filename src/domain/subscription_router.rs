//! Topic membership table shared by all connections.
//!
//! [`SubscriptionRouter`] keeps both directions of the membership relation
//! (topic → members and connection → topics) behind a single
//! [`tokio::sync::RwLock`]. Every operation takes the lock once, so a
//! reader never observes a half-applied join or leave and the two
//! directions always agree.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use super::{ConnectionId, TopicKey};

#[derive(Debug, Default)]
struct Membership {
    /// Topic → connections. Topics with no members are removed.
    members: HashMap<TopicKey, HashSet<ConnectionId>>,
    /// Connection → topics. Connections with no topics are removed.
    subscriptions: HashMap<ConnectionId, HashSet<TopicKey>>,
}

impl Membership {
    fn remove(&mut self, connection: ConnectionId, topic: &TopicKey) -> bool {
        let Some(topics) = self.subscriptions.get_mut(&connection) else {
            return false;
        };
        if !topics.remove(topic) {
            return false;
        }
        if topics.is_empty() {
            self.subscriptions.remove(&connection);
        }
        if let Some(members) = self.members.get_mut(topic) {
            members.remove(&connection);
            if members.is_empty() {
                self.members.remove(topic);
            }
        }
        true
    }
}

/// Room-style subscription router.
///
/// # Concurrency
///
/// Each call is atomic. No ordering is guaranteed between calls issued by
/// different connections: an emission resolved concurrently with a leave
/// may or may not include the leaving connection.
#[derive(Debug, Default)]
pub struct SubscriptionRouter {
    inner: RwLock<Membership>,
}

impl SubscriptionRouter {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `connection` to `topic`. Returns `false` if it was already a
    /// member, in which case nothing changes.
    pub async fn join(&self, connection: ConnectionId, topic: TopicKey) -> bool {
        let mut guard = self.inner.write().await;
        let added = guard
            .subscriptions
            .entry(connection)
            .or_default()
            .insert(topic.clone());
        if added {
            guard.members.entry(topic).or_default().insert(connection);
        }
        added
    }

    /// Removes `connection` from `topic`. Returns `false` if it was not a
    /// member; leaving is always valid.
    pub async fn leave(&self, connection: ConnectionId, topic: &TopicKey) -> bool {
        self.inner.write().await.remove(connection, topic)
    }

    /// Returns the current members of `topic` (empty for unknown topics).
    pub async fn members_of(&self, topic: &TopicKey) -> HashSet<ConnectionId> {
        self.inner
            .read()
            .await
            .members
            .get(topic)
            .cloned()
            .unwrap_or_default()
    }

    /// Removes `connection` from every topic it belongs to and returns how
    /// many memberships were dropped.
    pub async fn drop_all(&self, connection: ConnectionId) -> usize {
        let mut guard = self.inner.write().await;
        let Some(topics) = guard.subscriptions.remove(&connection) else {
            return 0;
        };
        for topic in &topics {
            if let Some(members) = guard.members.get_mut(topic) {
                members.remove(&connection);
                if members.is_empty() {
                    guard.members.remove(topic);
                }
            }
        }
        topics.len()
    }

    /// Returns the topics `connection` is currently subscribed to.
    pub async fn subscriptions_of(&self, connection: ConnectionId) -> HashSet<TopicKey> {
        self.inner
            .read()
            .await
            .subscriptions
            .get(&connection)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the number of topics `connection` is subscribed to.
    pub async fn subscription_count(&self, connection: ConnectionId) -> usize {
        self.inner
            .read()
            .await
            .subscriptions
            .get(&connection)
            .map_or(0, HashSet::len)
    }

    /// Sum of subscription-set sizes over all connections.
    pub async fn total_subscriptions(&self) -> usize {
        self.inner
            .read()
            .await
            .subscriptions
            .values()
            .map(HashSet::len)
            .sum()
    }

    /// Number of topics with at least one member.
    pub async fn topic_count(&self) -> usize {
        self.inner.read().await.members.len()
    }
}
