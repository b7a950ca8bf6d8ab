//! # Feed Publisher
//!
//! Defines the publishing side of the chain feed.

use crate::events::{ChainNotification, NotificationFilter};
use crate::subscriber::{FeedSubscriber, NotificationStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Trait for publishing notifications to the feed.
///
/// This is the interface a chain source (or a simulated chain in tests)
/// uses to emit notifications for consumption by subscribers.
#[async_trait]
pub trait FeedPublisher: Send + Sync {
    /// Publish a notification to the feed.
    ///
    /// # Returns
    ///
    /// The number of active subscribers that received the notification.
    async fn publish(&self, notification: ChainNotification) -> usize;

    /// Get the total number of notifications published.
    fn notifications_published(&self) -> u64;
}

/// In-memory implementation of the chain feed.
///
/// Uses `tokio::sync::broadcast` for multi-producer, multi-consumer
/// semantics. Suitable for a single process; a deployment against a real
/// chain would put an RPC subscription behind the same trait.
pub struct ChainFeed {
    /// Broadcast sender for notifications.
    sender: broadcast::Sender<ChainNotification>,

    /// Active subscription count by topic.
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,

    /// Total notifications published.
    notifications_published: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl ChainFeed {
    /// Create a new in-memory feed with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new in-memory feed with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            notifications_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to notifications matching a filter.
    ///
    /// Returns a `Subscription` handle that can be used to receive them.
    #[must_use]
    pub fn subscribe(&self, filter: NotificationFilter) -> Subscription {
        let receiver = self.sender.subscribe();
        let topic_key = format!("{:?}", filter.topics);

        // Track subscription
        {
            if let Ok(mut subs) = self.subscriptions.write() {
                *subs.entry(topic_key.clone()).or_insert(0) += 1;
            }
        }

        debug!(topics = ?filter.topics, "New subscription created");

        Subscription::new(receiver, filter, self.subscriptions.clone(), topic_key)
    }

    /// Get a stream of notifications matching a filter.
    ///
    /// This is a convenience method that returns a `NotificationStream`.
    #[must_use]
    pub fn notification_stream(&self, filter: NotificationFilter) -> NotificationStream {
        NotificationStream::new(self.subscribe(filter))
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ChainFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedSubscriber for ChainFeed {
    fn subscribe(&self, filter: NotificationFilter) -> Subscription {
        ChainFeed::subscribe(self, filter)
    }
}

#[async_trait]
impl FeedPublisher for ChainFeed {
    async fn publish(&self, notification: ChainNotification) -> usize {
        let topic = notification.topic();
        let height = notification.block_number();

        // Always increment counter (publish was attempted)
        self.notifications_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(notification) {
            Ok(receiver_count) => {
                debug!(
                    topic = ?topic,
                    height,
                    receivers = receiver_count,
                    "Notification published"
                );
                receiver_count
            }
            Err(e) => {
                // No receivers - notification is dropped
                warn!(
                    topic = ?topic,
                    height,
                    error = %e,
                    "Notification dropped (no receivers)"
                );
                0
            }
        }
    }

    fn notifications_published(&self) -> u64 {
        self.notifications_published.load(Ordering::Relaxed)
    }
}
