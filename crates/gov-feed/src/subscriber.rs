//! # Feed Subscriber
//!
//! Defines the subscription side of the chain feed.

use crate::events::{ChainNotification, NotificationFilter};
use async_trait::async_trait;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::Stream;
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The feed was closed.
    #[error("Chain feed closed")]
    Closed,
}

/// Trait for subscribing to notifications from the feed.
#[async_trait]
pub trait FeedSubscriber: Send + Sync {
    /// Subscribe to notifications matching a filter.
    fn subscribe(&self, filter: NotificationFilter) -> Subscription;
}

/// A subscription handle for receiving notifications.
///
/// When dropped, the subscription is automatically cleaned up; dropping is
/// how a consumer unsubscribes on teardown or chain switch.
pub struct Subscription {
    /// The broadcast receiver.
    receiver: broadcast::Receiver<ChainNotification>,

    /// Filter for this subscription.
    filter: NotificationFilter,

    /// Reference to subscription tracking (for cleanup).
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,

    /// Topic key for this subscription.
    topic_key: String,
}

impl Subscription {
    /// Create a new subscription.
    pub(crate) fn new(
        receiver: broadcast::Receiver<ChainNotification>,
        filter: NotificationFilter,
        subscriptions: Arc<RwLock<HashMap<String, usize>>>,
        topic_key: String,
    ) -> Self {
        Self {
            receiver,
            filter,
            subscriptions,
            topic_key,
        }
    }

    /// Receive the next notification that matches the filter.
    ///
    /// # Returns
    ///
    /// - `Some(notification)` - The next matching notification
    /// - `None` - The channel was closed (feed dropped)
    pub async fn recv(&mut self) -> Option<ChainNotification> {
        loop {
            let notification = match self.receiver.recv().await {
                Ok(n) => n,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Subscriber lagged, some notifications dropped");
                    continue;
                }
            };

            if self.filter.matches(&notification) {
                return Some(notification);
            }
            // Notification doesn't match filter, continue waiting
        }
    }

    /// Try to receive the next notification without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(notification))` - A notification was available and matched
    /// - `Ok(None)` - Nothing available (would block)
    /// - `Err(SubscriptionError::Closed)` - The channel was closed
    pub fn try_recv(&mut self) -> Result<Option<ChainNotification>, SubscriptionError> {
        loop {
            let notification = match self.receiver.try_recv() {
                Ok(n) => n,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if self.filter.matches(&notification) {
                return Ok(Some(notification));
            }
            // Notification doesn't match filter, try again
        }
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &NotificationFilter {
        &self.filter
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // Decrement subscription count
        let Ok(mut subs) = self.subscriptions.write() else {
            return;
        };
        let Some(count) = subs.get_mut(&self.topic_key) else {
            debug!(topic = %self.topic_key, "Subscription dropped");
            return;
        };

        *count = count.saturating_sub(1);
        if *count == 0 {
            subs.remove(&self.topic_key);
        }
        debug!(topic = %self.topic_key, "Subscription dropped");
    }
}

/// A stream wrapper for subscriptions.
///
/// Implements `tokio_stream::Stream` for use with stream combinators.
pub struct NotificationStream {
    subscription: Subscription,
}

impl NotificationStream {
    /// Create a new notification stream from a subscription.
    #[must_use]
    pub fn new(subscription: Subscription) -> Self {
        Self { subscription }
    }

    /// Get the filter for this stream.
    #[must_use]
    pub fn filter(&self) -> &NotificationFilter {
        self.subscription.filter()
    }
}

impl Stream for NotificationStream {
    type Item = ChainNotification;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // Use try_recv for non-blocking check
        match self.subscription.try_recv() {
            Ok(Some(notification)) => Poll::Ready(Some(notification)),
            Ok(None) => {
                // Nothing ready yet - re-register and wait
                cx.waker().wake_by_ref();
                Poll::Pending
            }
            Err(SubscriptionError::Closed) => Poll::Ready(None),
        }
    }
}
