//! # Gov Feed - Chain Notification Feed
//!
//! In-process stand-in for a provider's event subscription surface. The
//! governor and timelock contracts emit notifications, block headers arrive
//! as they are mined, and subscribers receive whatever matches their filter.
//!
//! ## Delivery model
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Chain source │                    │  Subscriber  │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Chain feed  │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! The feed guarantees nothing about ordering or uniqueness: a re-established
//! subscription may redeliver historical notifications as if live, and
//! independent notifications may arrive in any order. Consumers that care
//! (the mirror does) must filter and fold accordingly.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{ChainNotification, NotificationFilter, NotificationTopic};
pub use publisher::{ChainFeed, FeedPublisher};
pub use subscriber::{FeedSubscriber, NotificationStream, Subscription, SubscriptionError};

/// Maximum notifications to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
