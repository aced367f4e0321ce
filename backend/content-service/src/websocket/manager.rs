/// WebSocket Connection Manager
///
/// Routes notification events to the live connection subscribed on each
/// topic. A topic holds at most one subscriber: a new subscription replaces
/// the previous one, whose stream then ends.
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};

use crate::channel::{ChannelError, NotificationChannel, NotificationEvent};

/// Events buffered per connection before publishes start failing
pub const SUBSCRIBER_QUEUE_CAPACITY: usize = 64;

/// Type alias for the event sender held per topic
pub type EventSender = mpsc::Sender<NotificationEvent>;

/// Type alias for the receiving half handed to a connection
pub type EventReceiver = mpsc::Receiver<NotificationEvent>;

struct Subscriber {
    id: u64,
    sender: EventSender,
}

/// Handle returned by [`ConnectionManager::subscribe`]
pub struct Subscription {
    pub id: u64,
    pub topic: String,
    pub receiver: EventReceiver,
}

/// Manages active subscriptions
#[derive(Clone, Default)]
pub struct ConnectionManager {
    /// topic -> current subscriber
    topics: Arc<RwLock<HashMap<String, Subscriber>>>,
    next_id: Arc<AtomicU64>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a topic, replacing any existing subscriber
    pub async fn subscribe(&self, topic: &str) -> Subscription {
        let (sender, receiver) = mpsc::channel(SUBSCRIBER_QUEUE_CAPACITY);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;

        let replaced = self
            .topics
            .write()
            .await
            .insert(topic.to_string(), Subscriber { id, sender });

        if let Some(previous) = replaced {
            tracing::info!(
                topic = %topic,
                previous_subscription = previous.id,
                subscription = id,
                "replacing existing subscriber"
            );
        }

        Subscription {
            id,
            topic: topic.to_string(),
            receiver,
        }
    }

    /// Remove a subscription if it is still the current one for its topic
    ///
    /// Returns whether anything was removed. A stale id (already replaced by
    /// a newer connection) leaves the topic untouched.
    pub async fn unsubscribe(&self, topic: &str, subscription_id: u64) -> bool {
        let mut topics = self.topics.write().await;
        match topics.get(topic) {
            Some(current) if current.id == subscription_id => {
                topics.remove(topic);
                true
            }
            _ => false,
        }
    }

    pub async fn is_subscribed(&self, topic: &str) -> bool {
        self.topics.read().await.contains_key(topic)
    }

    /// Get the number of topics with a live subscriber
    pub async fn subscriber_count(&self) -> usize {
        self.topics.read().await.len()
    }
}

#[async_trait]
impl NotificationChannel for ConnectionManager {
    /// Never waits on the subscriber: a full queue fails with `Unavailable`.
    async fn publish(&self, topic: &str, event: &NotificationEvent) -> Result<(), ChannelError> {
        let stale = {
            let topics = self.topics.read().await;
            match topics.get(topic) {
                None => {
                    tracing::debug!(topic = %topic, "no live subscriber, event not pushed");
                    return Ok(());
                }
                Some(subscriber) => match subscriber.sender.try_send(event.clone()) {
                    Ok(()) => return Ok(()),
                    Err(TrySendError::Full(_)) => {
                        tracing::warn!(topic = %topic, "subscriber queue full, event dropped");
                        return Err(ChannelError::Unavailable(format!(
                            "{topic} queue is full"
                        )));
                    }
                    Err(TrySendError::Closed(_)) => subscriber.id,
                },
            }
        };

        // Receiver dropped without unsubscribing; prune it.
        self.unsubscribe(topic, stale).await;
        Err(ChannelError::SubscriberGone(topic.to_string()))
    }
}
