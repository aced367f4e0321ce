//! Real-time notification delivery contract
//!
//! Notifications are published to per-user topics. The channel makes no
//! delivery guarantee: a recipient with no live subscriber simply misses the
//! event, which is still persisted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Notification, NotificationType};

/// Topic a user's live connection subscribes to
pub fn user_topic(user_id: i64) -> String {
    format!("user:{user_id}")
}

/// Payload pushed to subscribers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub actor_id: i64,
    pub post_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<&Notification> for NotificationEvent {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id,
            kind: n.kind,
            actor_id: n.actor_id,
            post_id: n.post_id,
            created_at: n.created_at,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ChannelError {
    #[error("subscriber on {0} has disconnected")]
    SubscriberGone(String),

    #[error("channel unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Hand an event to whoever listens on `topic`. Must not block on slow
    /// consumers.
    async fn publish(&self, topic: &str, event: &NotificationEvent) -> Result<(), ChannelError>;
}
