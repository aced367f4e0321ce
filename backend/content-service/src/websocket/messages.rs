/// WebSocket frames sent to clients
use serde::Serialize;

use crate::channel::NotificationEvent;

/// Tagged by `event` since notification payloads already carry a `type` field
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Connection established confirmation
    Connected { topic: String, timestamp: i64 },

    /// Server pushes a notification to client
    Notification(NotificationEvent),
}

impl ServerMessage {
    pub fn connected(topic: &str) -> Self {
        ServerMessage::Connected {
            topic: topic.to_string(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
