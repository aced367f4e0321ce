/// Notification service
///
/// Persists a notification record and then pushes it to the recipient's
/// topic. The record is the source of truth; the push is best effort and a
/// failed or slow publish never undoes the write.
use std::sync::Arc;
use std::time::Duration;

use resilience::with_timeout_result;
use tracing::{debug, info, warn};

use super::bounded;
use crate::channel::{user_topic, NotificationChannel, NotificationEvent};
use crate::db::FeedStore;
use crate::error::Result;
use crate::metrics::feed::NOTIFICATIONS_TOTAL;
use crate::models::{NewNotification, Notification, NotificationType};

pub struct NotificationService {
    store: Arc<dyn FeedStore>,
    channel: Arc<dyn NotificationChannel>,
    store_timeout: Duration,
    publish_timeout: Duration,
}

impl NotificationService {
    pub fn new(
        store: Arc<dyn FeedStore>,
        channel: Arc<dyn NotificationChannel>,
        store_timeout: Duration,
        publish_timeout: Duration,
    ) -> Self {
        Self {
            store,
            channel,
            store_timeout,
            publish_timeout,
        }
    }

    /// Notify `recipient_id` that `actor_id` acted on their content
    ///
    /// Returns `Ok(None)` without touching storage or the channel when the
    /// actor is the recipient. Only a persistence failure is an error.
    ///
    /// Publishing happens inline on the caller's task, so events keep commit
    /// order only for actions that run one after another. Two concurrent
    /// actions on the same recipient may publish in either order.
    pub async fn notify(
        &self,
        recipient_id: i64,
        actor_id: i64,
        kind: NotificationType,
        post_id: Option<i64>,
    ) -> Result<Option<Notification>> {
        if recipient_id == actor_id {
            NOTIFICATIONS_TOTAL
                .with_label_values(&[kind.as_str(), "skipped_self"])
                .inc();
            return Ok(None);
        }

        let new = NewNotification {
            user_id: recipient_id,
            actor_id,
            kind,
            post_id,
        };

        let notification = bounded(
            "create_notification",
            self.store_timeout,
            self.store.create_notification(&new),
        )
        .await
        .map_err(|e| {
            NOTIFICATIONS_TOTAL
                .with_label_values(&[kind.as_str(), "persist_failed"])
                .inc();
            e
        })?;

        info!(
            notification_id = notification.id,
            recipient_id,
            actor_id,
            kind = %kind,
            "notification created"
        );

        self.publish(&notification).await;

        Ok(Some(notification))
    }

    async fn publish(&self, notification: &Notification) {
        let topic = user_topic(notification.user_id);
        let event = NotificationEvent::from(notification);
        let kind = notification.kind.as_str();

        match with_timeout_result(self.publish_timeout, self.channel.publish(&topic, &event)).await
        {
            Ok(()) => {
                NOTIFICATIONS_TOTAL
                    .with_label_values(&[kind, "published"])
                    .inc();
                debug!(topic = %topic, notification_id = notification.id, "notification published");
            }
            Err(err) => {
                let outcome = if err.is_elapsed() {
                    "channel_timeout"
                } else {
                    "channel_failed"
                };
                NOTIFICATIONS_TOTAL.with_label_values(&[kind, outcome]).inc();
                warn!(
                    topic = %topic,
                    notification_id = notification.id,
                    error = %err,
                    "notification publish failed, record kept"
                );
            }
        }
    }
}
