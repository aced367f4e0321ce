//! NotificationChannel that records what was published

use async_trait::async_trait;
use content_service::channel::{ChannelError, NotificationChannel, NotificationEvent};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Default)]
pub struct RecordingChannel {
    published: Arc<Mutex<Vec<(String, NotificationEvent)>>>,
    attempts: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    /// Successfully delivered (topic, event) pairs, in publish order
    pub fn published(&self) -> Vec<(String, NotificationEvent)> {
        self.published.lock().unwrap().clone()
    }

    /// Publish calls including failed ones
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    async fn publish(&self, topic: &str, event: &NotificationEvent) -> Result<(), ChannelError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(ChannelError::Unavailable("hub offline".into()));
        }

        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), event.clone()));
        Ok(())
    }
}
