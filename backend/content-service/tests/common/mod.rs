//! Shared fixtures for content-service integration tests
#![allow(dead_code)]

pub mod mock_store;
pub mod recording_channel;
pub mod server;

use content_service::config::{Config, FeedConfig};
use content_service::services::{FeedService, NotificationService};
use crypto_core::TokenService;
use std::sync::Arc;
use std::time::Duration;

pub use mock_store::InMemoryFeedStore;
pub use recording_channel::RecordingChannel;
pub use server::start_server;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789";
pub const STORE_TIMEOUT: Duration = Duration::from_millis(200);
pub const PUBLISH_TIMEOUT: Duration = Duration::from_millis(50);

/// Small limits keep pagination tests short
pub fn feed_limits() -> FeedConfig {
    FeedConfig {
        post_max_length: 280,
        comment_max_length: 140,
        default_page_limit: 5,
        max_page_limit: 10,
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| {
        let value = match key {
            "DATABASE_URL" => "postgres://unused",
            "JWT_SECRET" => TEST_SECRET,
            "POST_MAX_LENGTH" => "280",
            "COMMENT_MAX_LENGTH" => "140",
            "FEED_DEFAULT_LIMIT" => "5",
            "FEED_MAX_LIMIT" => "10",
            "STORE_TIMEOUT_MS" => "200",
            "PUBLISH_TIMEOUT_MS" => "50",
            _ => return None,
        };
        Some(value.to_string())
    })
    .expect("test config should load")
}

/// A valid token for `user_id` under the test secret
pub fn token_for(user_id: i64) -> String {
    TokenService::new(TEST_SECRET.as_bytes(), chrono::Duration::hours(1))
        .and_then(|tokens| tokens.issue(user_id))
        .expect("test token should issue")
}

/// Services wired over the in-memory store and a recording channel
pub struct Harness {
    pub store: InMemoryFeedStore,
    pub channel: RecordingChannel,
    pub notifications: Arc<NotificationService>,
    pub feed: FeedService,
}

pub fn harness() -> Harness {
    let store = InMemoryFeedStore::new();
    let channel = RecordingChannel::new();

    let notifications = Arc::new(NotificationService::new(
        Arc::new(store.clone()),
        Arc::new(channel.clone()),
        STORE_TIMEOUT,
        PUBLISH_TIMEOUT,
    ));
    let feed = FeedService::new(
        Arc::new(store.clone()),
        notifications.clone(),
        feed_limits(),
        STORE_TIMEOUT,
    );

    Harness {
        store,
        channel,
        notifications,
        feed,
    }
}
