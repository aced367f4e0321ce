/// Service wiring shared by the binary and the HTTP tests
use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use crypto_core::TokenService;

use crate::channel::NotificationChannel;
use crate::config::Config;
use crate::db::FeedStore;
use crate::handlers::{self, HealthState};
use crate::metrics::serve_metrics;
use crate::services::{AccountService, FeedService, NotificationService};
use crate::websocket::ConnectionManager;

/// Everything the HTTP layer needs, built once and cloned into each worker
#[derive(Clone)]
pub struct AppServices {
    pub config: web::Data<Config>,
    pub tokens: web::Data<TokenService>,
    pub feed: web::Data<FeedService>,
    pub accounts: web::Data<AccountService>,
    pub connections: web::Data<ConnectionManager>,
    pub health: web::Data<HealthState>,
}

impl AppServices {
    /// `channel` receives published notifications; `connections` is the hub
    /// WebSocket clients subscribe on. In production they are the same hub.
    pub fn new(
        config: Config,
        store: Arc<dyn FeedStore>,
        channel: Arc<dyn NotificationChannel>,
        connections: ConnectionManager,
    ) -> Result<Self, crypto_core::TokenError> {
        let tokens = TokenService::new(
            config.auth.jwt_secret.as_bytes(),
            chrono::Duration::seconds(config.auth.token_ttl_secs),
        )?;

        let store_timeout = Duration::from_millis(config.timeouts.store_timeout_ms);
        let publish_timeout = Duration::from_millis(config.timeouts.publish_timeout_ms);

        let notifications = Arc::new(NotificationService::new(
            store.clone(),
            channel,
            store_timeout,
            publish_timeout,
        ));
        let feed = FeedService::new(
            store.clone(),
            notifications,
            config.feed.clone(),
            store_timeout,
        );
        let accounts = AccountService::new(store.clone(), tokens.clone(), store_timeout);
        let health = HealthState::new(store, store_timeout);

        Ok(Self {
            config: web::Data::new(config),
            tokens: web::Data::new(tokens),
            feed: web::Data::new(feed),
            accounts: web::Data::new(accounts),
            connections: web::Data::new(connections),
            health: web::Data::new(health),
        })
    }

    /// Production wiring: the hub is both the channel and the subscription point
    pub fn with_hub(config: Config, store: Arc<dyn FeedStore>) -> Result<Self, crypto_core::TokenError> {
        let hub = ConnectionManager::new();
        Self::new(config, store, Arc::new(hub.clone()), hub)
    }

    /// Register app data and all routes
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.config.clone())
            .app_data(self.tokens.clone())
            .app_data(self.feed.clone())
            .app_data(self.accounts.clone())
            .app_data(self.connections.clone())
            .app_data(self.health.clone())
            .route("/metrics", web::get().to(serve_metrics))
            .configure(handlers::configure);
    }
}
