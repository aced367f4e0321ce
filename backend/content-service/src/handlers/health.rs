/// Health endpoints
use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::{web, HttpResponse};

use crate::db::FeedStore;
use crate::services::bounded;

/// Dependencies probed by readiness
pub struct HealthState {
    store: Arc<dyn FeedStore>,
    timeout: Duration,
}

impl HealthState {
    pub fn new(store: Arc<dyn FeedStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }
}

pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "content-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn readiness_check(state: web::Data<HealthState>) -> HttpResponse {
    let start = Instant::now();
    let result = bounded("ping", state.timeout, state.store.ping()).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "ready": true,
            "checks": { "database": { "status": "healthy", "latency_ms": latency_ms } }
        })),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "ready": false,
                "checks": { "database": { "status": "unhealthy", "latency_ms": latency_ms } }
            }))
        }
    }
}
