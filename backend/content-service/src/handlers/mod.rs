/// HTTP handlers for the feed API
///
/// - Posts: create, like toggle
/// - Feed: paginated listing with search
/// - Comments: add a comment
/// - Users: registration and current profile
/// - Notifications: WebSocket stream
/// - Health: liveness and readiness
use actix_web::{web, HttpRequest};

use crate::error::AppError;

pub mod comments;
pub mod feed;
pub mod health;
pub mod notifications;
pub mod posts;
pub mod users;

// Re-export handler functions at module level
pub use comments::create_comment;
pub use feed::list_posts;
pub use health::{liveness_check, readiness_check, HealthState};
pub use notifications::notification_stream;
pub use posts::{create_post, toggle_like};
pub use users::{me, register};

/// Malformed JSON bodies become field-level validation errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req: &HttpRequest| {
            AppError::validation("body", err.to_string()).into()
        })
}

/// Register the `/api` routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/api")
            .route("/health", web::get().to(liveness_check))
            .route("/health/ready", web::get().to(readiness_check))
            .route("/users/register", web::post().to(register))
            .route("/me", web::get().to(me))
            .route("/posts", web::post().to(create_post))
            .route("/posts", web::get().to(list_posts))
            .route("/posts/{id}/like", web::post().to(toggle_like))
            .route("/posts/{id}/comments", web::post().to(create_comment))
            .route("/notifications/ws", web::get().to(notification_stream)),
    );
}
