/// Business logic layer for content-service
///
/// - Feed service: post creation, filtered pagination, like toggling, comments
/// - Notification service: persist then publish per-user events
/// - Account service: find-or-create registration and profile lookup
/// - Query parser: keyword/hashtag extraction for feed search
use std::future::Future;
use std::time::Duration;

use resilience::{with_timeout_result, TimeoutError};

use crate::db::StoreResult;
use crate::error::{AppError, Result};
use crate::metrics::feed::STORE_TIMEOUTS_TOTAL;

pub mod accounts;
pub mod feed;
pub mod notifications;
pub mod query_parser;

// Re-export commonly used services
pub use accounts::{AccountService, RegisterRequest};
pub use feed::{FeedService, ListPostsParams};
pub use notifications::NotificationService;

/// Run a store call under a timeout
///
/// An elapsed timeout is counted and surfaces as the retryable
/// `AppError::TransientStore`; store errors convert as usual.
pub async fn bounded<T, F>(operation: &'static str, limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = StoreResult<T>>,
{
    with_timeout_result(limit, fut).await.map_err(|err| match err {
        TimeoutError::Elapsed(_) => {
            STORE_TIMEOUTS_TOTAL.with_label_values(&[operation]).inc();
            AppError::TransientStore(operation)
        }
        TimeoutError::Operation(store_err) => store_err.into(),
    })
}

/// Post ids are positive integers
pub fn validate_post_id(post_id: i64) -> Result<i64> {
    if post_id > 0 {
        Ok(post_id)
    } else {
        Err(AppError::validation("postId", "must be a positive integer"))
    }
}

/// Parse a post id taken from a path segment
pub fn parse_post_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::validation("postId", "must be a positive integer"))
        .and_then(validate_post_id)
}

/// Non-blank after trimming and at most `max` characters
pub fn validate_content(field: &'static str, content: &str, max: usize) -> Result<()> {
    if content.trim().is_empty() {
        return Err(AppError::validation(field, "must not be empty"));
    }
    if content.chars().count() > max {
        return Err(AppError::validation(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(())
}
