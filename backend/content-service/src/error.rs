/// Error types for Content Service
///
/// Every failure a feed operation can surface, and how it renders over HTTP.
/// Internal and database errors are logged here and rendered with a generic
/// body so store details never reach clients.
use actix_web::{error::ResponseError, http::header, http::StatusCode, HttpResponse};

use crate::db::StoreError;

/// Result type for content-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Caller is not authenticated, or the token names an unknown account
    #[error("Unauthorized")]
    Unauthorized,

    /// Input failed a precondition; `field` names the offending input
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Store did not answer within its bound; safe to retry
    #[error("Store timed out during {0}")]
    TransientStore(&'static str),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str) -> Self {
        AppError::NotFound(format!("{resource} not found"))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::TransientStore(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match self {
            AppError::Validation { field, message } => {
                HttpResponse::build(status).json(serde_json::json!({
                    "error": message,
                    "field": field,
                    "status": status.as_u16(),
                }))
            }
            AppError::TransientStore(_) => HttpResponse::build(status)
                .insert_header((header::RETRY_AFTER, "1"))
                .json(serde_json::json!({
                    "error": "Service temporarily unavailable",
                    "status": status.as_u16(),
                })),
            AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                HttpResponse::build(status).json(serde_json::json!({
                    "error": "Internal server error",
                    "status": status.as_u16(),
                }))
            }
            _ => HttpResponse::build(status).json(serde_json::json!({
                "error": self.to_string(),
                "status": status.as_u16(),
            })),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MissingReference(what) => AppError::NotFound(what),
            other => AppError::Database(other.to_string()),
        }
    }
}

impl From<crypto_core::TokenError> for AppError {
    fn from(err: crypto_core::TokenError) -> Self {
        AppError::Internal(format!("token issue failed: {err}"))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Report the first offending field in a stable (alphabetical) order.
        let first = errors
            .field_errors()
            .into_iter()
            .min_by_key(|(field, _)| *field);

        match first {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| format!("{field} is invalid"));
                AppError::Validation { field, message }
            }
            None => AppError::validation("body", "invalid request"),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
