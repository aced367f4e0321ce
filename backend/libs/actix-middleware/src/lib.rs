//! # Actix Middleware Library
//!
//! Shared actix-web building blocks for the feed backend
//!
//! ## Modules
//! - `jwt_auth`: auth gate (`require_identity` / `optional_identity`) and the
//!   `UserId` / `OptionalUserId` extractors built on it
//! - `metrics`: Prometheus request metrics middleware

pub mod jwt_auth;
pub mod metrics;

pub use jwt_auth::{
    extract_credential, optional_identity, require_identity, AuthError, OptionalUserId, UserId,
    TOKEN_COOKIE,
};
pub use metrics::MetricsMiddleware;
