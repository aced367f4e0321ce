/// Content Service Library
///
/// Social feed backend: pseudonymous registration, posts, cursor-paginated
/// search, like toggling, comments, and real-time notifications.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: Rows and response shapes
/// - `services`: Business logic layer
/// - `db`: Store trait and Postgres repositories
/// - `channel`: Notification publish contract
/// - `websocket`: In-process topic hub and WebSocket sessions
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod app;
pub mod channel;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod services;
pub mod websocket;

pub use app::AppServices;
pub use config::Config;
pub use error::{AppError, Result};
