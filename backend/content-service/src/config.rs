/// Configuration management for Content Service
///
/// Loads configuration from environment variables (a `.env` file is honoured
/// by `main` through `dotenvy` before this runs).
use anyhow::{bail, Context, Result};
use std::fmt;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Token configuration
    pub auth: AuthConfig,
    /// Feed limits
    pub feed: FeedConfig,
    /// I/O bounds
    pub timeouts: TimeoutsConfig,
}

/// Application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

/// Token configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for identity tokens
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub token_ttl_secs: i64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

/// Content and pagination limits
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub post_max_length: usize,
    pub comment_max_length: usize,
    pub default_page_limit: i64,
    pub max_page_limit: i64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            post_max_length: default_post_max_length(),
            comment_max_length: default_comment_max_length(),
            default_page_limit: default_page_limit(),
            max_page_limit: default_max_page_limit(),
        }
    }
}

/// Bounds on calls that cross an I/O boundary
#[derive(Debug, Clone)]
pub struct TimeoutsConfig {
    pub store_timeout_ms: u64,
    pub publish_timeout_ms: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: default_store_timeout_ms(),
            publish_timeout_ms: default_publish_timeout_ms(),
        }
    }
}

// Default values
fn default_port() -> u16 {
    4000
}

fn default_max_connections() -> u32 {
    20
}

fn default_token_ttl_secs() -> i64 {
    7 * 24 * 60 * 60
}

fn default_post_max_length() -> usize {
    500
}

fn default_comment_max_length() -> usize {
    500
}

fn default_page_limit() -> i64 {
    20
}

fn default_max_page_limit() -> i64 {
    50
}

fn default_store_timeout_ms() -> u64 {
    5_000
}

fn default_publish_timeout_ms() -> u64 {
    500
}

/// Minimum JWT secret length accepted at startup
const MIN_JWT_SECRET_LEN: usize = crypto_core::jwt::MIN_SECRET_LEN;

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key} is not valid: {e}")),
        None => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app = AppConfig {
            env: lookup("APP_ENV").unwrap_or_else(|| "development".to_string()),
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", default_port())?,
        };

        let cors = CorsConfig {
            allowed_origins: lookup("CORS_ORIGIN")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
        };

        let database = DatabaseConfig {
            url: lookup("DATABASE_URL").context("DATABASE_URL environment variable not set")?,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", default_max_connections())?,
        };

        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET environment variable not set")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            bail!("JWT_SECRET must be a sufficiently long secret (at least {MIN_JWT_SECRET_LEN} bytes)");
        }
        let token_ttl_secs = parse_or(&lookup, "TOKEN_TTL_SECS", default_token_ttl_secs())?;
        if token_ttl_secs <= 0 {
            bail!("TOKEN_TTL_SECS must be positive");
        }
        let auth = AuthConfig {
            jwt_secret,
            token_ttl_secs,
        };

        let feed = FeedConfig {
            post_max_length: parse_or(&lookup, "POST_MAX_LENGTH", default_post_max_length())?,
            comment_max_length: parse_or(
                &lookup,
                "COMMENT_MAX_LENGTH",
                default_comment_max_length(),
            )?,
            default_page_limit: parse_or(&lookup, "FEED_DEFAULT_LIMIT", default_page_limit())?,
            max_page_limit: parse_or(&lookup, "FEED_MAX_LIMIT", default_max_page_limit())?,
        };
        if feed.max_page_limit < 1 {
            bail!("FEED_MAX_LIMIT must be at least 1");
        }
        if feed.default_page_limit < 1 || feed.default_page_limit > feed.max_page_limit {
            bail!("FEED_DEFAULT_LIMIT must be between 1 and FEED_MAX_LIMIT");
        }
        if feed.post_max_length == 0 || feed.comment_max_length == 0 {
            bail!("POST_MAX_LENGTH and COMMENT_MAX_LENGTH must be positive");
        }

        let timeouts = TimeoutsConfig {
            store_timeout_ms: parse_or(&lookup, "STORE_TIMEOUT_MS", default_store_timeout_ms())?,
            publish_timeout_ms: parse_or(
                &lookup,
                "PUBLISH_TIMEOUT_MS",
                default_publish_timeout_ms(),
            )?,
        };

        Ok(Config {
            app,
            cors,
            database,
            auth,
            feed,
            timeouts,
        })
    }
}
