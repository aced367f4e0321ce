//! Resilience patterns for the feed backend
//!
//! Every call that crosses an I/O boundary (storage, real-time channel) is
//! bounded by a timeout. A timeout surfaces as [`TimeoutError::Elapsed`], which
//! callers map to a retryable error; there is no automatic retry.
//!
//! # Example: Database Query with Timeout
//!
//! ```rust,no_run
//! use resilience::{timeout::with_timeout_result, TimeoutConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = TimeoutConfig::from_millis(5_000);
//!
//!     let result = with_timeout_result(config.duration, async {
//!         // Your database query
//!         Ok::<_, String>(())
//!     })
//!     .await;
//! }
//! ```

pub mod timeout;

pub use timeout::{with_timeout_result, TimeoutConfig, TimeoutError};
