//! Identity token issuance and validation
//!
//! Tokens are compact JWTs signed with HS256 over a shared secret. The subject
//! claim carries the numeric user id; `iat`/`exp` bound the token lifetime.
//!
//! ## Security Design
//!
//! - **Pinned algorithm**: validation only accepts HS256, so a token signed with
//!   any other algorithm (including `none`) is rejected
//! - **No hardcoded keys**: the secret is handed in by the caller at startup
//! - **Zero leeway**: a token is expired the second its `exp` passes
//! - **Storage-free**: validation never looks up the user; callers decide what
//!   a verified id means
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Duration;
//! use crypto_core::jwt::TokenService;
//!
//! let tokens = TokenService::new(b"a-sufficiently-long-secret", Duration::days(7)).unwrap();
//! let token = tokens.issue(42).unwrap();
//! assert_eq!(tokens.verify(&token).unwrap(), 42);
//! ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// JWT algorithm accepted by this service
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Minimum accepted secret length in bytes
pub const MIN_SECRET_LEN: usize = 16;

// ============================================================================
// Data Structures
// ============================================================================

/// JWT claims carried by identity tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user id as decimal string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Token errors
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Signature mismatch, malformed token, wrong algorithm or expired token.
    #[error("Invalid token")]
    InvalidToken,

    #[error("JWT secret must be at least {MIN_SECRET_LEN} bytes")]
    WeakSecret,

    #[error("Token lifetime must be positive")]
    InvalidLifetime,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

// ============================================================================
// Token Service
// ============================================================================

/// Issues and verifies identity tokens.
///
/// A pure function of the secret and the configured lifetime; cheap to clone
/// and safe to share between worker threads.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Build a token service from an HMAC secret and a token lifetime.
    ///
    /// ## Errors
    ///
    /// - `WeakSecret` when the secret is shorter than [`MIN_SECRET_LEN`]
    /// - `InvalidLifetime` when `ttl` is zero or negative
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, TokenError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(TokenError::WeakSecret);
        }
        if ttl <= Duration::zero() {
            return Err(TokenError::InvalidLifetime);
        }

        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    /// Configured token lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user_id`, valid from now for the configured lifetime.
    pub fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if it had been created at `issued_at`.
    pub fn issue_at(&self, user_id: i64, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and return the user id it was issued for.
    ///
    /// Every failure mode collapses into `InvalidToken`; the underlying reason
    /// is only logged at debug level.
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "token validation failed");
            TokenError::InvalidToken
        })?;

        data.claims.sub.parse::<i64>().map_err(|e| {
            tracing::debug!(error = %e, "token subject is not a user id");
            TokenError::InvalidToken
        })
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &JWT_ALGORITHM)
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &[u8] = b"test-secret-for-unit-tests-only";

    fn service() -> TokenService {
        TokenService::new(TEST_SECRET, Duration::hours(1)).expect("valid test config")
    }

    #[test]
    fn test_issue_produces_three_part_jwt() {
        let token = service().issue(7).unwrap();
        assert_eq!(token.matches('.').count(), 2);
    }

    #[test]
    fn test_claims_carry_configured_lifetime() {
        let svc = service();
        let now = Utc::now();
        let token = svc.issue_at(7, now).unwrap();

        let data = decode::<Claims>(&token, &svc.decoding_key, &svc.validation).unwrap();
        assert_eq!(data.claims.sub, "7");
        assert_eq!(data.claims.iat, now.timestamp());
        assert_eq!(data.claims.exp - data.claims.iat, 3600);
    }

    #[test]
    fn test_rejects_short_secret() {
        let result = TokenService::new(b"short", Duration::hours(1));
        assert!(matches!(result, Err(TokenError::WeakSecret)));
    }

    #[test]
    fn test_rejects_non_positive_lifetime() {
        let result = TokenService::new(TEST_SECRET, Duration::zero());
        assert!(matches!(result, Err(TokenError::InvalidLifetime)));
    }

    #[test]
    fn test_rejects_non_numeric_subject() {
        let svc = service();
        let claims = Claims {
            sub: "not-a-number".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode(&Header::new(JWT_ALGORITHM), &claims, &svc.encoding_key).unwrap();

        assert!(matches!(svc.verify(&token), Err(TokenError::InvalidToken)));
    }

    #[test]
    fn test_rejects_other_algorithm_with_same_secret() {
        let svc = service();
        let claims = Claims {
            sub: "7".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET),
        )
        .unwrap();

        assert!(matches!(svc.verify(&token), Err(TokenError::InvalidToken)));
    }

    #[test]
    fn test_debug_does_not_print_secret() {
        let rendered = format!("{:?}", service());
        assert!(!rendered.contains("test-secret"));
        assert!(rendered.contains("ttl_secs"));
    }
}
