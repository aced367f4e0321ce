//! Auth gate
//!
//! Resolves the caller's identity from the token the transport hands over and
//! returns it as a plain value. Nothing is written into request extensions;
//! handlers receive a [`UserId`] (or `Option<UserId>`) and pass it explicitly
//! into service calls.
//!
//! The credential is read from the `token` cookie first and from an
//! `Authorization: Bearer` header second.

use actix_web::{
    dev::Payload, http::header, http::StatusCode, web, FromRequest, HttpRequest, HttpResponse,
    ResponseError,
};
use crypto_core::jwt::TokenService;
use futures::future::{ready, Ready};
use serde::Serialize;
use std::fmt;

/// Cookie carrying the identity token
pub const TOKEN_COOKIE: &str = "token";

/// Authenticated user id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller identity for routes that work with or without a token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionalUserId(pub Option<UserId>);

impl OptionalUserId {
    pub fn into_inner(self) -> Option<UserId> {
        self.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Unauthorized")]
    MissingCredential,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token service not configured")]
    NotConfigured,
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredential | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            AuthError::NotConfigured => "Internal server error".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(status).json(serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        }))
    }
}

/// Require a verified identity.
///
/// Fails with `MissingCredential` when no token was supplied and with
/// `InvalidToken` when verification fails.
pub fn require_identity(
    tokens: &TokenService,
    credential: Option<&str>,
) -> Result<UserId, AuthError> {
    let token = credential
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingCredential)?;

    tokens.verify(token).map(UserId).map_err(|e| {
        tracing::debug!(error = %e, "rejecting request with invalid token");
        AuthError::InvalidToken
    })
}

/// Resolve an identity if one is present and valid, otherwise stay anonymous.
pub fn optional_identity(tokens: &TokenService, credential: Option<&str>) -> Option<UserId> {
    require_identity(tokens, credential).ok()
}

/// Pull the raw token out of the request: cookie first, then bearer header.
pub fn extract_credential(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(TOKEN_COOKIE) {
        let value = cookie.value().trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn token_service(req: &HttpRequest) -> Result<&TokenService, AuthError> {
    req.app_data::<web::Data<TokenService>>()
        .map(|data| data.get_ref())
        .ok_or_else(|| {
            tracing::error!("TokenService missing from app data");
            AuthError::NotConfigured
        })
}

impl FromRequest for UserId {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = token_service(req).and_then(|tokens| {
            let credential = extract_credential(req);
            require_identity(tokens, credential.as_deref())
        });
        ready(result)
    }
}

impl FromRequest for OptionalUserId {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = token_service(req).map(|tokens| {
            let credential = extract_credential(req);
            OptionalUserId(optional_identity(tokens, credential.as_deref()))
        });
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;
    use chrono::{Duration, Utc};

    fn tokens() -> TokenService {
        TokenService::new(b"gate-test-secret-0123456789", Duration::hours(1)).unwrap()
    }

    #[test]
    fn test_require_identity_accepts_valid_token() {
        let svc = tokens();
        let token = svc.issue(9).unwrap();
        assert_eq!(require_identity(&svc, Some(&token)).unwrap(), UserId(9));
    }

    #[test]
    fn test_require_identity_rejects_missing_and_blank() {
        let svc = tokens();
        assert!(matches!(
            require_identity(&svc, None),
            Err(AuthError::MissingCredential)
        ));
        assert!(matches!(
            require_identity(&svc, Some("  ")),
            Err(AuthError::MissingCredential)
        ));
    }

    #[test]
    fn test_require_identity_rejects_expired_token() {
        let svc = tokens();
        let token = svc.issue_at(9, Utc::now() - Duration::hours(2)).unwrap();
        assert!(matches!(
            require_identity(&svc, Some(&token)),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_optional_identity_swallows_failures() {
        let svc = tokens();
        assert_eq!(optional_identity(&svc, None), None);
        assert_eq!(optional_identity(&svc, Some("garbage")), None);

        let token = svc.issue(4).unwrap();
        assert_eq!(optional_identity(&svc, Some(&token)), Some(UserId(4)));
    }

    #[test]
    fn test_extract_credential_prefers_cookie() {
        let req = TestRequest::default()
            .cookie(Cookie::new(TOKEN_COOKIE, "from-cookie"))
            .insert_header((header::AUTHORIZATION, "Bearer from-header"))
            .to_http_request();
        assert_eq!(extract_credential(&req).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_extract_credential_falls_back_to_bearer() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer from-header"))
            .to_http_request();
        assert_eq!(extract_credential(&req).as_deref(), Some("from-header"));

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic abc"))
            .to_http_request();
        assert_eq!(extract_credential(&req), None);
    }

    #[actix_rt::test]
    async fn test_user_id_extractor() {
        let svc = tokens();
        let token = svc.issue(12).unwrap();

        let req = TestRequest::default()
            .app_data(web::Data::new(svc.clone()))
            .cookie(Cookie::new(TOKEN_COOKIE, token))
            .to_http_request();
        assert_eq!(UserId::extract(&req).await.unwrap(), UserId(12));

        let anonymous = TestRequest::default()
            .app_data(web::Data::new(svc))
            .to_http_request();
        let err = UserId::extract(&anonymous).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_optional_extractor_stays_anonymous_on_bad_token() {
        let req = TestRequest::default()
            .app_data(web::Data::new(tokens()))
            .cookie(Cookie::new(TOKEN_COOKIE, "not-a-jwt"))
            .to_http_request();

        assert_eq!(OptionalUserId::extract(&req).await.unwrap(), OptionalUserId(None));
    }

    #[actix_rt::test]
    async fn test_extractor_without_token_service_is_server_error() {
        let req = TestRequest::default().to_http_request();
        let err = UserId::extract(&req).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
