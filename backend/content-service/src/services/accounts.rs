/// Account service - pseudonymous registration and profile lookup
use std::sync::Arc;
use std::time::Duration;

use actix_middleware::UserId;
use crypto_core::TokenService;
use serde::Deserialize;
use tracing::info;
use validator::{Validate, ValidationError};

use super::bounded;
use crate::db::{FeedStore, StoreError};
use crate::error::{AppError, Result};
use crate::models::User;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 32, message = "must be 3 to 32 characters"),
        custom(function = "validate_username_chars")
    )]
    pub username: String,

    #[validate(length(max = 64, message = "must be at most 64 characters"))]
    pub display_name: Option<String>,
}

fn validate_username_chars(username: &str) -> std::result::Result<(), ValidationError> {
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(())
    } else {
        let mut err = ValidationError::new("username_chars");
        err.message = Some("may only contain letters, digits and underscores".into());
        Err(err)
    }
}

/// A registered (or returning) user and their fresh token
#[derive(Debug, Clone)]
pub struct Registration {
    pub user: User,
    pub token: String,
}

pub struct AccountService {
    store: Arc<dyn FeedStore>,
    tokens: TokenService,
    store_timeout: Duration,
}

impl AccountService {
    pub fn new(store: Arc<dyn FeedStore>, tokens: TokenService, store_timeout: Duration) -> Self {
        Self {
            store,
            tokens,
            store_timeout,
        }
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        self.tokens.ttl()
    }

    /// Find-or-create by username, then issue a token
    ///
    /// A returning username keeps its stored display name.
    pub async fn register(&self, req: RegisterRequest) -> Result<Registration> {
        req.validate()?;

        let existing = bounded(
            "find_user_by_username",
            self.store_timeout,
            self.store.find_user_by_username(&req.username),
        )
        .await?;

        let user = match existing {
            Some(user) => user,
            None => self.create_user(&req).await?,
        };

        let token = self.tokens.issue(user.id)?;
        info!(user_id = user.id, "token issued");

        Ok(Registration { user, token })
    }

    async fn create_user(&self, req: &RegisterRequest) -> Result<User> {
        let created = with_store_error(
            self.store_timeout,
            self.store
                .create_user(&req.username, req.display_name.as_deref()),
        )
        .await?;

        match created {
            Ok(user) => {
                info!(user_id = user.id, "user registered");
                Ok(user)
            }
            // Lost a registration race for the same name; use the winner's row.
            Err(StoreError::Duplicate(_)) => bounded(
                "find_user_by_username",
                self.store_timeout,
                self.store.find_user_by_username(&req.username),
            )
            .await?
            .ok_or_else(|| AppError::Internal("username conflict without a row".into())),
            Err(other) => Err(other.into()),
        }
    }

    /// Profile of the authenticated caller
    pub async fn me(&self, caller: UserId) -> Result<User> {
        bounded(
            "find_user_by_id",
            self.store_timeout,
            self.store.find_user_by_id(caller.0),
        )
        .await?
        .ok_or(AppError::Unauthorized)
    }
}

/// Like `bounded`, but hands store errors back to the caller for inspection
async fn with_store_error<T, F>(
    limit: Duration,
    fut: F,
) -> Result<std::result::Result<T, StoreError>>
where
    F: std::future::Future<Output = std::result::Result<T, StoreError>>,
{
    bounded("create_user", limit, async { Ok::<_, StoreError>(fut.await) }).await
}
