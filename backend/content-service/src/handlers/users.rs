/// User handlers - registration and current profile
use actix_middleware::{UserId, TOKEN_COOKIE};
use actix_web::cookie::{time, Cookie, SameSite};
use actix_web::{web, HttpResponse};

use crate::config::Config;
use crate::error::Result;
use crate::models::{ProfileResponse, UserResponse};
use crate::services::{AccountService, RegisterRequest};

/// Register (or sign back in) by username; sets the token cookie
pub async fn register(
    accounts: web::Data<AccountService>,
    config: web::Data<Config>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let registration = accounts.register(req.into_inner()).await?;

    let cookie = Cookie::build(TOKEN_COOKIE, registration.token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.app.is_production())
        .max_age(time::Duration::seconds(accounts.token_ttl().num_seconds()))
        .finish();

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(UserResponse::from(&registration.user)))
}

/// Current user's profile
pub async fn me(accounts: web::Data<AccountService>, user_id: UserId) -> Result<HttpResponse> {
    let user = accounts.me(user_id).await?;
    Ok(HttpResponse::Ok().json(ProfileResponse::from(user)))
}
