/// Post handlers - HTTP endpoints for post operations
use actix_middleware::UserId;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::Result;
use crate::services::{parse_post_id, FeedService};

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
}

/// Create a new post
pub async fn create_post(
    feed: web::Data<FeedService>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let post = feed.create_post(user_id, &req.content).await?;
    Ok(HttpResponse::Created().json(post))
}

/// Toggle the caller's like on a post
pub async fn toggle_like(
    feed: web::Data<FeedService>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    let result = feed.toggle_like(user_id, post_id).await?;
    Ok(HttpResponse::Ok().json(result))
}
