/// Comment handlers
use actix_middleware::UserId;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::Result;
use crate::services::{parse_post_id, FeedService};

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

/// Add a comment to a post
pub async fn create_comment(
    feed: web::Data<FeedService>,
    user_id: UserId,
    path: web::Path<String>,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    let comment = feed.add_comment(user_id, post_id, &req.content).await?;
    Ok(HttpResponse::Created().json(comment))
}
