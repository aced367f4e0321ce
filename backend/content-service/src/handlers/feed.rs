/// Feed handler - paginated, optionally filtered post listing
use actix_middleware::OptionalUserId;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::services::{FeedService, ListPostsParams};

/// Query string for `GET /api/posts`
///
/// Numbers arrive as text so malformed values become field-level
/// validation errors rather than a generic query rejection.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub q: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<String>,
}

fn parse_number(field: &'static str, raw: Option<&str>) -> Result<Option<i64>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::validation(field, "must be a positive integer")),
    }
}

impl FeedQuery {
    pub fn into_params(self) -> Result<ListPostsParams> {
        Ok(ListPostsParams {
            cursor: parse_number("cursor", self.cursor.as_deref())?,
            limit: parse_number("limit", self.limit.as_deref())?,
            q: self.q,
        })
    }
}

/// List posts newest first
pub async fn list_posts(
    feed: web::Data<FeedService>,
    viewer: OptionalUserId,
    query: web::Query<FeedQuery>,
) -> Result<HttpResponse> {
    let params = query.into_inner().into_params()?;
    let page = feed.list_posts(viewer.into_inner(), params).await?;
    Ok(HttpResponse::Ok().json(page))
}
