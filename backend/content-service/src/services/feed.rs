/// Feed service - posts, paginated search, like toggling and comments
///
/// Identity always arrives as an explicit argument. Validation runs before
/// any store call, and every store call is bounded by `store_timeout`.
use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_middleware::UserId;
use tracing::{debug, error, info};

use super::notifications::NotificationService;
use super::{bounded, query_parser, validate_content, validate_post_id};
use crate::config::FeedConfig;
use crate::db::{FeedStore, PostQuery};
use crate::error::{AppError, Result};
use crate::metrics::feed::{FEED_REQUEST_DURATION_SECONDS, LIKE_TOGGLES_TOTAL, POSTS_CREATED_TOTAL};
use crate::models::{
    CommentResponse, FeedPage, LikeInsert, LikeToggleResponse, NotificationType, PostResponse,
};

/// Raw listing parameters as supplied by the caller
#[derive(Debug, Clone, Default)]
pub struct ListPostsParams {
    pub q: Option<String>,
    pub cursor: Option<i64>,
    /// Falls back to the configured default when absent
    pub limit: Option<i64>,
}

pub struct FeedService {
    store: Arc<dyn FeedStore>,
    notifications: Arc<NotificationService>,
    limits: FeedConfig,
    store_timeout: Duration,
}

impl FeedService {
    pub fn new(
        store: Arc<dyn FeedStore>,
        notifications: Arc<NotificationService>,
        limits: FeedConfig,
        store_timeout: Duration,
    ) -> Self {
        Self {
            store,
            notifications,
            limits,
            store_timeout,
        }
    }

    /// Create a post authored by `author`
    pub async fn create_post(&self, author: UserId, content: &str) -> Result<PostResponse> {
        validate_content("content", content, self.limits.post_max_length)?;

        let view = bounded(
            "create_post",
            self.store_timeout,
            self.store.create_post(author.0, content),
        )
        .await?;

        POSTS_CREATED_TOTAL.inc();
        info!(post_id = view.post.id, user_id = author.0, "post created");

        Ok(PostResponse::from_view(view, true))
    }

    /// One page of the feed, newest first
    pub async fn list_posts(
        &self,
        viewer: Option<UserId>,
        params: ListPostsParams,
    ) -> Result<FeedPage> {
        let limit = params.limit.unwrap_or(self.limits.default_page_limit);
        if limit < 1 || limit > self.limits.max_page_limit {
            return Err(AppError::validation(
                "limit",
                format!("must be between 1 and {}", self.limits.max_page_limit),
            ));
        }
        if let Some(cursor) = params.cursor {
            if cursor < 1 {
                return Err(AppError::validation("cursor", "must be a positive integer"));
            }
        }

        // An empty `q` means no filter; a non-empty one without terms matches nothing.
        let parsed = params
            .q
            .as_deref()
            .filter(|q| !q.is_empty())
            .map(query_parser::parse);
        if parsed.as_ref().is_some_and(|p| p.is_empty()) {
            debug!(q = ?params.q, "search query has no terms");
            return Ok(FeedPage {
                items: Vec::new(),
                next_cursor: None,
            });
        }
        let terms = parsed.map(|p| p.terms()).unwrap_or_default();
        let query_label = if terms.is_empty() { "all" } else { "search" };

        let query = PostQuery {
            terms,
            before_id: params.cursor,
            limit,
            viewer_id: viewer.map(|v| v.0),
        };

        let started = Instant::now();
        let views = bounded("list_posts", self.store_timeout, self.store.list_posts(&query)).await?;
        FEED_REQUEST_DURATION_SECONDS
            .with_label_values(&[query_label])
            .observe(started.elapsed().as_secs_f64());

        let has_viewer = viewer.is_some();
        let items: Vec<PostResponse> = views
            .into_iter()
            .take(limit as usize)
            .map(|view| PostResponse::from_view(view, has_viewer))
            .collect();

        let next_cursor = if items.len() as i64 == limit {
            items.last().map(|post| post.id)
        } else {
            None
        };

        debug!(
            count = items.len(),
            cursor = ?params.cursor,
            next_cursor = ?next_cursor,
            "feed page listed"
        );

        Ok(FeedPage { items, next_cursor })
    }

    /// Toggle the caller's like on a post
    ///
    /// Under a race the response reflects what this request did: losing an
    /// insert race still answers `liked: true` (the pair is liked) but sends
    /// no second notification.
    pub async fn toggle_like(&self, caller: UserId, post_id: i64) -> Result<LikeToggleResponse> {
        let post_id = validate_post_id(post_id)?;

        let existing = bounded(
            "find_like",
            self.store_timeout,
            self.store.find_like(caller.0, post_id),
        )
        .await?;

        if existing.is_some() {
            let removed = bounded(
                "delete_like",
                self.store_timeout,
                self.store.delete_like(caller.0, post_id),
            )
            .await?;
            if !removed {
                debug!(post_id, user_id = caller.0, "like already removed concurrently");
            }

            LIKE_TOGGLES_TOTAL.with_label_values(&["unliked"]).inc();
            info!(post_id, user_id = caller.0, "post unliked");
            return Ok(LikeToggleResponse { liked: false });
        }

        match bounded(
            "insert_like",
            self.store_timeout,
            self.store.insert_like(caller.0, post_id),
        )
        .await?
        {
            LikeInsert::Created { post_author_id } => {
                LIKE_TOGGLES_TOTAL.with_label_values(&["liked"]).inc();
                info!(post_id, user_id = caller.0, "post liked");

                self.notify_after_commit(post_author_id, caller, NotificationType::Like, post_id)
                    .await;
                Ok(LikeToggleResponse { liked: true })
            }
            LikeInsert::AlreadyLiked => {
                LIKE_TOGGLES_TOTAL.with_label_values(&["already_liked"]).inc();
                debug!(post_id, user_id = caller.0, "concurrent like collapsed");
                Ok(LikeToggleResponse { liked: true })
            }
            LikeInsert::PostMissing => Err(AppError::not_found("post")),
        }
    }

    /// Comment on a post as `caller`
    pub async fn add_comment(
        &self,
        caller: UserId,
        post_id: i64,
        content: &str,
    ) -> Result<CommentResponse> {
        let post_id = validate_post_id(post_id)?;
        validate_content("content", content, self.limits.comment_max_length)?;

        let view = bounded(
            "create_comment",
            self.store_timeout,
            self.store.create_comment(post_id, caller.0, content),
        )
        .await?
        .ok_or_else(|| AppError::not_found("post"))?;

        info!(
            comment_id = view.comment.id,
            post_id,
            user_id = caller.0,
            "comment created"
        );

        self.notify_after_commit(
            view.post_author_id,
            caller,
            NotificationType::Comment,
            post_id,
        )
        .await;

        Ok(view.into())
    }

    /// The triggering write has committed; a notification failure is logged only.
    async fn notify_after_commit(
        &self,
        recipient_id: i64,
        actor: UserId,
        kind: NotificationType,
        post_id: i64,
    ) {
        if let Err(err) = self
            .notifications
            .notify(recipient_id, actor.0, kind, Some(post_id))
            .await
        {
            error!(
                recipient_id,
                actor_id = actor.0,
                post_id,
                kind = %kind,
                error = %err,
                "failed to record notification"
            );
        }
    }
}
