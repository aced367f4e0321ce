use async_trait::async_trait;
use sqlx::PgPool;

use super::{
    comment_repo, like_repo, notification_repo, post_repo, user_repo, FeedStore, PostQuery,
    StoreResult,
};
use crate::models::{CommentView, Like, LikeInsert, NewNotification, Notification, PostView, User};

/// Postgres-backed [`FeedStore`]
#[derive(Clone)]
pub struct PgFeedStore {
    pool: PgPool,
}

impl PgFeedStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl FeedStore for PgFeedStore {
    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(user_repo::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(user_repo::find_by_username(&self.pool, username).await?)
    }

    async fn create_user(&self, username: &str, display_name: Option<&str>) -> StoreResult<User> {
        Ok(user_repo::create_user(&self.pool, username, display_name).await?)
    }

    async fn create_post(&self, author_id: i64, content: &str) -> StoreResult<PostView> {
        Ok(post_repo::create_post(&self.pool, author_id, content).await?)
    }

    async fn list_posts(&self, query: &PostQuery) -> StoreResult<Vec<PostView>> {
        let patterns: Vec<String> = query
            .terms
            .iter()
            .map(|t| post_repo::like_pattern(t))
            .collect();

        Ok(post_repo::list_posts(
            &self.pool,
            &patterns,
            query.before_id,
            query.limit,
            query.viewer_id,
        )
        .await?)
    }

    async fn find_like(&self, user_id: i64, post_id: i64) -> StoreResult<Option<Like>> {
        Ok(like_repo::find_like(&self.pool, user_id, post_id).await?)
    }

    async fn insert_like(&self, user_id: i64, post_id: i64) -> StoreResult<LikeInsert> {
        Ok(like_repo::insert_like(&self.pool, user_id, post_id).await?)
    }

    async fn delete_like(&self, user_id: i64, post_id: i64) -> StoreResult<bool> {
        Ok(like_repo::delete_like(&self.pool, user_id, post_id).await?)
    }

    async fn create_comment(
        &self,
        post_id: i64,
        author_id: i64,
        content: &str,
    ) -> StoreResult<Option<CommentView>> {
        Ok(comment_repo::create_comment(&self.pool, post_id, author_id, content).await?)
    }

    async fn create_notification(&self, new: &NewNotification) -> StoreResult<Notification> {
        notification_repo::create_notification(&self.pool, new).await
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
