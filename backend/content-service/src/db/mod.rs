/// Database access layer
///
/// `FeedStore` is the seam services depend on. `PgFeedStore` backs it with
/// the free-function repositories in this module; tests back it with an
/// in-memory implementation.
use async_trait::async_trait;
use sqlx::migrate::Migrator;

use crate::models::{CommentView, Like, LikeInsert, NewNotification, Notification, PostView, User};

pub mod comment_repo;
pub mod like_repo;
pub mod notification_repo;
pub mod pg_store;
pub mod post_repo;
pub mod user_repo;

pub use pg_store::PgFeedStore;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A foreign key pointed at a row that does not exist
    #[error("referenced row missing: {0}")]
    MissingReference(String),

    /// A unique constraint rejected the write
    #[error("duplicate row violates {0}")]
    Duplicate(String),

    /// A row could not be mapped onto a model
    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            match db_err.code().as_deref() {
                Some("23505") => return StoreError::Duplicate(constraint),
                Some("23503") => {
                    let resource = if constraint.contains("post_id") {
                        "post"
                    } else {
                        "user"
                    };
                    return StoreError::MissingReference(format!("{resource} not found"));
                }
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

/// Filter for one page of the feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    /// Case-insensitive substrings; a post matches if it contains any of them.
    /// Empty means no filter.
    pub terms: Vec<String>,
    /// Exclusive upper bound on post id
    pub before_id: Option<i64>,
    pub limit: i64,
    /// Viewer for `liked_by_viewer`
    pub viewer_id: Option<i64>,
}

/// Persistence contract for users, posts, likes, comments and notifications.
///
/// Implementations must make `insert_like` atomic: when two callers race on
/// the same (user, post) pair exactly one observes `LikeInsert::Created`.
#[async_trait]
pub trait FeedStore: Send + Sync {
    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Fails with `StoreError::Duplicate` when the username is taken.
    async fn create_user(&self, username: &str, display_name: Option<&str>) -> StoreResult<User>;

    async fn create_post(&self, author_id: i64, content: &str) -> StoreResult<PostView>;

    /// Newest first (descending id).
    async fn list_posts(&self, query: &PostQuery) -> StoreResult<Vec<PostView>>;

    async fn find_like(&self, user_id: i64, post_id: i64) -> StoreResult<Option<Like>>;

    async fn insert_like(&self, user_id: i64, post_id: i64) -> StoreResult<LikeInsert>;

    /// Returns whether a row was removed.
    async fn delete_like(&self, user_id: i64, post_id: i64) -> StoreResult<bool>;

    /// `None` when the post does not exist.
    async fn create_comment(
        &self,
        post_id: i64,
        author_id: i64,
        content: &str,
    ) -> StoreResult<Option<CommentView>>;

    async fn create_notification(&self, new: &NewNotification) -> StoreResult<Notification>;

    /// Cheap liveness probe used by readiness checks.
    async fn ping(&self) -> StoreResult<()>;
}
