//! In-memory FeedStore for integration tests
//!
//! Mirrors the Postgres store's contract: descending-id pages, a conditional
//! like insert that is atomic under one lock, and foreign-key style failures
//! for unknown users.

use async_trait::async_trait;
use chrono::Utc;
use content_service::db::{FeedStore, PostQuery, StoreError, StoreResult};
use content_service::models::{
    AuthorSummary, Comment, CommentView, Like, LikeInsert, NewNotification, Notification, Post,
    PostView, User,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct State {
    users: Vec<User>,
    posts: Vec<Post>,
    likes: Vec<Like>,
    comments: Vec<Comment>,
    notifications: Vec<Notification>,
    next_like_id: i64,
}

impl State {
    fn author(&self, user_id: i64) -> Option<AuthorSummary> {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .map(AuthorSummary::from)
    }

    fn view(&self, post: &Post, viewer_id: Option<i64>) -> PostView {
        let author = self.author(post.author_id).unwrap_or(AuthorSummary {
            id: post.author_id,
            username: String::new(),
            display_name: None,
        });

        PostView {
            post: post.clone(),
            author,
            likes_count: self.likes.iter().filter(|l| l.post_id == post.id).count() as i64,
            comments_count: self.comments.iter().filter(|c| c.post_id == post.id).count() as i64,
            liked_by_viewer: viewer_id.map_or(false, |viewer| {
                self.likes
                    .iter()
                    .any(|l| l.post_id == post.id && l.user_id == viewer)
            }),
        }
    }
}

/// In-memory store with knobs for latency and failure injection
#[derive(Clone, Default)]
pub struct InMemoryFeedStore {
    state: Arc<Mutex<State>>,
    delay: Arc<Mutex<Option<Duration>>>,
    fail_notifications: Arc<AtomicBool>,
    hide_likes_from_find: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryFeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps this long before touching state
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn fail_notifications(&self, fail: bool) {
        self.fail_notifications.store(fail, Ordering::SeqCst);
    }

    /// Make `find_like` miss existing likes, as if another request inserted
    /// the like between this request's check and its insert.
    pub fn simulate_like_race(&self, enabled: bool) {
        self.hide_likes_from_find.store(enabled, Ordering::SeqCst);
    }

    /// Number of trait calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seed_user(&self, username: &str) -> User {
        let mut state = self.state.lock().unwrap();
        let user = User {
            id: state.users.len() as i64 + 1,
            username: username.to_string(),
            display_name: None,
            bio: None,
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        user
    }

    pub fn seed_post(&self, author_id: i64, content: &str) -> Post {
        let mut state = self.state.lock().unwrap();
        let post = Post {
            id: state.posts.len() as i64 + 1,
            content: content.to_string(),
            author_id,
            created_at: Utc::now(),
        };
        state.posts.push(post.clone());
        post
    }

    pub fn post_count(&self) -> usize {
        self.state.lock().unwrap().posts.len()
    }

    pub fn like_count(&self, post_id: i64) -> usize {
        self.state
            .lock()
            .unwrap()
            .likes
            .iter()
            .filter(|l| l.post_id == post_id)
            .count()
    }

    pub fn comment_count(&self, post_id: i64) -> usize {
        self.state
            .lock()
            .unwrap()
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .count()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.state.lock().unwrap().notifications.clone()
    }

    async fn enter(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl FeedStore for InMemoryFeedStore {
    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        self.enter().await;
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        self.enter().await;
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, username: &str, display_name: Option<&str>) -> StoreResult<User> {
        self.enter().await;
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.username == username) {
            return Err(StoreError::Duplicate("users_username_unique".into()));
        }
        let user = User {
            id: state.users.len() as i64 + 1,
            username: username.to_string(),
            display_name: display_name.map(str::to_string),
            bio: None,
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn create_post(&self, author_id: i64, content: &str) -> StoreResult<PostView> {
        self.enter().await;
        let mut state = self.state.lock().unwrap();
        if state.author(author_id).is_none() {
            return Err(StoreError::MissingReference("user not found".into()));
        }
        let post = Post {
            id: state.posts.len() as i64 + 1,
            content: content.to_string(),
            author_id,
            created_at: Utc::now(),
        };
        state.posts.push(post.clone());
        Ok(state.view(&post, Some(author_id)))
    }

    async fn list_posts(&self, query: &PostQuery) -> StoreResult<Vec<PostView>> {
        self.enter().await;
        let state = self.state.lock().unwrap();
        let terms: Vec<String> = query.terms.iter().map(|t| t.to_lowercase()).collect();

        let mut posts: Vec<&Post> = state
            .posts
            .iter()
            .filter(|p| query.before_id.map_or(true, |before| p.id < before))
            .filter(|p| {
                let content = p.content.to_lowercase();
                terms.is_empty() || terms.iter().any(|t| content.contains(t.as_str()))
            })
            .collect();
        posts.sort_by(|a, b| b.id.cmp(&a.id));

        Ok(posts
            .into_iter()
            .take(query.limit.max(0) as usize)
            .map(|p| state.view(p, query.viewer_id))
            .collect())
    }

    async fn find_like(&self, user_id: i64, post_id: i64) -> StoreResult<Option<Like>> {
        self.enter().await;
        if self.hide_likes_from_find.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let state = self.state.lock().unwrap();
        Ok(state
            .likes
            .iter()
            .find(|l| l.user_id == user_id && l.post_id == post_id)
            .cloned())
    }

    async fn insert_like(&self, user_id: i64, post_id: i64) -> StoreResult<LikeInsert> {
        self.enter().await;
        let mut state = self.state.lock().unwrap();
        let Some(post_author_id) = state
            .posts
            .iter()
            .find(|p| p.id == post_id)
            .map(|p| p.author_id)
        else {
            return Ok(LikeInsert::PostMissing);
        };
        if state
            .likes
            .iter()
            .any(|l| l.user_id == user_id && l.post_id == post_id)
        {
            return Ok(LikeInsert::AlreadyLiked);
        }
        state.next_like_id += 1;
        let like = Like {
            id: state.next_like_id,
            user_id,
            post_id,
            created_at: Utc::now(),
        };
        state.likes.push(like);
        Ok(LikeInsert::Created { post_author_id })
    }

    async fn delete_like(&self, user_id: i64, post_id: i64) -> StoreResult<bool> {
        self.enter().await;
        let mut state = self.state.lock().unwrap();
        let before = state.likes.len();
        state
            .likes
            .retain(|l| !(l.user_id == user_id && l.post_id == post_id));
        Ok(state.likes.len() < before)
    }

    async fn create_comment(
        &self,
        post_id: i64,
        author_id: i64,
        content: &str,
    ) -> StoreResult<Option<CommentView>> {
        self.enter().await;
        let mut state = self.state.lock().unwrap();
        let Some(post_author_id) = state
            .posts
            .iter()
            .find(|p| p.id == post_id)
            .map(|p| p.author_id)
        else {
            return Ok(None);
        };
        let Some(author) = state.author(author_id) else {
            return Err(StoreError::MissingReference("user not found".into()));
        };
        let comment = Comment {
            id: state.comments.len() as i64 + 1,
            content: content.to_string(),
            post_id,
            author_id,
            created_at: Utc::now(),
        };
        state.comments.push(comment.clone());
        Ok(Some(CommentView {
            comment,
            author,
            post_author_id,
        }))
    }

    async fn create_notification(&self, new: &NewNotification) -> StoreResult<Notification> {
        self.enter().await;
        if self.fail_notifications.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("notifications table offline".into()));
        }
        if new.user_id == new.actor_id {
            return Err(StoreError::Corrupt("notifications_not_self".into()));
        }
        let mut state = self.state.lock().unwrap();
        let notification = Notification {
            id: state.notifications.len() as i64 + 1,
            user_id: new.user_id,
            actor_id: new.actor_id,
            kind: new.kind,
            post_id: new.post_id,
            created_at: Utc::now(),
        };
        state.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.enter().await;
        Ok(())
    }
}
