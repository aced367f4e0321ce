use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::models::{AuthorSummary, Post, PostView};

/// Flat row for a post joined with its author and counts
#[derive(Debug, FromRow)]
struct PostRow {
    id: i64,
    content: String,
    author_id: i64,
    created_at: DateTime<Utc>,
    author_username: String,
    author_display_name: Option<String>,
    likes_count: i64,
    comments_count: i64,
    liked_by_viewer: bool,
}

impl From<PostRow> for PostView {
    fn from(row: PostRow) -> Self {
        PostView {
            post: Post {
                id: row.id,
                content: row.content,
                author_id: row.author_id,
                created_at: row.created_at,
            },
            author: AuthorSummary {
                id: row.author_id,
                username: row.author_username,
                display_name: row.author_display_name,
            },
            likes_count: row.likes_count,
            comments_count: row.comments_count,
            liked_by_viewer: row.liked_by_viewer,
        }
    }
}

/// Wrap a search term as an ILIKE substring pattern, escaping wildcards
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Create a new post and return it with its author
pub async fn create_post(
    pool: &PgPool,
    author_id: i64,
    content: &str,
) -> Result<PostView, sqlx::Error> {
    let row = sqlx::query_as::<_, PostRow>(
        r#"
        WITH inserted AS (
            INSERT INTO posts (content, author_id)
            VALUES ($1, $2)
            RETURNING id, content, author_id, created_at
        )
        SELECT i.id, i.content, i.author_id, i.created_at,
               u.username AS author_username,
               u.display_name AS author_display_name,
               0::BIGINT AS likes_count,
               0::BIGINT AS comments_count,
               FALSE AS liked_by_viewer
        FROM inserted i
        JOIN users u ON u.id = i.author_id
        "#,
    )
    .bind(content)
    .bind(author_id)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

/// One page of posts, newest first
///
/// `patterns` are ILIKE patterns (see [`like_pattern`]); an empty slice
/// disables the content filter.
pub async fn list_posts(
    pool: &PgPool,
    patterns: &[String],
    before_id: Option<i64>,
    limit: i64,
    viewer_id: Option<i64>,
) -> Result<Vec<PostView>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PostRow>(
        r#"
        SELECT p.id, p.content, p.author_id, p.created_at,
               u.username AS author_username,
               u.display_name AS author_display_name,
               (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS likes_count,
               (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments_count,
               COALESCE(
                   EXISTS(SELECT 1 FROM likes l WHERE l.post_id = p.id AND l.user_id = $4),
                   FALSE
               ) AS liked_by_viewer
        FROM posts p
        JOIN users u ON u.id = p.author_id
        WHERE (cardinality($1::TEXT[]) = 0 OR p.content ILIKE ANY($1::TEXT[]))
          AND ($2::BIGINT IS NULL OR p.id < $2)
        ORDER BY p.id DESC
        LIMIT $3
        "#,
    )
    .bind(patterns)
    .bind(before_id)
    .bind(limit)
    .bind(viewer_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(PostView::from).collect())
}
