use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::models::{AuthorSummary, Comment, CommentView};

#[derive(Debug, FromRow)]
struct CommentRow {
    id: i64,
    content: String,
    post_id: i64,
    author_id: i64,
    created_at: DateTime<Utc>,
    author_username: String,
    author_display_name: Option<String>,
    post_author_id: i64,
}

/// Create a comment on an existing post
///
/// Returns `None` without writing anything when the post does not exist.
pub async fn create_comment(
    pool: &PgPool,
    post_id: i64,
    author_id: i64,
    content: &str,
) -> Result<Option<CommentView>, sqlx::Error> {
    let row = sqlx::query_as::<_, CommentRow>(
        r#"
        WITH target AS (
            SELECT id, author_id FROM posts WHERE id = $1
        ),
        inserted AS (
            INSERT INTO comments (content, post_id, author_id)
            SELECT $3, id, $2 FROM target
            RETURNING id, content, post_id, author_id, created_at
        )
        SELECT i.id, i.content, i.post_id, i.author_id, i.created_at,
               u.username AS author_username,
               u.display_name AS author_display_name,
               t.author_id AS post_author_id
        FROM inserted i
        JOIN users u ON u.id = i.author_id
        CROSS JOIN target t
        "#,
    )
    .bind(post_id)
    .bind(author_id)
    .bind(content)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| CommentView {
        comment: Comment {
            id: row.id,
            content: row.content,
            post_id: row.post_id,
            author_id: row.author_id,
            created_at: row.created_at,
        },
        author: AuthorSummary {
            id: row.author_id,
            username: row.author_username,
            display_name: row.author_display_name,
        },
        post_author_id: row.post_author_id,
    }))
}
