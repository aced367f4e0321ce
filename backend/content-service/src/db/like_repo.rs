use sqlx::{FromRow, PgPool};

use crate::models::{Like, LikeInsert};

#[derive(Debug, FromRow)]
struct InsertOutcome {
    author_id: i64,
    created: bool,
}

/// Insert a like if the post exists and the pair is not already liked
///
/// A single statement: the unique (user_id, post_id) constraint decides
/// concurrent inserts, so exactly one racing caller sees `Created`.
pub async fn insert_like(
    pool: &PgPool,
    user_id: i64,
    post_id: i64,
) -> Result<LikeInsert, sqlx::Error> {
    let outcome = sqlx::query_as::<_, InsertOutcome>(
        r#"
        WITH target AS (
            SELECT id, author_id FROM posts WHERE id = $2
        ),
        inserted AS (
            INSERT INTO likes (user_id, post_id)
            SELECT $1, id FROM target
            ON CONFLICT (user_id, post_id) DO NOTHING
            RETURNING id
        )
        SELECT t.author_id, EXISTS(SELECT 1 FROM inserted) AS created
        FROM target t
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(match outcome {
        None => LikeInsert::PostMissing,
        Some(InsertOutcome {
            author_id,
            created: true,
        }) => LikeInsert::Created {
            post_author_id: author_id,
        },
        Some(_) => LikeInsert::AlreadyLiked,
    })
}

/// Delete a like; returns whether a row was removed
pub async fn delete_like(pool: &PgPool, user_id: i64, post_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM likes
        WHERE user_id = $1 AND post_id = $2
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Check if a user has liked a post
pub async fn find_like(
    pool: &PgPool,
    user_id: i64,
    post_id: i64,
) -> Result<Option<Like>, sqlx::Error> {
    sqlx::query_as::<_, Like>(
        r#"
        SELECT id, user_id, post_id, created_at
        FROM likes
        WHERE user_id = $1 AND post_id = $2
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .fetch_optional(pool)
    .await
}
