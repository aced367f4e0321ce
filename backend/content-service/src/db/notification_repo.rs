use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::{StoreError, StoreResult};
use crate::models::{NewNotification, Notification};

#[derive(Debug, FromRow)]
struct NotificationRow {
    id: i64,
    user_id: i64,
    actor_id: i64,
    #[sqlx(rename = "type")]
    kind: String,
    post_id: Option<i64>,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = StoreError;

    fn try_from(row: NotificationRow) -> StoreResult<Self> {
        let kind = row
            .kind
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("notification {}: {e}", row.id)))?;

        Ok(Notification {
            id: row.id,
            user_id: row.user_id,
            actor_id: row.actor_id,
            kind,
            post_id: row.post_id,
            created_at: row.created_at,
        })
    }
}

pub async fn create_notification(
    pool: &PgPool,
    new: &NewNotification,
) -> StoreResult<Notification> {
    let row = sqlx::query_as::<_, NotificationRow>(
        r#"
        INSERT INTO notifications (user_id, actor_id, type, post_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, actor_id, type, post_id, created_at
        "#,
    )
    .bind(new.user_id)
    .bind(new.actor_id)
    .bind(new.kind.as_str())
    .bind(new.post_id)
    .fetch_one(pool)
    .await?;

    row.try_into()
}
