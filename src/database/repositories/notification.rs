//! Notification repository implementation

use sqlx::PgPool;

use crate::models::notification::{Notification, NotificationType};
use crate::utils::errors::EventBoardError;

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, type, message, is_read, metadata, sent_at, created_at";

#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a notification for a user
    pub async fn create(
        &self,
        user_id: i64,
        kind: NotificationType,
        message: &str,
        metadata: Option<&serde_json::Value>,
    ) -> Result<Notification, EventBoardError> {
        let sql = format!(
            r#"
            INSERT INTO notifications (user_id, type, message, metadata, sent_at, created_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        );
        let notification = sqlx::query_as::<_, Notification>(&sql)
            .bind(user_id)
            .bind(kind)
            .bind(message)
            .bind(metadata)
            .fetch_one(&self.pool)
            .await?;

        Ok(notification)
    }

    /// List a user's notifications, newest first, capped at 50
    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<Notification>, EventBoardError> {
        let sql = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE user_id = $1 ORDER BY created_at DESC LIMIT 50"
        );
        let notifications = sqlx::query_as::<_, Notification>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(notifications)
    }

    /// Count unread notifications for a user
    pub async fn unread_count(&self, user_id: i64) -> Result<i64, EventBoardError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Mark one notification as read
    pub async fn mark_read(&self, id: i64) -> Result<(), EventBoardError> {
        sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Mark all of a user's notifications as read
    pub async fn mark_all_read(&self, user_id: i64) -> Result<(), EventBoardError> {
        sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
