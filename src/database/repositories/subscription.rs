//! Subscription and change-log repositories
//!
//! Both tables reference `events` with real foreign keys, so the event
//! remove cascade deletes from them first.

use sqlx::{PgExecutor, PgPool};

use crate::models::subscription::{EventChangeLog, Subscription};
use crate::utils::errors::EventBoardError;

#[derive(Debug, Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Subscribe a user to an event. Idempotent: an existing subscription
    /// is returned unchanged.
    pub async fn subscribe(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Subscription, EventBoardError> {
        if let Some(existing) = sqlx::query_as::<_, Subscription>(
            "SELECT id, user_id, event_id, subscribed_at FROM subscriptions WHERE user_id = $1 AND event_id = $2",
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?
        {
            return Ok(existing);
        }

        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions (user_id, event_id, subscribed_at)
            VALUES ($1, $2, NOW())
            RETURNING id, user_id, event_id, subscribed_at
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(subscription)
    }

    /// Remove a user's subscription to an event
    pub async fn unsubscribe(&self, user_id: i64, event_id: i64) -> Result<(), EventBoardError> {
        sqlx::query("DELETE FROM subscriptions WHERE user_id = $1 AND event_id = $2")
            .bind(user_id)
            .bind(event_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List a user's subscriptions
    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<Subscription>, EventBoardError> {
        let subscriptions = sqlx::query_as::<_, Subscription>(
            "SELECT id, user_id, event_id, subscribed_at FROM subscriptions WHERE user_id = $1 ORDER BY subscribed_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subscriptions)
    }

    /// Delete all subscriptions for an event (remove-cascade step)
    pub async fn delete_by_event_with(
        &self,
        executor: impl PgExecutor<'_>,
        event_id: i64,
    ) -> Result<(), EventBoardError> {
        sqlx::query("DELETE FROM subscriptions WHERE event_id = $1")
            .bind(event_id)
            .execute(executor)
            .await?;

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct EventChangeLogRepository {
    pool: PgPool,
}

impl EventChangeLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a change set against an event
    pub async fn record(
        &self,
        event_id: i64,
        changes: &serde_json::Value,
        user_id: Option<i64>,
    ) -> Result<EventChangeLog, EventBoardError> {
        let log = sqlx::query_as::<_, EventChangeLog>(
            r#"
            INSERT INTO event_change_logs (event_id, changes, user_id, "timestamp")
            VALUES ($1, $2, $3, NOW())
            RETURNING id, event_id, changes, user_id, "timestamp"
            "#,
        )
        .bind(event_id)
        .bind(changes)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(log)
    }

    /// List change logs for an event, newest first
    pub async fn find_by_event(&self, event_id: i64) -> Result<Vec<EventChangeLog>, EventBoardError> {
        let logs = sqlx::query_as::<_, EventChangeLog>(
            r#"SELECT id, event_id, changes, user_id, "timestamp" FROM event_change_logs WHERE event_id = $1 ORDER BY "timestamp" DESC"#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    /// Delete all change logs for an event (remove-cascade step)
    pub async fn delete_by_event_with(
        &self,
        executor: impl PgExecutor<'_>,
        event_id: i64,
    ) -> Result<(), EventBoardError> {
        sqlx::query("DELETE FROM event_change_logs WHERE event_id = $1")
            .bind(event_id)
            .execute(executor)
            .await?;

        Ok(())
    }
}
