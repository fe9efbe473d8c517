//! Event repository implementation
//!
//! Owns the `events` table: creation (status forced to `planned`),
//! whitelist sync from a request snapshot, calendar-window and
//! conflict-candidate queries, and the delete cascade steps.

use chrono::NaiveDate;
use sqlx::{PgExecutor, PgPool};

use crate::models::event::{CreateEventData, Event, EventFields};
use crate::utils::errors::EventBoardError;

const EVENT_COLUMNS: &str = r#"id, title, date_start, date_end, time_start, time_end, place, format, department_id, department_ids, labels, limit_participants, description, post_link, reg_link, responsible_link, "repeat", status, request_id, created_at, updated_at"#;

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new published event. The status is always `planned`
    /// regardless of the caller.
    pub async fn create(&self, data: &CreateEventData) -> Result<Event, EventBoardError> {
        self.create_with(&self.pool, data).await
    }

    /// Create within a caller-provided executor (used by transactional
    /// workflows)
    pub async fn create_with(
        &self,
        executor: impl PgExecutor<'_>,
        data: &CreateEventData,
    ) -> Result<Event, EventBoardError> {
        let sql = format!(
            r#"
            INSERT INTO events (title, date_start, date_end, time_start, time_end, place, format, department_id, department_ids, labels, limit_participants, description, post_link, reg_link, responsible_link, "repeat", status, request_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, 'planned', $17, NOW(), NOW())
            RETURNING {EVENT_COLUMNS}
            "#
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(&data.fields.title)
            .bind(data.fields.date_start)
            .bind(data.fields.date_end)
            .bind(data.fields.time_start)
            .bind(data.fields.time_end)
            .bind(&data.fields.place)
            .bind(data.fields.format)
            .bind(data.fields.department_id)
            .bind(&data.fields.department_ids)
            .bind(&data.fields.labels)
            .bind(data.fields.limit_participants)
            .bind(&data.fields.description)
            .bind(&data.fields.post_link)
            .bind(&data.fields.reg_link)
            .bind(&data.fields.responsible_link)
            .bind(&data.fields.repeat)
            .bind(data.request_id)
            .fetch_one(executor)
            .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, EventBoardError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(event)
    }

    /// Overwrite the event-field snapshot on an existing event.
    ///
    /// Every whitelisted field is written; nullable fields are set to NULL
    /// when absent from the snapshot rather than left untouched.
    pub async fn update_from_request_with(
        &self,
        executor: impl PgExecutor<'_>,
        event_id: i64,
        fields: &EventFields,
    ) -> Result<Event, EventBoardError> {
        let sql = format!(
            r#"
            UPDATE events
            SET title = $2,
                date_start = $3,
                date_end = $4,
                time_start = $5,
                time_end = $6,
                place = $7,
                format = $8,
                department_id = $9,
                department_ids = $10,
                labels = $11,
                limit_participants = $12,
                description = $13,
                post_link = $14,
                reg_link = $15,
                responsible_link = $16,
                "repeat" = $17,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(event_id)
            .bind(&fields.title)
            .bind(fields.date_start)
            .bind(fields.date_end)
            .bind(fields.time_start)
            .bind(fields.time_end)
            .bind(&fields.place)
            .bind(fields.format)
            .bind(fields.department_id)
            .bind(&fields.department_ids)
            .bind(&fields.labels)
            .bind(fields.limit_participants)
            .bind(&fields.description)
            .bind(&fields.post_link)
            .bind(&fields.reg_link)
            .bind(&fields.responsible_link)
            .bind(&fields.repeat)
            .fetch_optional(executor)
            .await?;

        event.ok_or(EventBoardError::EventNotFound { id: event_id })
    }

    /// List non-canceled events, optionally restricted to a date window.
    ///
    /// The window test is a full range-overlap check: an event matches when
    /// `date_start <= end AND date_end >= start`.
    pub async fn find_all(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Event>, EventBoardError> {
        let events = match (start_date, end_date) {
            (Some(start), Some(end)) => {
                let sql = format!(
                    "SELECT {EVENT_COLUMNS} FROM events WHERE status != 'canceled' AND date_start <= $2 AND date_end >= $1 ORDER BY date_start ASC, time_start ASC"
                );
                sqlx::query_as::<_, Event>(&sql)
                    .bind(start)
                    .bind(end)
                    .fetch_all(&self.pool)
                    .await?
            }
            _ => {
                let sql = format!(
                    "SELECT {EVENT_COLUMNS} FROM events WHERE status != 'canceled' ORDER BY date_start ASC, time_start ASC"
                );
                sqlx::query_as::<_, Event>(&sql).fetch_all(&self.pool).await?
            }
        };

        Ok(events)
    }

    /// Fetch conflict candidates: planned events with either endpoint of
    /// their date range inside the probe window.
    ///
    /// An event spanning the whole window with neither endpoint inside it
    /// is not retrieved.
    pub async fn find_conflict_candidates(
        &self,
        date_start: NaiveDate,
        date_end: NaiveDate,
    ) -> Result<Vec<Event>, EventBoardError> {
        let sql = format!(
            r#"
            SELECT {EVENT_COLUMNS} FROM events
            WHERE status = 'planned'
              AND (date_start BETWEEN $1 AND $2 OR date_end BETWEEN $1 AND $2)
            "#
        );
        let events = sqlx::query_as::<_, Event>(&sql)
            .bind(date_start)
            .bind(date_end)
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }

    /// Clear the request back-reference without touching anything else
    pub async fn clear_request_link_with(
        &self,
        executor: impl PgExecutor<'_>,
        event_id: i64,
    ) -> Result<(), EventBoardError> {
        sqlx::query("UPDATE events SET request_id = NULL, updated_at = NOW() WHERE id = $1")
            .bind(event_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Delete the event row itself. Dependent subscriptions and change
    /// logs must already be gone.
    pub async fn delete_with(
        &self,
        executor: impl PgExecutor<'_>,
        event_id: i64,
    ) -> Result<(), EventBoardError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Count total events
    pub async fn count(&self) -> Result<i64, EventBoardError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
