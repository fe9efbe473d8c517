//! Event request repository implementation
//!
//! Owns the `event_requests` table: creation with the normalized
//! department pair, partial patches, workflow-state writes, and the
//! pending-count query behind the moderation badge.

use sqlx::{FromRow, PgExecutor, PgPool};

use crate::models::request::{
    CreateEventRequestData, EventRequest, RequestStatus, UpdateEventRequestData,
};
use crate::utils::errors::EventBoardError;
use crate::utils::helpers;

const REQUEST_COLUMNS: &str = r#"id, event_id, status, comments, revision_snapshot, organizer_id, title, date_start, date_end, time_start, time_end, place, format, department_id, department_ids, labels, limit_participants, description, post_link, reg_link, responsible_link, "repeat", has_conflict, created_at, updated_at"#;

/// Narrow projection used by submit and the controller's permission checks
#[derive(Debug, Clone, FromRow)]
pub struct RequestSummary {
    pub id: i64,
    pub organizer_id: i64,
    pub status: RequestStatus,
    pub event_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct EventRequestRepository {
    pool: PgPool,
}

impl EventRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event request with the given workflow state.
    ///
    /// The department pair is normalized here so the scalar cache always
    /// derives from the list.
    pub async fn create(
        &self,
        data: &CreateEventRequestData,
        status: RequestStatus,
        has_conflict: bool,
    ) -> Result<EventRequest, EventBoardError> {
        let (department_id, department_ids) = data.normalized_departments();
        let labels = helpers::join_label_list(&data.labels);

        let sql = format!(
            r#"
            INSERT INTO event_requests (organizer_id, status, has_conflict, title, date_start, date_end, time_start, time_end, place, format, department_id, department_ids, labels, limit_participants, description, post_link, reg_link, responsible_link, "repeat", created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, NOW(), NOW())
            RETURNING {REQUEST_COLUMNS}
            "#
        );
        let request = sqlx::query_as::<_, EventRequest>(&sql)
            .bind(data.organizer_id)
            .bind(status)
            .bind(has_conflict)
            .bind(&data.title)
            .bind(data.date_start)
            .bind(data.date_end)
            .bind(data.time_start)
            .bind(data.time_end)
            .bind(&data.place)
            .bind(data.format)
            .bind(department_id)
            .bind(department_ids)
            .bind(labels)
            .bind(data.limit_participants)
            .bind(&data.description)
            .bind(&data.post_link)
            .bind(&data.reg_link)
            .bind(&data.responsible_link)
            .bind(&data.repeat)
            .fetch_one(&self.pool)
            .await?;

        Ok(request)
    }

    /// Find request by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<EventRequest>, EventBoardError> {
        self.find_by_id_with(&self.pool, id).await
    }

    /// Find request by ID through a caller-provided executor (used to read
    /// freshly written rows inside a transaction)
    pub async fn find_by_id_with(
        &self,
        executor: impl PgExecutor<'_>,
        id: i64,
    ) -> Result<Option<EventRequest>, EventBoardError> {
        let sql = format!("SELECT {REQUEST_COLUMNS} FROM event_requests WHERE id = $1");
        let request = sqlx::query_as::<_, EventRequest>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(request)
    }

    /// Persist a status change outside a transaction
    pub async fn set_status(
        &self,
        id: i64,
        status: RequestStatus,
        comments: Option<&str>,
    ) -> Result<(), EventBoardError> {
        self.set_status_with(&self.pool, id, status, comments).await
    }

    /// Narrow workflow projection of a request
    pub async fn find_summary(&self, id: i64) -> Result<Option<RequestSummary>, EventBoardError> {
        let summary = sqlx::query_as::<_, RequestSummary>(
            "SELECT id, organizer_id, status, event_id FROM event_requests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(summary)
    }

    /// List requests, newest first, optionally restricted to one organizer
    pub async fn find_all(
        &self,
        organizer_id: Option<i64>,
    ) -> Result<Vec<EventRequest>, EventBoardError> {
        let requests = match organizer_id {
            Some(organizer_id) => {
                let sql = format!(
                    "SELECT {REQUEST_COLUMNS} FROM event_requests WHERE organizer_id = $1 ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, EventRequest>(&sql)
                    .bind(organizer_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {REQUEST_COLUMNS} FROM event_requests ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, EventRequest>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(requests)
    }

    /// Patch the request's event fields. Absent fields are left untouched;
    /// the department and label columns have explicit clear semantics and
    /// are written separately.
    pub async fn update_fields_with(
        &self,
        executor: impl PgExecutor<'_>,
        id: i64,
        data: &UpdateEventRequestData,
    ) -> Result<(), EventBoardError> {
        let labels = data.labels.as_ref().map(|l| helpers::join_label_list(l));

        sqlx::query(
            r#"
            UPDATE event_requests
            SET status = COALESCE($2, status),
                title = COALESCE($3, title),
                date_start = COALESCE($4, date_start),
                date_end = COALESCE($5, date_end),
                time_start = COALESCE($6, time_start),
                time_end = COALESCE($7, time_end),
                place = COALESCE($8, place),
                format = COALESCE($9, format),
                limit_participants = COALESCE($10, limit_participants),
                description = COALESCE($11, description),
                post_link = COALESCE($12, post_link),
                reg_link = COALESCE($13, reg_link),
                responsible_link = COALESCE($14, responsible_link),
                "repeat" = COALESCE($15, "repeat"),
                labels = CASE WHEN $16 THEN $17 ELSE labels END,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(data.status)
        .bind(&data.title)
        .bind(data.date_start)
        .bind(data.date_end)
        .bind(data.time_start)
        .bind(data.time_end)
        .bind(&data.place)
        .bind(data.format)
        .bind(data.limit_participants)
        .bind(&data.description)
        .bind(&data.post_link)
        .bind(&data.reg_link)
        .bind(&data.responsible_link)
        .bind(&data.repeat)
        .bind(labels.is_some())
        .bind(labels.flatten())
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Overwrite the department pair. NULLs clear both columns.
    pub async fn set_departments_with(
        &self,
        executor: impl PgExecutor<'_>,
        id: i64,
        department_id: Option<i64>,
        department_ids: Option<String>,
    ) -> Result<(), EventBoardError> {
        sqlx::query(
            "UPDATE event_requests SET department_id = $2, department_ids = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(department_id)
        .bind(department_ids)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Persist a status decision, keeping existing comments when none are
    /// provided
    pub async fn set_status_with(
        &self,
        executor: impl PgExecutor<'_>,
        id: i64,
        status: RequestStatus,
        comments: Option<&str>,
    ) -> Result<(), EventBoardError> {
        sqlx::query(
            "UPDATE event_requests SET status = $2, comments = COALESCE($3, comments), updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .bind(comments)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Backfill the materialized event link
    pub async fn set_event_id_with(
        &self,
        executor: impl PgExecutor<'_>,
        id: i64,
        event_id: i64,
    ) -> Result<(), EventBoardError> {
        sqlx::query("UPDATE event_requests SET event_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(event_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Store the field snapshot taken when a request is sent back for
    /// rework
    pub async fn set_revision_snapshot_with(
        &self,
        executor: impl PgExecutor<'_>,
        id: i64,
        snapshot: &serde_json::Value,
    ) -> Result<(), EventBoardError> {
        sqlx::query(
            "UPDATE event_requests SET revision_snapshot = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(snapshot)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Delete a request row
    pub async fn delete_with(
        &self,
        executor: impl PgExecutor<'_>,
        id: i64,
    ) -> Result<(), EventBoardError> {
        sqlx::query("DELETE FROM event_requests WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Count requests awaiting moderation
    pub async fn pending_count(&self) -> Result<i64, EventBoardError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM event_requests WHERE status = 'pending'")
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }
}
