//! Request lifecycle service
//!
//! Implements the moderation state machine over event requests and the
//! request↔event synchronization protocol: approving a request
//! materializes (or re-syncs) its event, reopening an approved request
//! pushes the edit into the event while the request requeues for review,
//! and removal unlinks and deletes the materialized event.

use futures::future::try_join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::database::{DatabaseService, RequestSummary};
use crate::models::event::{CreateEventData, Event};
use crate::models::request::{
    CreateEventRequestData, EventRequest, RequestStatus, UpdateEventRequestData,
};
use crate::models::department::Department;
use crate::services::department::DepartmentService;
use crate::services::event::EventService;
use crate::services::notification::NotificationService;
use crate::utils::errors::{EventBoardError, Result};
use crate::utils::helpers;

/// Compact view of an event returned with conflict checks
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictingEvent {
    pub id: i64,
    pub title: String,
    pub date_start: String,
    pub time_start: String,
    pub time_end: String,
    pub place: String,
    pub department: Option<Department>,
}

/// A request annotated with resolved departments and, when the cached
/// conflict flag is set, the live conflicting-events list
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestView {
    #[serde(flatten)]
    pub request: EventRequest,
    pub departments: Vec<Department>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_events: Option<Vec<ConflictingEvent>>,
}

/// Result of creating a request: the saved row plus immediate conflict
/// feedback
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRequest {
    #[serde(flatten)]
    pub request: EventRequest,
    pub conflicting_events: Vec<ConflictingEvent>,
}

/// Outcome of a submit call: either the transition, or the unchanged
/// current state when the status did not allow submitting
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SubmitOutcome {
    Transitioned { id: i64, status: RequestStatus },
    Unchanged(Box<RequestView>),
}

/// Outcome of a moderation decision
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationOutcome {
    pub id: i64,
    pub status: RequestStatus,
}

#[derive(Debug, Clone)]
pub struct RequestService {
    db: DatabaseService,
    events: EventService,
    departments: DepartmentService,
    notifications: NotificationService,
}

impl RequestService {
    pub fn new(
        db: DatabaseService,
        events: EventService,
        departments: DepartmentService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            db,
            events,
            departments,
            notifications,
        }
    }

    /// Create a request, computing the conflict flag over its full
    /// date/time window.
    ///
    /// With `auto_approve` (admin-authored) the request starts at
    /// `approved` and its event is materialized immediately; otherwise it
    /// starts at `draft` with no event.
    pub async fn create(
        &self,
        data: CreateEventRequestData,
        auto_approve: bool,
    ) -> Result<CreatedRequest> {
        let conflicts = self
            .events
            .get_conflicting_events(
                data.date_start,
                data.date_end,
                data.time_start,
                data.time_end,
                None,
            )
            .await?;
        let has_conflict = !conflicts.is_empty();

        let status = if auto_approve {
            RequestStatus::Approved
        } else {
            RequestStatus::Draft
        };
        let saved = self.db.requests.create(&data, status, has_conflict).await?;
        info!(
            request_id = saved.id,
            organizer_id = saved.organizer_id,
            status = status.as_str(),
            has_conflict = has_conflict,
            "Event request created"
        );

        let saved = if auto_approve {
            let mut tx = self.db.begin().await?;
            let event = self
                .db
                .events
                .create_with(
                    &mut *tx,
                    &CreateEventData {
                        fields: saved.event_fields(),
                        request_id: Some(saved.id),
                    },
                )
                .await?;
            self.db
                .requests
                .set_event_id_with(&mut *tx, saved.id, event.id)
                .await?;
            let fresh = self
                .db
                .requests
                .find_by_id_with(&mut *tx, saved.id)
                .await?
                .ok_or(EventBoardError::RequestNotFound { id: saved.id })?;
            tx.commit().await?;
            info!(request_id = fresh.id, event_id = event.id, "Request auto-approved and materialized");
            fresh
        } else {
            saved
        };

        let conflicting_events = self.to_conflict_views(conflicts).await?;
        Ok(CreatedRequest {
            request: saved,
            conflicting_events,
        })
    }

    /// Preview conflicts for a window, excluding the event linked to
    /// `exclude_request_id` when given
    pub async fn get_conflicting_events(
        &self,
        date_start: chrono::NaiveDate,
        date_end: chrono::NaiveDate,
        time_start: chrono::NaiveTime,
        time_end: chrono::NaiveTime,
        exclude_request_id: Option<i64>,
    ) -> Result<Vec<ConflictingEvent>> {
        let exclude_event_id = match exclude_request_id {
            Some(request_id) => self
                .db
                .requests
                .find_summary(request_id)
                .await?
                .and_then(|summary| summary.event_id),
            None => None,
        };

        let conflicts = self
            .events
            .get_conflicting_events(date_start, date_end, time_start, time_end, exclude_event_id)
            .await?;

        self.to_conflict_views(conflicts).await
    }

    /// Move a draft or needs-work request to `pending`.
    ///
    /// Silent `None` on a missing row or an organizer mismatch; any other
    /// status returns the unchanged current state (idempotent for
    /// double-submit races).
    pub async fn submit(&self, id: i64, organizer_id: i64) -> Result<Option<SubmitOutcome>> {
        let Some(summary) = self.db.requests.find_summary(id).await? else {
            return Ok(None);
        };
        if summary.organizer_id != organizer_id {
            return Ok(None);
        }
        if !summary.status.can_submit() {
            return Ok(self
                .find_one(id)
                .await?
                .map(|view| SubmitOutcome::Unchanged(Box::new(view))));
        }

        self.db
            .requests
            .set_status(id, RequestStatus::Pending, None)
            .await?;
        info!(request_id = id, organizer_id = organizer_id, "Request submitted for review");

        Ok(Some(SubmitOutcome::Transitioned {
            id,
            status: RequestStatus::Pending,
        }))
    }

    /// List requests, newest first, optionally restricted to one
    /// organizer
    pub async fn find_all(&self, organizer_id: Option<i64>) -> Result<Vec<RequestView>> {
        let requests = self.db.requests.find_all(organizer_id).await?;
        let resolutions = try_join_all(requests.iter().map(|request| {
            self.departments
                .resolve(request.department_id, request.department_ids.as_deref())
        }))
        .await?;

        Ok(requests
            .into_iter()
            .zip(resolutions)
            .map(|(request, departments)| RequestView {
                request,
                departments,
                conflicting_events: None,
            })
            .collect())
    }

    /// Narrow projection for the controller's ownership checks
    pub async fn find_one_for_permission(&self, id: i64) -> Result<Option<RequestSummary>> {
        self.db.requests.find_summary(id).await
    }

    /// Fetch one request. When the cached conflict flag is set, the
    /// conflicting-events list is recomputed live (excluding the request's
    /// own event) for display; the cache itself is not re-persisted.
    pub async fn find_one(&self, id: i64) -> Result<Option<RequestView>> {
        let Some(request) = self.db.requests.find_by_id(id).await? else {
            return Ok(None);
        };

        let departments = self
            .departments
            .resolve(request.department_id, request.department_ids.as_deref())
            .await?;

        let conflicting_events = if request.has_conflict {
            Some(
                self.get_conflicting_events(
                    request.date_start,
                    request.date_end,
                    request.time_start,
                    request.time_end,
                    Some(id),
                )
                .await?,
            )
        } else {
            None
        };

        Ok(Some(RequestView {
            request,
            departments,
            conflicting_events,
        }))
    }

    /// Apply a partial patch.
    ///
    /// When the patch provides `department_ids`, the scalar department
    /// cache is re-derived from it. When an `approved` request with a
    /// linked event is patched to `pending` (a non-admin reopen), the
    /// freshly saved snapshot is pushed into the event in the same
    /// transaction: the calendar reflects the edit immediately while the
    /// request goes back for review.
    pub async fn update(&self, id: i64, data: UpdateEventRequestData) -> Result<RequestView> {
        let existing = self
            .db
            .requests
            .find_by_id(id)
            .await?
            .ok_or(EventBoardError::RequestNotFound { id })?;

        let mut tx = self.db.begin().await?;
        self.db.requests.update_fields_with(&mut *tx, id, &data).await?;

        if let Some(ids) = &data.department_ids {
            let department_id = ids.first().copied();
            self.db
                .requests
                .set_departments_with(&mut *tx, id, department_id, helpers::join_id_list(ids))
                .await?;
        }

        let reopened = existing.status == RequestStatus::Approved
            && data.status == Some(RequestStatus::Pending);
        if reopened {
            if let Some(event_id) = existing.event_id {
                let fresh = self
                    .db
                    .requests
                    .find_by_id_with(&mut *tx, id)
                    .await?
                    .ok_or(EventBoardError::RequestNotFound { id })?;
                self.db
                    .events
                    .update_from_request_with(&mut *tx, event_id, &fresh.event_fields())
                    .await?;
                info!(request_id = id, event_id = event_id, "Approved request reopened; event synced");
            }
        }

        tx.commit().await?;

        self.find_one(id)
            .await?
            .ok_or(EventBoardError::RequestNotFound { id })
    }

    /// Apply a moderation decision.
    ///
    /// Rejection requires a non-empty comment and never touches the linked
    /// event. Approval materializes the event (or re-syncs an existing
    /// one) atomically with the status write. Needs-work stores a field
    /// snapshot so organizers can see what changed during rework.
    pub async fn moderate(
        &self,
        id: i64,
        status: RequestStatus,
        comments: Option<&str>,
    ) -> Result<ModerationOutcome> {
        let request = self
            .db
            .requests
            .find_by_id(id)
            .await?
            .ok_or(EventBoardError::RequestNotFound { id })?;

        if status == RequestStatus::Rejected
            && comments.map(str::trim).map_or(true, str::is_empty)
        {
            return Err(EventBoardError::Validation(
                "A reason is required when rejecting a request".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;
        self.db
            .requests
            .set_status_with(&mut *tx, id, status, comments)
            .await?;

        match status {
            RequestStatus::Approved => {
                let fields = request.event_fields();
                if let Some(event_id) = request.event_id {
                    self.db
                        .events
                        .update_from_request_with(&mut *tx, event_id, &fields)
                        .await?;
                } else {
                    let event: Event = self
                        .db
                        .events
                        .create_with(
                            &mut *tx,
                            &CreateEventData {
                                fields,
                                request_id: Some(id),
                            },
                        )
                        .await?;
                    self.db.requests.set_event_id_with(&mut *tx, id, event.id).await?;
                }
            }
            RequestStatus::NeedsWork => {
                let snapshot = serde_json::to_value(request.event_fields())?;
                self.db
                    .requests
                    .set_revision_snapshot_with(&mut *tx, id, &snapshot)
                    .await?;
            }
            _ => {}
        }

        tx.commit().await?;
        crate::utils::logging::log_moderation(id, status.as_str(), comments.is_some());

        if let Err(e) = self
            .notifications
            .notify_moderation(request.organizer_id, id, status, comments)
            .await
        {
            warn!(request_id = id, error = %e, "Failed to notify organizer of moderation outcome");
        }

        Ok(ModerationOutcome { id, status })
    }

    /// Delete a request, unlinking and deleting its materialized event in
    /// the same transaction.
    ///
    /// The back-reference is cleared first, then the request row goes,
    /// then the event with its dependents.
    pub async fn remove(&self, id: i64) -> Result<()> {
        let event_id = self
            .db
            .requests
            .find_summary(id)
            .await?
            .and_then(|summary| summary.event_id);

        let mut tx = self.db.begin().await?;
        if let Some(event_id) = event_id {
            self.db.events.clear_request_link_with(&mut *tx, event_id).await?;
        }
        self.db.requests.delete_with(&mut *tx, id).await?;
        if let Some(event_id) = event_id {
            self.db
                .subscriptions
                .delete_by_event_with(&mut *tx, event_id)
                .await?;
            self.db
                .change_logs
                .delete_by_event_with(&mut *tx, event_id)
                .await?;
            self.db.events.delete_with(&mut *tx, event_id).await?;
        }
        tx.commit().await?;
        info!(request_id = id, event_id = event_id, "Request removed");

        Ok(())
    }

    /// Count requests awaiting moderation (admin badge)
    pub async fn pending_count(&self) -> Result<i64> {
        self.db.requests.pending_count().await
    }

    /// Shape raw conflicting events into the compact preview view with
    /// the primary department resolved
    async fn to_conflict_views(&self, events: Vec<Event>) -> Result<Vec<ConflictingEvent>> {
        let mut views = Vec::with_capacity(events.len());
        for event in events {
            let department = match event.department_id {
                Some(department_id) => self.db.departments.find_by_id(department_id).await?,
                None => None,
            };
            views.push(ConflictingEvent {
                id: event.id,
                title: event.title.clone(),
                date_start: helpers::format_date(event.date_start),
                time_start: helpers::format_hhmm(event.time_start),
                time_end: helpers::format_hhmm(event.time_end),
                place: event.place.clone(),
                department,
            });
        }

        Ok(views)
    }
}
