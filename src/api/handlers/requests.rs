//! Event request handlers
//!
//! The engine leaves ownership policy to this layer: non-owners cannot
//! touch a request, non-admins cannot delete one that already has a
//! linked event, and a non-admin edit of an approved request forces a
//! requeue to pending.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::api::error::{ApiError, ApiResult};
use crate::api::AppState;
use crate::middleware::auth::AuthUser;
use crate::models::event::EventFormat;
use crate::models::request::{CreateEventRequestData, RequestStatus, UpdateEventRequestData};
use crate::services::request::{
    ConflictingEvent, CreatedRequest, ModerationOutcome, RequestView, SubmitOutcome,
};
use crate::utils::errors::EventBoardError;
use crate::utils::helpers;

const DEFAULT_TIME_START: &str = "00:00";
const DEFAULT_TIME_END: &str = "23:59";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestPayload {
    pub title: String,
    #[serde(default)]
    pub date_start: Option<String>,
    #[serde(default)]
    pub date_end: Option<String>,
    #[serde(default)]
    pub time_start: Option<String>,
    #[serde(default)]
    pub time_end: Option<String>,
    pub place: String,
    pub format: EventFormat,
    #[serde(default)]
    pub department_id: Option<i64>,
    #[serde(default)]
    pub department_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub limit_participants: Option<i32>,
    pub description: String,
    #[serde(default)]
    pub post_link: Option<String>,
    #[serde(default)]
    pub reg_link: Option<String>,
    #[serde(default)]
    pub responsible_link: Option<String>,
    #[serde(default)]
    pub repeat: Option<serde_json::Value>,
}

impl CreateRequestPayload {
    fn into_data(self, organizer_id: i64) -> Result<CreateEventRequestData, EventBoardError> {
        let today = Utc::now().date_naive();
        let date_start = match self.date_start.as_deref() {
            Some(value) => helpers::parse_date(value)?,
            None => today,
        };
        let date_end = match self.date_end.as_deref() {
            Some(value) => helpers::parse_date(value)?,
            None => date_start,
        };
        let time_start =
            helpers::parse_hhmm(self.time_start.as_deref().unwrap_or(DEFAULT_TIME_START))?;
        let time_end = helpers::parse_hhmm(self.time_end.as_deref().unwrap_or(DEFAULT_TIME_END))?;

        Ok(CreateEventRequestData {
            organizer_id,
            title: self.title,
            date_start,
            date_end,
            time_start,
            time_end,
            place: self.place,
            format: self.format,
            department_id: self.department_id,
            department_ids: self.department_ids,
            labels: self.labels,
            limit_participants: self.limit_participants,
            description: self.description,
            post_link: self.post_link,
            reg_link: self.reg_link,
            responsible_link: self.responsible_link,
            repeat: self.repeat,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequestPayload {
    #[serde(default)]
    pub status: Option<RequestStatus>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date_start: Option<String>,
    #[serde(default)]
    pub date_end: Option<String>,
    #[serde(default)]
    pub time_start: Option<String>,
    #[serde(default)]
    pub time_end: Option<String>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub format: Option<EventFormat>,
    #[serde(default)]
    pub department_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub limit_participants: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub post_link: Option<String>,
    #[serde(default)]
    pub reg_link: Option<String>,
    #[serde(default)]
    pub responsible_link: Option<String>,
    #[serde(default)]
    pub repeat: Option<serde_json::Value>,
}

impl UpdateRequestPayload {
    fn into_data(self) -> Result<UpdateEventRequestData, EventBoardError> {
        Ok(UpdateEventRequestData {
            status: self.status,
            title: self.title,
            date_start: self.date_start.as_deref().map(helpers::parse_date).transpose()?,
            date_end: self.date_end.as_deref().map(helpers::parse_date).transpose()?,
            time_start: self.time_start.as_deref().map(helpers::parse_hhmm).transpose()?,
            time_end: self.time_end.as_deref().map(helpers::parse_hhmm).transpose()?,
            place: self.place,
            format: self.format,
            department_ids: self.department_ids,
            labels: self.labels,
            limit_participants: self.limit_participants,
            description: self.description,
            post_link: self.post_link,
            reg_link: self.reg_link,
            responsible_link: self.responsible_link,
            repeat: self.repeat,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub mine: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckConflictQuery {
    #[serde(default)]
    pub date_start: Option<String>,
    #[serde(default)]
    pub date_end: Option<String>,
    #[serde(default)]
    pub time_start: Option<String>,
    #[serde(default)]
    pub time_end: Option<String>,
    #[serde(default)]
    pub request_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeratePayload {
    pub status: RequestStatus,
    #[serde(default)]
    pub comments: Option<String>,
}

/// POST /event-requests
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRequestPayload>,
) -> ApiResult<Json<CreatedRequest>> {
    let auto_approve = user.is_admin();
    let data = payload.into_data(user.id)?;
    let created = state.services.request_service.create(data, auto_approve).await?;

    Ok(Json(created))
}

/// GET /event-requests?mine=true
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<RequestView>>> {
    let force_own = query.mine.as_deref() == Some("true");
    let organizer_id = if force_own || !user.is_admin() {
        Some(user.id)
    } else {
        None
    };
    let requests = state.services.request_service.find_all(organizer_id).await?;

    Ok(Json(requests))
}

/// GET /event-requests/pending-count
pub async fn pending_count(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    require_admin(&user)?;
    let count = state.services.request_service.pending_count().await?;

    Ok(Json(json!({ "count": count })))
}

/// GET /event-requests/check-conflict
pub async fn check_conflict(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<CheckConflictQuery>,
) -> ApiResult<Json<Vec<ConflictingEvent>>> {
    let today = Utc::now().date_naive();
    let date_start = match query.date_start.as_deref() {
        Some(value) if !value.is_empty() => helpers::parse_date(value)?,
        _ => today,
    };
    let date_end = match query.date_end.as_deref() {
        Some(value) if !value.is_empty() => helpers::parse_date(value)?,
        _ => date_start,
    };
    let time_start =
        helpers::parse_hhmm(query.time_start.as_deref().unwrap_or(DEFAULT_TIME_START))?;
    let time_end = helpers::parse_hhmm(query.time_end.as_deref().unwrap_or(DEFAULT_TIME_END))?;

    let conflicts = state
        .services
        .request_service
        .get_conflicting_events(date_start, date_end, time_start, time_end, query.request_id)
        .await?;

    Ok(Json(conflicts))
}

/// GET /event-requests/:id
pub async fn find_one(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<RequestView>> {
    let view = state
        .services
        .request_service
        .find_one(id)
        .await?
        .ok_or(EventBoardError::RequestNotFound { id })?;

    Ok(Json(view))
}

/// PATCH /event-requests/:id
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRequestPayload>,
) -> ApiResult<Json<RequestView>> {
    let existing = state
        .services
        .request_service
        .find_one_for_permission(id)
        .await?
        .ok_or(EventBoardError::RequestNotFound { id })?;

    if !user.is_admin() && existing.organizer_id != user.id {
        return Err(ApiError(EventBoardError::PermissionDenied(
            "Only the request owner or an admin can edit a request".to_string(),
        )));
    }

    let was_approved = existing.status == RequestStatus::Approved;
    let result = state
        .services
        .request_service
        .update(id, payload.into_data()?)
        .await?;

    // Non-admin edits of an approved request requeue it for review; the
    // event sync happens on the approved -> pending transition.
    if was_approved && !user.is_admin() {
        let requeue = UpdateEventRequestData {
            status: Some(RequestStatus::Pending),
            ..Default::default()
        };
        let view = state.services.request_service.update(id, requeue).await?;
        return Ok(Json(view));
    }

    Ok(Json(result))
}

/// POST /event-requests/:id/submit
pub async fn submit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Option<SubmitOutcome>>> {
    let outcome = state.services.request_service.submit(id, user.id).await?;

    Ok(Json(outcome))
}

/// DELETE /event-requests/:id
pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let existing = state
        .services
        .request_service
        .find_one_for_permission(id)
        .await?
        .ok_or(EventBoardError::RequestNotFound { id })?;

    if !user.is_admin() && existing.organizer_id != user.id {
        return Err(ApiError(EventBoardError::PermissionDenied(
            "Cannot delete someone else's request".to_string(),
        )));
    }
    if !user.is_admin() && existing.event_id.is_some() {
        return Err(ApiError(EventBoardError::PermissionDenied(
            "Approved events cannot be deleted. Contact an administrator.".to_string(),
        )));
    }

    state.services.request_service.remove(id).await?;

    Ok(Json(json!({ "success": true })))
}

/// PATCH /event-requests/:id/moderate
pub async fn moderate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<ModeratePayload>,
) -> ApiResult<Json<ModerationOutcome>> {
    require_admin(&user)?;
    let outcome = state
        .services
        .request_service
        .moderate(id, payload.status, payload.comments.as_deref())
        .await?;

    Ok(Json(outcome))
}

fn require_admin(user: &AuthUser) -> Result<(), ApiError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ApiError(EventBoardError::PermissionDenied(
            "Admin privileges required".to_string(),
        )))
    }
}
