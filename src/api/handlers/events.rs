//! Published event handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiResult;
use crate::api::AppState;
use crate::middleware::auth::AuthUser;
use crate::services::event::EventWithDepartments;
use crate::utils::errors::EventBoardError;
use crate::utils::helpers;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListQuery {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// GET /events?startDate=...&endDate=...
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<EventListQuery>,
) -> ApiResult<Json<Vec<EventWithDepartments>>> {
    let start_date = query
        .start_date
        .as_deref()
        .map(helpers::parse_date)
        .transpose()?;
    let end_date = query
        .end_date
        .as_deref()
        .map(helpers::parse_date)
        .transpose()?;

    let events = state.services.event_service.find_all(start_date, end_date).await?;

    Ok(Json(events))
}

/// GET /events/:id
pub async fn find_one(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<EventWithDepartments>> {
    let event = state
        .services
        .event_service
        .find_one(id)
        .await?
        .ok_or(EventBoardError::EventNotFound { id })?;

    Ok(Json(event))
}
