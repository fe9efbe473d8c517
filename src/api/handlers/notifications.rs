//! Notification handlers

use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;

use crate::api::error::ApiResult;
use crate::api::AppState;
use crate::middleware::auth::AuthUser;
use crate::models::notification::Notification;

/// GET /notifications
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Notification>>> {
    let notifications = state
        .services
        .notification_service
        .find_for_user(user.id)
        .await?;

    Ok(Json(notifications))
}

/// GET /notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    let count = state
        .services
        .notification_service
        .unread_count(user.id)
        .await?;

    Ok(Json(json!({ "count": count })))
}

/// PATCH /notifications/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    state.services.notification_service.mark_read(id).await?;

    Ok(Json(json!({ "success": true })))
}

/// PATCH /notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    state
        .services
        .notification_service
        .mark_all_read(user.id)
        .await?;

    Ok(Json(json!({ "success": true })))
}
