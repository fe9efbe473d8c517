//! Subscription handlers

use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;

use crate::api::error::ApiResult;
use crate::api::AppState;
use crate::middleware::auth::AuthUser;
use crate::models::subscription::Subscription;

/// POST /subscriptions/:event_id
pub async fn subscribe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_id): Path<i64>,
) -> ApiResult<Json<Subscription>> {
    let subscription = state
        .services
        .subscription_service
        .subscribe(user.id, event_id)
        .await?;

    Ok(Json(subscription))
}

/// DELETE /subscriptions/:event_id
pub async fn unsubscribe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    state
        .services
        .subscription_service
        .unsubscribe(user.id, event_id)
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// GET /subscriptions
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Subscription>>> {
    let subscriptions = state
        .services
        .subscription_service
        .find_for_user(user.id)
        .await?;

    Ok(Json(subscriptions))
}
