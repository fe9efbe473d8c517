//! Department handlers

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiResult;
use crate::api::AppState;
use crate::middleware::auth::AuthUser;
use crate::models::department::Department;

/// GET /departments
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<Vec<Department>>> {
    let departments = state.services.department_service.find_all().await?;

    Ok(Json(departments))
}
