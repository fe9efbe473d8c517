//! HTTP API module
//!
//! Router wiring and shared application state. Authorization context is
//! derived per-request from the bearer token; handlers enforce the
//! owner/admin policy on top of it.

pub mod error;
pub mod handlers;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::middleware::auth::{AuthGuard, AuthUser};
use crate::services::ServiceFactory;

use self::error::ApiError;
use self::handlers::{departments, events, notifications, requests, subscriptions};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub services: ServiceFactory,
    pub auth: AuthGuard,
}

impl AppState {
    pub fn new(services: ServiceFactory, auth: AuthGuard) -> Self {
        Self { services, auth }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        state.auth.authenticate(header).map_err(ApiError::from)
    }
}

/// Create the API router.
///
/// Endpoints:
/// - POST   /event-requests                 - create a request
/// - GET    /event-requests                 - list requests (?mine=true)
/// - GET    /event-requests/pending-count   - moderation badge (admin)
/// - GET    /event-requests/check-conflict  - conflict preview
/// - GET    /event-requests/:id             - fetch one request
/// - PATCH  /event-requests/:id             - edit a request
/// - POST   /event-requests/:id/submit      - submit for review
/// - DELETE /event-requests/:id             - delete a request
/// - PATCH  /event-requests/:id/moderate    - approve/reject/needsWork (admin)
/// - GET    /events                         - list published events
/// - GET    /events/:id                     - fetch one event
/// - GET    /departments                    - list departments
/// - GET    /notifications                  - list own notifications
/// - GET    /notifications/unread-count     - unread badge
/// - PATCH  /notifications/read-all         - mark all read
/// - PATCH  /notifications/:id/read         - mark one read
/// - GET    /subscriptions                  - list own subscriptions
/// - POST   /subscriptions/:event_id        - subscribe
/// - DELETE /subscriptions/:event_id        - unsubscribe
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    let router = Router::new()
        .route(
            "/event-requests",
            post(requests::create).get(requests::list),
        )
        .route("/event-requests/pending-count", get(requests::pending_count))
        .route("/event-requests/check-conflict", get(requests::check_conflict))
        .route(
            "/event-requests/:id",
            get(requests::find_one)
                .patch(requests::update)
                .delete(requests::remove),
        )
        .route("/event-requests/:id/submit", post(requests::submit))
        .route("/event-requests/:id/moderate", patch(requests::moderate))
        .route("/events", get(events::list))
        .route("/events/:id", get(events::find_one))
        .route("/departments", get(departments::list))
        .route("/notifications", get(notifications::list))
        .route("/notifications/unread-count", get(notifications::unread_count))
        .route("/notifications/read-all", patch(notifications::mark_all_read))
        .route("/notifications/:id/read", patch(notifications::mark_read))
        .route("/subscriptions", get(subscriptions::list))
        .route(
            "/subscriptions/:event_id",
            post(subscriptions::subscribe).delete(subscriptions::unsubscribe),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let cors = if cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = cors_origins
            .iter()
            .filter_map(|origin| origin.parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_origin(AllowOrigin::list(origins))
    };

    router.layer(cors)
}
