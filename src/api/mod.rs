//! REST + WebSocket surface for the triage dashboard.

pub mod analytics;
pub mod categories;
pub mod extract;
pub mod inquiries;
pub mod templates;
pub mod ws;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, TriageError};
use crate::triage::InquiryProcessor;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<InquiryProcessor>,
    /// Recent inquiries pushed to a live-feed client on connect.
    pub feed_sync_limit: usize,
}

/// Build the Axum router with all dashboard routes.
pub fn routes(processor: Arc<InquiryProcessor>, feed_sync_limit: usize) -> Router {
    let state = AppState {
        processor,
        feed_sync_limit,
    };

    Router::new()
        .route("/health", get(health))
        .route("/ws", get(ws::ws_handler))
        .route(
            "/api/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/api/categories/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/api/response-templates",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/api/response-templates/{id}",
            put(templates::update_template).delete(templates::delete_template),
        )
        .route(
            "/api/inquiries",
            get(inquiries::list_inquiries).post(inquiries::create_inquiry),
        )
        .route(
            "/api/inquiries/{id}/satisfaction",
            put(inquiries::rate_inquiry),
        )
        .route(
            "/api/inquiries/{id}/escalate",
            post(inquiries::escalate_inquiry),
        )
        .route(
            "/api/inquiries/{id}/respond",
            post(inquiries::respond_to_inquiry),
        )
        .route("/api/match/preview", post(inquiries::preview_match))
        .route("/api/analytics/dashboard", get(analytics::dashboard))
        .route("/api/analytics/trends", get(analytics::trends))
        .route("/api/analytics/categories", get(analytics::categories))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "support-triage"
    }))
}

// ── Errors ──────────────────────────────────────────────────────────────

/// Handler error rendered as `{"message": ...}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            StoreError::Validation { .. } | StoreError::InvalidTransition { .. } => {
                Self::BadRequest(err.to_string())
            }
        }
    }
}

impl From<TriageError> for ApiError {
    fn from(err: TriageError) -> Self {
        match err {
            TriageError::Store(inner) => inner.into(),
            TriageError::ScoreOutOfRange(_) | TriageError::EmptyResponse => {
                Self::BadRequest(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (Self::BadRequest(message) | Self::NotFound(message)) = self;
        debug!(status = %status, message = %message, "Request rejected");
        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

/// Parse a path id, rejecting malformed ones with 400.
pub(crate) fn parse_id(raw: &str, entity: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid {entity} ID")))
}
