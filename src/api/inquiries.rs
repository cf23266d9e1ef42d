//! Inquiry logging, replies, ratings and match preview.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use super::extract::{ApiJson, ApiQuery};
use super::{ApiError, AppState, parse_id};
use crate::model::{Inquiry, NewInquiry};
use crate::triage::processor::{ManualResponse, MatchPreview};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    limit: Option<usize>,
}

pub async fn list_inquiries(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<Inquiry>>, ApiError> {
    let inquiries = state.processor.store().list_inquiries(query.limit).await?;
    Ok(Json(inquiries))
}

/// Log an inquiry; the response carries the automated reply when one matched.
pub async fn create_inquiry(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewInquiry>,
) -> Result<impl IntoResponse, ApiError> {
    let inquiry = state.processor.submit(body).await?;
    Ok((StatusCode::CREATED, Json(inquiry)))
}

#[derive(Deserialize)]
pub struct RatingRequest {
    score: f64,
}

pub async fn rate_inquiry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<RatingRequest>,
) -> Result<Json<Inquiry>, ApiError> {
    let id = parse_id(&id, "inquiry")?;
    Ok(Json(state.processor.rate(id, body.score).await?))
}

pub async fn escalate_inquiry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Inquiry>, ApiError> {
    let id = parse_id(&id, "inquiry")?;
    Ok(Json(state.processor.escalate(id).await?))
}

pub async fn respond_to_inquiry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ManualResponse>,
) -> Result<Json<Inquiry>, ApiError> {
    let id = parse_id(&id, "inquiry")?;
    Ok(Json(state.processor.respond_manually(id, body).await?))
}

#[derive(Deserialize)]
pub struct PreviewRequest {
    message: String,
}

pub async fn preview_match(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<PreviewRequest>,
) -> Result<Json<MatchPreview>, ApiError> {
    Ok(Json(state.processor.preview(body.message.trim()).await?))
}
