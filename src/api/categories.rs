//! Category CRUD.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::extract::ApiJson;
use super::{ApiError, AppState, parse_id};
use crate::model::{Category, CategoryPatch, NewCategory};

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state.processor.store().list_categories().await?;
    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewCategory>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state.processor.store().create_category(body).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    let id = parse_id(&id, "category")?;
    state
        .processor
        .store()
        .get_category(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Category not found".into()))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<CategoryPatch>,
) -> Result<Json<Category>, ApiError> {
    let id = parse_id(&id, "category")?;
    state
        .processor
        .store()
        .update_category(id, body)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Category not found".into()))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "category")?;
    if !state.processor.store().delete_category(id).await? {
        return Err(ApiError::NotFound("Category not found".into()));
    }
    Ok(Json(serde_json::json!({"message": "Category deleted successfully"})))
}
