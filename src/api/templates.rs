//! Response template CRUD, search and category filter.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use super::extract::{ApiJson, ApiQuery};
use super::{ApiError, AppState, parse_id};
use crate::model::{NewTemplate, ResponseTemplate, TemplatePatch};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateQuery {
    search: Option<String>,
    category_id: Option<Uuid>,
}

/// `?search=` wins over `?categoryId=`; neither lists everything.
pub async fn list_templates(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TemplateQuery>,
) -> Result<Json<Vec<ResponseTemplate>>, ApiError> {
    let store = state.processor.store();
    let templates = match (query.search.filter(|s| !s.is_empty()), query.category_id) {
        (Some(search), _) => store.search_templates(&search).await?,
        (None, Some(category_id)) => store.list_templates_by_category(category_id).await?,
        (None, None) => store.list_templates().await?,
    };
    Ok(Json(templates))
}

pub async fn create_template(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewTemplate>,
) -> Result<impl IntoResponse, ApiError> {
    let template = state.processor.store().create_template(body).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<TemplatePatch>,
) -> Result<Json<ResponseTemplate>, ApiError> {
    let id = parse_id(&id, "template")?;
    state
        .processor
        .store()
        .update_template(id, body)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Response template not found".into()))
}

pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "template")?;
    if !state.processor.store().delete_template(id).await? {
        return Err(ApiError::NotFound("Response template not found".into()));
    }
    Ok(Json(
        serde_json::json!({"message": "Response template deleted successfully"}),
    ))
}
