//! Dashboard analytics endpoints.

use axum::{Json, extract::State};
use chrono::Utc;

use super::{ApiError, AppState};
use crate::analytics::{
    self, CategoryShare, DashboardMetrics, TREND_DAYS, TrendPoint, category_breakdown,
    dashboard_metrics,
};

pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardMetrics>, ApiError> {
    let inquiries = state.processor.store().list_inquiries(None).await?;
    Ok(Json(dashboard_metrics(&inquiries)))
}

pub async fn trends(State(state): State<AppState>) -> Result<Json<Vec<TrendPoint>>, ApiError> {
    let inquiries = state.processor.store().list_inquiries(None).await?;
    let today = Utc::now().date_naive();
    Ok(Json(analytics::trends(&inquiries, today, TREND_DAYS)))
}

pub async fn categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryShare>>, ApiError> {
    let store = state.processor.store();
    let inquiries = store.list_inquiries(None).await?;
    let categories = store.list_categories().await?;
    Ok(Json(category_breakdown(&inquiries, &categories)))
}
