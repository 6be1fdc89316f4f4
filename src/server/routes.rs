//! Route handlers.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{error::ApiError, AppState};
use crate::data::{AppId, AppList, Resolution};

/// Query string of the app details route
#[derive(Debug, Deserialize)]
pub struct AppDetailsQuery {
    pub appids: Option<String>,
}

/// Body of the app list route
#[derive(Debug, Serialize)]
pub struct AppListResponse {
    pub applist: AppList,
}

/// `GET /api/appdetails?appids=<id>`
///
/// Always answers 200 once the id is valid; upstream failures come back as the
/// degraded payload rather than an error status.
pub async fn app_details(
    State(state): State<AppState>,
    query: Result<Query<AppDetailsQuery>, QueryRejection>,
) -> Result<Json<Resolution>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let id = AppId::parse(query.appids.as_deref().unwrap_or_default())?;

    Ok(Json(state.app_details.resolve(&id).await))
}

/// `GET /api/steamapps/getapplist/v2`
pub async fn app_list(State(state): State<AppState>) -> Json<AppListResponse> {
    Json(AppListResponse {
        applist: state.app_list.list_all(),
    })
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn fallback() -> ApiError {
    ApiError::NotFound
}
