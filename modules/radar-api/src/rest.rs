use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::warn;

use radar_common::Region;

use crate::AppState;

// --- Query structs ---

#[derive(Deserialize)]
pub struct VenuesQuery {
    limit: Option<u32>,
    offset: Option<u32>,
}

#[derive(Deserialize)]
pub struct RankingQuery {
    limit: Option<u32>,
}

#[derive(Deserialize)]
pub struct ScanRequest {
    query: String,
    city: Option<String>,
}

// --- Handlers ---

pub async fn api_health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

pub async fn api_venues(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VenuesQuery>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(50).min(200) as i64;
    let offset = params.offset.unwrap_or(0) as i64;
    match state.store.list_venues(limit, offset).await {
        Ok(venues) => Json(serde_json::json!({ "venues": venues })).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to list venues");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn api_region_ranking(
    State(state): State<Arc<AppState>>,
    Path(region): Path<String>,
    Query(params): Query<RankingQuery>,
) -> impl IntoResponse {
    let Some(region) = Region::from_str_loose(&region) else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": format!("Unknown region: {region}")})),
        )
            .into_response();
    };
    let limit = params.limit.unwrap_or(20).min(100) as i64;
    match state.store.ranked_venues(Some(region), limit).await {
        Ok(venues) => Json(serde_json::json!({
            "region": region.as_str(),
            "venues": venues,
        }))
        .into_response(),
        Err(e) => {
            warn!(error = %e, region = region.as_str(), "Failed to rank venues");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Answer immediately; any actual scanning happens in the background.
pub async fn api_scan(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ScanRequest>,
) -> impl IntoResponse {
    let query = body.query.trim();
    if query.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "query must not be empty"})),
        )
            .into_response();
    }
    let city = body.city.as_deref().map(str::trim).filter(|c| !c.is_empty());
    let found = state.scheduler.trigger_scan_if_missing(query, city).await;
    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "found": found })),
    )
        .into_response()
}
