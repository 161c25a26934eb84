use super::{map_error, ApiError};
use crate::models::{
    CacheStatsResponse, LookupMeta, ScheduleResponse, SeedResponse, SeedScheduleRequest,
    SweepResponse,
};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use shared::Error;
use tracing::info;

#[derive(Deserialize)]
pub struct ScheduleQuery {
    lat: Option<String>,
    lng: Option<String>,
}

/// GET /api/cata-bagulho?lat=&lng=
pub async fn search_schedules(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let lat = parse_coord(query.lat, "lat")?;
    let lng = parse_coord(query.lng, "lng")?;
    info!(lat, lng, "schedule lookup");

    let result = state.schedules.lookup(lat, lng).await.map_err(map_error)?;

    Ok(Json(ScheduleResponse {
        data: result.value,
        meta: LookupMeta::new(result.source),
    }))
}

/// GET /api/cata-bagulho/cache/stats
pub async fn schedule_cache_stats(
    State(state): State<AppState>,
) -> Result<Json<CacheStatsResponse>, ApiError> {
    let stats = state.schedules.cache_stats().await.map_err(map_error)?;
    Ok(Json(CacheStatsResponse::new(stats)))
}

/// DELETE /api/cata-bagulho/cache/expired
pub async fn schedule_sweep_expired(
    State(state): State<AppState>,
) -> Result<Json<SweepResponse>, ApiError> {
    let removed = state.schedules.sweep_expired().await.map_err(map_error)?;
    info!(removed, "swept expired schedule cache rows");

    Ok(Json(SweepResponse {
        removed,
        timestamp: Utc::now(),
    }))
}

/// POST /api/cata-bagulho/cache/seed
pub async fn seed_schedules(
    State(state): State<AppState>,
    Json(req): Json<SeedScheduleRequest>,
) -> Result<Json<SeedResponse>, ApiError> {
    require_finite(req.lat, "lat")?;
    require_finite(req.lng, "lng")?;

    let key = state
        .schedules
        .seed(req.lat, req.lng, req.entries)
        .await
        .map_err(map_error)?;

    Ok(Json(SeedResponse { ok: true, key }))
}

fn parse_coord(raw: Option<String>, name: &str) -> Result<f64, ApiError> {
    let raw = raw
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            map_error(Error::InvalidKey(format!(
                "query parameter {:?} is required",
                name
            )))
        })?;

    let value = raw.parse::<f64>().map_err(|_| {
        map_error(Error::InvalidKey(format!(
            "query parameter {:?} must be a number, got {:?}",
            name, raw
        )))
    })?;

    require_finite(value, name)?;
    Ok(value)
}

fn require_finite(value: f64, name: &str) -> Result<(), ApiError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(map_error(Error::InvalidKey(format!(
            "coordinate {:?} must be finite",
            name
        ))))
    }
}
