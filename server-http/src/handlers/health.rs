use crate::models::{HealthResponse, StatusResponse};
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Backend is running!".to_string(),
    })
}

/// GET /api/status
///
/// Probes the persisted stores so a broken data directory shows up here
/// instead of as silent cache misses on every lookup.
pub async fn status(State(state): State<AppState>) -> (StatusCode, Json<StatusResponse>) {
    let storage_ok = state.addresses.cache_stats().await.is_ok()
        && state.schedules.cache_stats().await.is_ok();

    let (code, storage) = if storage_ok {
        (StatusCode::OK, "Connected")
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "Disconnected")
    };

    (
        code,
        Json(StatusResponse {
            status: "Backend is running!".to_string(),
            storage: storage.to_string(),
            timestamp: Utc::now(),
        }),
    )
}
