use super::{map_error, ApiError};
use crate::models::GeocodeResponse;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use shared::Error;
use tracing::info;

#[derive(Deserialize)]
pub struct GeocodeQuery {
    q: Option<String>,
}

/// GET /api/geocode?q=
pub async fn search_geocode(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Json<GeocodeResponse>, ApiError> {
    let q = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| {
            map_error(Error::InvalidKey(
                "query parameter \"q\" is required".to_string(),
            ))
        })?;

    info!(query = %q, "geocode lookup");

    let data = state.geocoder.search(q).await.map_err(map_error)?;
    Ok(Json(GeocodeResponse { data }))
}
