use super::{map_error, ApiError};
use crate::models::{
    AddressResponse, CacheStatsResponse, LookupMeta, SeedAddressRequest, SeedResponse,
    SweepResponse,
};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use logoali::domain::Address;
use logoali::normalize::CepKey;
use tracing::info;

/// GET /api/cep/{cep}
pub async fn lookup_cep(
    State(state): State<AppState>,
    Path(cep): Path<String>,
) -> Result<Json<AddressResponse>, ApiError> {
    info!(%cep, "address lookup");

    let result = state.addresses.lookup(&cep).await.map_err(map_error)?;

    Ok(Json(AddressResponse {
        data: result.value,
        meta: LookupMeta::new(result.source),
    }))
}

/// GET /api/cep/cache/stats
pub async fn cep_cache_stats(
    State(state): State<AppState>,
) -> Result<Json<CacheStatsResponse>, ApiError> {
    let stats = state.addresses.cache_stats().await.map_err(map_error)?;
    Ok(Json(CacheStatsResponse::new(stats)))
}

/// DELETE /api/cep/cache/expired
pub async fn cep_sweep_expired(
    State(state): State<AppState>,
) -> Result<Json<SweepResponse>, ApiError> {
    let removed = state.addresses.sweep_expired().await.map_err(map_error)?;
    info!(removed, "swept expired address cache rows");

    Ok(Json(SweepResponse {
        removed,
        timestamp: Utc::now(),
    }))
}

/// POST /api/cep/cache/seed
///
/// Writes straight into the store, bypassing the fetch path. Exists for
/// deterministic test fixtures, not for production traffic.
pub async fn seed_address(
    State(state): State<AppState>,
    Json(req): Json<SeedAddressRequest>,
) -> Result<Json<SeedResponse>, ApiError> {
    let key = CepKey::parse(&req.cep).map_err(map_error)?;

    let address = Address {
        cep: key.hyphenated(),
        logradouro: req.logradouro,
        complemento: req.complemento,
        unidade: req.unidade,
        bairro: req.bairro,
        localidade: req.localidade,
        uf: req.uf,
    };

    let key = state
        .addresses
        .seed(key.as_str(), address)
        .await
        .map_err(map_error)?;

    Ok(Json(SeedResponse { ok: true, key }))
}
