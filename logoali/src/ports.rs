#![deny(clippy::all)]

use crate::domain::{Address, CacheStats, GeocodeCandidate, ScheduleEntry};
use crate::normalize::CepKey;
use async_trait::async_trait;
use shared::Result;

// Ports are the pluggable seams between the lookup services and the
// storage / upstream adapters.

/// Persisted key→value store with per-row expiry, one instance per domain.
///
/// `get` must treat an existing-but-expired row exactly like a missing one
/// (without deleting it); `put` is a blind upsert that restarts the TTL.
/// Correctness never depends on `sweep_expired` running.
#[async_trait]
pub trait CacheStore<V>: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<V>>;
    async fn put(&self, key: &str, value: &V) -> Result<()>;
    async fn stats(&self) -> Result<CacheStats>;
    async fn sweep_expired(&self) -> Result<u64>;
}

/// Live lookup against the CEP address registry.
#[async_trait]
pub trait AddressFetcher: Send + Sync + 'static {
    async fn fetch(&self, cep: &CepKey) -> Result<Address>;
}

/// Live free-text geocoding.
#[async_trait]
pub trait GeocodeFetcher: Send + Sync + 'static {
    async fn fetch(&self, query: &str) -> Result<Vec<GeocodeCandidate>>;
}

/// Live Cata-Bagulho schedule lookup for a coordinate pair.
///
/// Implementations receive the coordinates exactly as the caller supplied
/// them; rounding to the cache-key precision is the orchestrator's job.
#[async_trait]
pub trait ScheduleFetcher: Send + Sync + 'static {
    async fn fetch(&self, lat: f64, lng: f64) -> Result<Vec<ScheduleEntry>>;
}
