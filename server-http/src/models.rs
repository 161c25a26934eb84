use chrono::{DateTime, Utc};
use logoali::domain::{Address, CacheStats, GeocodeCandidate, ScheduleEntry, Source, CACHE_TTL_HOURS};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct HealthResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub storage: String,
    pub timestamp: DateTime<Utc>,
}

/// Provenance attached to every lookup payload.
#[derive(Serialize)]
pub struct LookupMeta {
    pub source: Source,
    pub timestamp: DateTime<Utc>,
}

impl LookupMeta {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Serialize)]
pub struct AddressResponse {
    pub data: Address,
    pub meta: LookupMeta,
}

#[derive(Serialize)]
pub struct ScheduleResponse {
    pub data: Vec<ScheduleEntry>,
    pub meta: LookupMeta,
}

#[derive(Serialize)]
pub struct GeocodeResponse {
    pub data: Vec<GeocodeCandidate>,
}

#[derive(Serialize)]
pub struct CacheStatsResponse {
    pub cache_stats: CacheStats,
    pub cache_ttl_hours: i64,
    pub timestamp: DateTime<Utc>,
}

impl CacheStatsResponse {
    pub fn new(cache_stats: CacheStats) -> Self {
        Self {
            cache_stats,
            cache_ttl_hours: CACHE_TTL_HOURS,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Serialize)]
pub struct SweepResponse {
    pub removed: u64,
    pub timestamp: DateTime<Utc>,
}

/// Seed payload for the address cache: a raw CEP in any spelling plus the
/// address fields to store under its normalized key.
#[derive(Deserialize)]
pub struct SeedAddressRequest {
    pub cep: String,
    #[serde(default)]
    pub logradouro: Option<String>,
    #[serde(default)]
    pub complemento: Option<String>,
    #[serde(default)]
    pub unidade: Option<String>,
    #[serde(default)]
    pub bairro: Option<String>,
    #[serde(default)]
    pub localidade: Option<String>,
    #[serde(default)]
    pub uf: Option<String>,
}

#[derive(Deserialize)]
pub struct SeedScheduleRequest {
    pub lat: f64,
    pub lng: f64,
    pub entries: Vec<ScheduleEntry>,
}

#[derive(Serialize)]
pub struct SeedResponse {
    pub ok: bool,
    /// The normalized key the value was stored under.
    pub key: String,
}

// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

impl From<&shared::Error> for ErrorResponse {
    fn from(err: &shared::Error) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind().to_string(),
        }
    }
}
