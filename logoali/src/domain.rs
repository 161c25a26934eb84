use serde::{Deserialize, Serialize};

/// Fixed TTL for both cached domains. Not externally configurable.
pub const CACHE_TTL_HOURS: i64 = 24;

/// A street address as resolved from the ViaCEP registry.
///
/// Field names follow the ViaCEP payload so cached rows and live responses
/// serialize identically. Everything except the postal code is optional;
/// the registry frequently omits fields for rural or generic codes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Canonical hyphenated form, `NNNNN-NNN`.
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

/// One Cata-Bagulho collection entry scraped from the LOCAT results page.
///
/// Everything is free text; the upstream has no structured schema and the
/// granularity of `dates` varies by district.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub street: String,
    pub start_stretch: String,
    pub end_stretch: String,
    pub dates: Vec<String>,
    pub frequency: String,
    pub shift: String,
    /// Collection time window, e.g. "06:00 às 14:00".
    pub schedule: String,
}

/// A single geocoding candidate, coordinates exactly as the provider
/// returned them. Rounding happens only at the cache-key boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeocodeCandidate {
    pub place_id: u64,
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
}

/// Row counts for one cache domain, computed at call time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub total: u64,
    pub valid: u64,
    pub expired: u64,
}

/// Where a lookup result came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cache,
    Api,
}

/// A lookup result annotated with its provenance.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Sourced<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Sourced<T> {
    pub fn cache(value: T) -> Self {
        Self {
            value,
            source: Source::Cache,
        }
    }

    pub fn api(value: T) -> Self {
        Self {
            value,
            source: Source::Api,
        }
    }
}
