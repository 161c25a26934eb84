// shared/src/lib.rs

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Malformed lookup input. Never reaches the cache or an upstream.
    #[error("invalid key: {0}")]
    InvalidKey(String),
    /// The upstream authoritatively reported that no data exists.
    #[error("not found: {0}")]
    NotFound(String),
    /// Network failure, timeout or non-2xx from an upstream. Transient.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    /// The upstream responded but its payload no longer matches the
    /// structure the parser expects. Distinct from unavailability so
    /// "site is down" and "site changed its markup" are tellable apart.
    #[error("upstream payload changed shape: {0}")]
    ParseError(String),
    /// Storage or serialization fault inside the cache layer.
    #[error("internal: {0}")]
    Internal(String),
}

impl Error {
    /// Stable machine-checkable discriminant for API payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidKey(_) => "invalid_key",
            Error::NotFound(_) => "not_found",
            Error::UpstreamUnavailable(_) => "upstream_unavailable",
            Error::ParseError(_) => "parse_error",
            Error::Internal(_) => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod config;
