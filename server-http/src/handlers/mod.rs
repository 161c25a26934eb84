mod catabagulho;
mod cep;
mod geocode;
mod health;

pub use catabagulho::{
    schedule_cache_stats, schedule_sweep_expired, search_schedules, seed_schedules,
};
pub use cep::{cep_cache_stats, cep_sweep_expired, lookup_cep, seed_address};
pub use geocode::search_geocode;
pub use health::{health_check, status};

use crate::models::ErrorResponse;
use axum::http::StatusCode;
use axum::Json;

pub(crate) type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map the shared error taxonomy onto HTTP statuses. `ParseError` shares
/// 502 with `UpstreamUnavailable` but keeps its own `kind`, so operators
/// can tell "site is down" apart from "site changed its markup".
pub(crate) fn map_error(err: shared::Error) -> ApiError {
    let status = match &err {
        shared::Error::InvalidKey(_) => StatusCode::BAD_REQUEST,
        shared::Error::NotFound(_) => StatusCode::NOT_FOUND,
        shared::Error::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
        shared::Error::ParseError(_) => StatusCode::BAD_GATEWAY,
        shared::Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse::from(&err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Error;

    #[test]
    fn statuses_follow_the_error_taxonomy() {
        let cases = [
            (Error::InvalidKey("x".into()), StatusCode::BAD_REQUEST),
            (Error::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                Error::UpstreamUnavailable("x".into()),
                StatusCode::BAD_GATEWAY,
            ),
            (Error::ParseError("x".into()), StatusCode::BAD_GATEWAY),
            (Error::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            let kind = err.kind();
            let (status, Json(body)) = map_error(err);
            assert_eq!(status, expected);
            assert_eq!(body.kind, kind);
        }
    }
}
