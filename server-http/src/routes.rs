use crate::handlers;
use crate::state::AppState;
use axum::http::HeaderValue;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;

/// Build and configure the application router
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        // Health and status
        .route("/health", get(handlers::health_check))
        .route("/api/status", get(handlers::status))
        // Address (ViaCEP) routes
        .route("/api/cep/cache/stats", get(handlers::cep_cache_stats))
        .route("/api/cep/cache/expired", delete(handlers::cep_sweep_expired))
        .route("/api/cep/cache/seed", post(handlers::seed_address))
        .route("/api/cep/{cep}", get(handlers::lookup_cep))
        // Cata-Bagulho schedule routes
        .route("/api/cata-bagulho", get(handlers::search_schedules))
        .route(
            "/api/cata-bagulho/cache/stats",
            get(handlers::schedule_cache_stats),
        )
        .route(
            "/api/cata-bagulho/cache/expired",
            delete(handlers::schedule_sweep_expired),
        )
        .route("/api/cata-bagulho/cache/seed", post(handlers::seed_schedules))
        // Geocoding (uncached pass-through)
        .route("/api/geocode", get(handlers::search_geocode))
        // Middleware
        .layer(NormalizePathLayer::trim_trailing_slash())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
