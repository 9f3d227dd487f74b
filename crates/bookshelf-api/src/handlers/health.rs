//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use bookshelf_core::traits::cache::CacheProvider;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /health
///
/// Responds 503 when the cache or database is unreachable.
pub async fn health(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let cache = state.cache.health_check().await.unwrap_or_else(|e| {
        warn!(error = %e, "Cache health check failed");
        false
    });
    let database = state.database.health_check().await.unwrap_or_else(|e| {
        warn!(error = %e, "Database health check failed");
        false
    });

    let healthy = cache && database;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ApiResponse {
            success: healthy,
            data: HealthResponse {
                status: if healthy { "ok" } else { "degraded" }.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                cache,
                database,
            },
        }),
    )
}
