//! Health check handlers.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::dto::response::{ComponentHealth, DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/health/detailed
pub async fn health_detailed(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    let database_ok = state.database.health_check().await.unwrap_or_else(|e| {
        warn!(error = %e, "Database health check failed");
        false
    });
    let storage_ok = state.storage.health_check().await.unwrap_or_else(|e| {
        warn!(error = %e, "Storage health check failed");
        false
    });
    let folders = if database_ok {
        state.database.folders().count().await.ok()
    } else {
        None
    };

    Json(DetailedHealthResponse {
        status: if database_ok && storage_ok { "ok" } else { "degraded" }.to_string(),
        database: ComponentHealth {
            provider: state.database.provider().to_string(),
            healthy: database_ok,
        },
        storage: ComponentHealth {
            provider: state.storage.provider_type().to_string(),
            healthy: storage_ok,
        },
        folders,
    })
}
