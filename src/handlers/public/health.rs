// handlers/public/health.rs - GET /api/health handler

use axum::extract::State;
use serde::Serialize;

use crate::middleware::{ApiResponse, ApiResult};
use crate::routes::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: String,
    pub database: &'static str,
}

/// GET /api/health - liveness probe, always 200
///
/// Storage trouble is reported in the body rather than the status code so
/// the probe itself never fails.
pub async fn health_get(State(state): State<AppState>) -> ApiResult<HealthStatus> {
    let database = match state.db.health_check().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            "unavailable"
        }
    };

    Ok(ApiResponse::success(HealthStatus {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        database,
    }))
}
