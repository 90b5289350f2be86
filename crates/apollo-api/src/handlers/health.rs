//! Health check handlers
//!
//! Endpoints for liveness and readiness probes. These answer with plain
//! JSON, outside the envelope.

use axum::{extract::State, http::StatusCode, Json};
use apollo_service::dto::{HealthResponse, ReadinessResponse};
use apollo_service::HealthService;

use crate::state::AppState;

/// Basic health check (liveness probe)
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Readiness check with dependency health
///
/// GET /health/ready
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let response = HealthService::new(state.service_context()).readiness().await;

    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
