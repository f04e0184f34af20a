//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Record source reachable
/// - **503 Service Unavailable**: Record source unreachable
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "source": { "status": "ok", "message": "csv reachable" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let source_check = match state.chart_service.health().await {
        Ok(()) => CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("{} reachable", state.source)),
        },
        Err(e) => CheckStatus {
            status: "error".to_string(),
            message: Some(format!("{}: {}", state.source, e)),
        },
    };

    let healthy = source_check.status == "ok";
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            source: source_check,
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
