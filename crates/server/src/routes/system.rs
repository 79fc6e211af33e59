use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use common::types::Health;
use tracing::{error, warn};

use crate::auth::ServerState;

/// Liveness plus a database ping.
#[utoipa::path(get, path = "/health", tag = "health",
    responses((status = 200, description = "Service and database up", body = crate::openapi::HealthResponse), (status = 503, description = "Database unreachable")))]
pub async fn health(State(state): State<ServerState>) -> (StatusCode, Json<Health>) {
    match models::db::test_connection(&state.db).await {
        Ok(()) => (StatusCode::OK, Json(Health { status: "ok".into(), database: "up".into() })),
        Err(e) => {
            warn!(error = %e, "health check: database down");
            (StatusCode::SERVICE_UNAVAILABLE, Json(Health { status: "degraded".into(), database: "down".into() }))
        }
    }
}

/// Prometheus text exposition.
pub async fn metrics() -> impl IntoResponse {
    match common::metrics::gather_text() {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body),
        Err(e) => {
            error!(error = %e, "metrics encode failed");
            (StatusCode::INTERNAL_SERVER_ERROR, [(header::CONTENT_TYPE, "text/plain")], format!("metrics encode error: {e}"))
        }
    }
}
