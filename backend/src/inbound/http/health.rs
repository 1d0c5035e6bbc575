//! Liveness and readiness probes.

use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use super::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Ok,
    Unavailable,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct HealthResponse {
    status: HealthStatus,
}

/// GET /health/live — the process is up and serving.
#[utoipa::path(
    get,
    path = "/health/live",
    responses((status = 200, description = "Process is up and serving", body = HealthResponse)),
    tags = ["health"],
    operation_id = "healthLive"
)]
pub async fn live() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: HealthStatus::Ok,
    })
}

/// GET /health/ready — the database pool can hand out a connection.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Database pool is reachable", body = HealthResponse),
        (status = 503, description = "Database pool cannot hand out a connection", body = HealthResponse)
    ),
    tags = ["health"],
    operation_id = "healthReady"
)]
pub async fn ready(state: web::Data<AppState>) -> HttpResponse {
    match state.pool.get().await {
        Ok(_) => HttpResponse::Ok().json(HealthResponse {
            status: HealthStatus::Ok,
        }),
        Err(error) => {
            warn!(error = %error, "readiness check failed");
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: HealthStatus::Unavailable,
            })
        }
    }
}
