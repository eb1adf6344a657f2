//! Liveness and readiness probes.

use actix_web::{get, web, HttpResponse};
use serde_json::json;

use super::state::HttpState;

/// Process liveness: responds as soon as the server accepts requests.
#[utoipa::path(
    get,
    path = "/healthz/live",
    responses((status = 200, description = "Process is live")),
    tags = ["health"]
)]
#[get("/healthz/live")]
pub async fn live() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "live" }))
}

/// Readiness: probes the hosted store the way the dashboard's
/// connection indicator does.
#[utoipa::path(
    get,
    path = "/healthz/ready",
    responses(
        (status = 200, description = "Store reachable"),
        (status = 503, description = "Store unreachable")
    ),
    tags = ["health"]
)]
#[get("/healthz/ready")]
pub async fn ready(state: web::Data<HttpState>) -> HttpResponse {
    match state.gateway.probe().await {
        Ok(()) => HttpResponse::Ok().json(json!({ "status": "ready" })),
        Err(error) => HttpResponse::ServiceUnavailable()
            .json(json!({ "status": "unavailable", "error": error.message() })),
    }
}
