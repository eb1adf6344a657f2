//! Dashboard summary handler.

use actix_web::{get, web};

use crate::domain::gateway::DashboardSummary;

use super::error::ApiResult;
use super::state::HttpState;

/// Counts for the dashboard landing page stat cards.
#[utoipa::path(
    get,
    path = "/api/v1/summary",
    responses((status = 200, description = "Dashboard counts", body = DashboardSummary)),
    tags = ["dashboard"]
)]
#[get("/summary")]
pub async fn summary(state: web::Data<HttpState>) -> ApiResult<web::Json<DashboardSummary>> {
    let summary = state.gateway.summary().await?;
    Ok(web::Json(summary))
}
