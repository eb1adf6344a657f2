//! Website sync handlers.

use actix_web::{get, post, web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::site_sync::SyncReport;
use crate::domain::DomainError;

use super::error::ApiResult;
use super::state::HttpState;

/// Sync bookkeeping shown on the settings page.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatusResponse {
    pub in_progress: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<chrono::DateTime<chrono::Utc>>,
}

/// Run a website sync and return the generated artifacts.
#[utoipa::path(
    post,
    path = "/api/v1/site-sync",
    responses(
        (status = 200, description = "Sync completed", body = SyncReport),
        (status = 409, description = "Sync already in progress")
    ),
    tags = ["site-sync"]
)]
#[post("/site-sync")]
pub async fn run_site_sync(state: web::Data<HttpState>) -> ApiResult<web::Json<SyncReport>> {
    let report = state.site_sync.run().await?;
    Ok(web::Json(report))
}

/// Report whether a sync is running and when one last completed.
#[utoipa::path(
    get,
    path = "/api/v1/site-sync/status",
    responses((status = 200, description = "Sync status", body = SyncStatusResponse)),
    tags = ["site-sync"]
)]
#[get("/site-sync/status")]
pub async fn site_sync_status(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let last_sync = state
        .settings
        .last_sync()
        .await
        .map_err(|err| DomainError::internal(err.to_string()))?;
    Ok(HttpResponse::Ok().json(SyncStatusResponse {
        in_progress: state.site_sync.in_progress(),
        last_sync,
    }))
}
