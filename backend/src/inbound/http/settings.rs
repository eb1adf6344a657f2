//! Operator settings handlers: theme preference and sync bookkeeping.

use actix_web::{get, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::ThemePreference;
use crate::domain::DomainError;

use super::error::ApiResult;
use super::state::HttpState;

/// Settings page payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub theme: ThemePreference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<chrono::DateTime<chrono::Utc>>,
}

/// Theme change request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ThemeBody {
    pub theme: ThemePreference,
}

/// Read the stored operator settings.
#[utoipa::path(
    get,
    path = "/api/v1/settings",
    responses((status = 200, description = "Stored settings", body = SettingsResponse)),
    tags = ["settings"]
)]
#[get("/settings")]
pub async fn get_settings(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let theme = state
        .settings
        .theme()
        .await
        .map_err(|err| DomainError::internal(err.to_string()))?;
    let last_sync = state
        .settings
        .last_sync()
        .await
        .map_err(|err| DomainError::internal(err.to_string()))?;
    Ok(HttpResponse::Ok().json(SettingsResponse { theme, last_sync }))
}

/// Persist the theme preference.
#[utoipa::path(
    put,
    path = "/api/v1/settings/theme",
    request_body = ThemeBody,
    responses((status = 204, description = "Theme stored")),
    tags = ["settings"]
)]
#[put("/settings/theme")]
pub async fn set_theme(
    state: web::Data<HttpState>,
    body: web::Json<ThemeBody>,
) -> ApiResult<HttpResponse> {
    let theme = body.theme;
    state
        .settings
        .set_theme(theme)
        .await
        .map_err(|err| DomainError::internal(err.to_string()))?;
    let label = match theme {
        ThemePreference::Light => "light",
        ThemePreference::Dark => "dark",
        ThemePreference::System => "system",
    };
    state.notices.success(format!("Switched to {label} mode"));
    Ok(HttpResponse::NoContent().finish())
}
