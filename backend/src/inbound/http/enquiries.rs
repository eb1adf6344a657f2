//! Enquiry handlers.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::catalog::{Enquiry, EnquiryStatus};
use crate::domain::kind::RecordKind;

use super::error::ApiResult;
use super::notify_rejection;
use super::payloads::{
    filtered_response, parse_record_id, require_confirmation, ConfirmQuery, ListQuery,
};
use super::state::HttpState;

/// Follow-up state change request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EnquiryStatusBody {
    pub status: EnquiryStatus,
}

/// Notes attached by the operator.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EnquiryNotesBody {
    pub notes: String,
}

/// List enquiries through the search/status/type filter pipeline.
///
/// `limit` caps the returned rows; the dashboard landing page asks for
/// the ten most recent.
#[utoipa::path(
    get,
    path = "/api/v1/enquiries",
    responses((status = 200, description = "Filtered enquiry list")),
    tags = ["enquiries"]
)]
#[get("/enquiries")]
pub async fn list_enquiries(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let records = state.gateway.list_of::<Enquiry>(false).await?;
    let response = filtered_response(records, &query, "No recent enquiries");
    Ok(HttpResponse::Ok().json(response))
}

/// Set an enquiry's follow-up status.
#[utoipa::path(
    post,
    path = "/api/v1/enquiries/{id}/status",
    request_body = EnquiryStatusBody,
    responses((status = 204, description = "Status updated")),
    tags = ["enquiries"]
)]
#[post("/enquiries/{id}/status")]
pub async fn set_enquiry_status(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Json<EnquiryStatusBody>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path)?;
    state.gateway.set_enquiry_status(id, body.status).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Mark one enquiry as read.
#[utoipa::path(
    post,
    path = "/api/v1/enquiries/{id}/read",
    responses((status = 204, description = "Enquiry marked read")),
    tags = ["enquiries"]
)]
#[post("/enquiries/{id}/read")]
pub async fn mark_enquiry_read(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path)?;
    state.gateway.mark_enquiry_read(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Mark every unread enquiry as read, after confirmation.
#[utoipa::path(
    post,
    path = "/api/v1/enquiries/read-all",
    responses(
        (status = 200, description = "Enquiries marked read"),
        (status = 400, description = "Missing confirmation")
    ),
    tags = ["enquiries"]
)]
#[post("/enquiries/read-all")]
pub async fn mark_all_enquiries_read(
    state: web::Data<HttpState>,
    query: web::Query<ConfirmQuery>,
) -> ApiResult<HttpResponse> {
    require_confirmation(&query)?;
    let count = state.gateway.mark_all_enquiries_read().await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "marked": count })))
}

/// Replace the notes attached to an enquiry.
#[utoipa::path(
    put,
    path = "/api/v1/enquiries/{id}/notes",
    request_body = EnquiryNotesBody,
    responses((status = 204, description = "Notes saved")),
    tags = ["enquiries"]
)]
#[put("/enquiries/{id}/notes")]
pub async fn set_enquiry_notes(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Json<EnquiryNotesBody>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path)?;
    let notes = body.into_inner().notes;
    if notes.trim().is_empty() {
        return Err(notify_rejection(
            &state.notices,
            crate::domain::DomainError::invalid_request("notes must not be empty"),
        ));
    }
    state.gateway.set_enquiry_notes(id, notes).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Permanently remove an enquiry after explicit confirmation.
#[utoipa::path(
    delete,
    path = "/api/v1/enquiries/{id}",
    responses(
        (status = 204, description = "Enquiry removed"),
        (status = 400, description = "Missing confirmation")
    ),
    tags = ["enquiries"]
)]
#[delete("/enquiries/{id}")]
pub async fn delete_enquiry(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<ConfirmQuery>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path)?;
    require_confirmation(&query)?;
    state.gateway.delete(RecordKind::Enquiry, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
