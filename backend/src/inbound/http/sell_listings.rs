//! Sell listing moderation handlers.

use actix_web::{delete, get, post, web, HttpResponse};

use crate::domain::catalog::{ListingStatus, SellListing};
use crate::domain::kind::RecordKind;

use super::error::ApiResult;
use super::payloads::{
    filtered_response, parse_record_id, require_confirmation, ConfirmQuery, ListQuery,
};
use super::state::HttpState;

/// List sell listings through the search/status/type filter pipeline.
#[utoipa::path(
    get,
    path = "/api/v1/listings",
    responses((status = 200, description = "Filtered sell listing list")),
    tags = ["listings"]
)]
#[get("/listings")]
pub async fn list_sell_listings(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let records = state
        .gateway
        .list_of::<SellListing>(!query.include_deleted)
        .await?;
    let response = filtered_response(records, &query, "No sell listings submitted yet");
    Ok(HttpResponse::Ok().json(response))
}

/// Approve a pending listing after explicit confirmation.
#[utoipa::path(
    post,
    path = "/api/v1/listings/{id}/approve",
    responses(
        (status = 204, description = "Listing approved"),
        (status = 400, description = "Missing confirmation")
    ),
    tags = ["listings"]
)]
#[post("/listings/{id}/approve")]
pub async fn approve_listing(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<ConfirmQuery>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path)?;
    require_confirmation(&query)?;
    state
        .gateway
        .set_listing_status(id, ListingStatus::Approved)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Reject a pending listing after explicit confirmation.
#[utoipa::path(
    post,
    path = "/api/v1/listings/{id}/reject",
    responses(
        (status = 204, description = "Listing rejected"),
        (status = 400, description = "Missing confirmation")
    ),
    tags = ["listings"]
)]
#[post("/listings/{id}/reject")]
pub async fn reject_listing(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<ConfirmQuery>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path)?;
    require_confirmation(&query)?;
    state
        .gateway
        .set_listing_status(id, ListingStatus::Rejected)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Soft-delete a listing after explicit confirmation.
#[utoipa::path(
    delete,
    path = "/api/v1/listings/{id}",
    responses(
        (status = 204, description = "Listing archived"),
        (status = 400, description = "Missing confirmation")
    ),
    tags = ["listings"]
)]
#[delete("/listings/{id}")]
pub async fn delete_listing(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<ConfirmQuery>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path)?;
    require_confirmation(&query)?;
    state.gateway.delete(RecordKind::SellListing, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
