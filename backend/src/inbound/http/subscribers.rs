//! Newsletter subscriber handlers.

use actix_web::{delete, get, post, web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::catalog::{Subscriber, SubscriberStatus};
use crate::domain::kind::RecordKind;

use super::error::ApiResult;
use super::payloads::{
    filtered_response, parse_record_id, require_confirmation, ConfirmQuery, ListQuery,
};
use super::state::HttpState;

/// Subscription state change request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubscriberStatusBody {
    pub status: SubscriberStatus,
}

/// List subscribers through the search/status filter pipeline.
#[utoipa::path(
    get,
    path = "/api/v1/subscribers",
    responses((status = 200, description = "Filtered subscriber list")),
    tags = ["subscribers"]
)]
#[get("/subscribers")]
pub async fn list_subscribers(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let records = state.gateway.list_of::<Subscriber>(false).await?;
    let response = filtered_response(records, &query, "No newsletter subscriptions yet");
    Ok(HttpResponse::Ok().json(response))
}

/// Unsubscribe or resubscribe one subscriber after confirmation.
#[utoipa::path(
    post,
    path = "/api/v1/subscribers/{id}/status",
    request_body = SubscriberStatusBody,
    responses(
        (status = 204, description = "Subscription updated"),
        (status = 400, description = "Missing confirmation")
    ),
    tags = ["subscribers"]
)]
#[post("/subscribers/{id}/status")]
pub async fn set_subscriber_status(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<ConfirmQuery>,
    body: web::Json<SubscriberStatusBody>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path)?;
    require_confirmation(&query)?;
    state.gateway.set_subscriber_status(id, body.status).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Permanently remove a subscriber after explicit confirmation.
#[utoipa::path(
    delete,
    path = "/api/v1/subscribers/{id}",
    responses(
        (status = 204, description = "Subscriber removed"),
        (status = 400, description = "Missing confirmation")
    ),
    tags = ["subscribers"]
)]
#[delete("/subscribers/{id}")]
pub async fn delete_subscriber(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<ConfirmQuery>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path)?;
    require_confirmation(&query)?;
    state.gateway.delete(RecordKind::Subscriber, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
