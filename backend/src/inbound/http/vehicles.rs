//! Vehicle resource handlers.
//!
//! ```text
//! GET    /api/v1/vehicles
//! POST   /api/v1/vehicles
//! GET    /api/v1/vehicles/{id}
//! PUT    /api/v1/vehicles/{id}
//! POST   /api/v1/vehicles/{id}/status
//! DELETE /api/v1/vehicles/{id}
//! ```

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::catalog::{Vehicle, VehicleStatus};
use crate::domain::forms;
use crate::domain::gateway::CreatedRecord;
use crate::domain::kind::RecordKind;
use crate::domain::record::Record;

use super::error::ApiResult;
use super::notify_rejection;
use super::payloads::{
    decode_images, filtered_response, parse_record_id, require_confirmation, ConfirmQuery,
    ListQuery, RecordFormBody, RecordUpdateBody,
};
use super::state::HttpState;

/// Status change request for one vehicle.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VehicleStatusBody {
    pub status: VehicleStatus,
}

/// List vehicles through the search/status/type filter pipeline.
#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    responses((status = 200, description = "Filtered vehicle list")),
    tags = ["vehicles"]
)]
#[get("/vehicles")]
pub async fn list_vehicles(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let records = state
        .gateway
        .list_of::<Vehicle>(!query.include_deleted)
        .await?;
    let response = filtered_response(records, &query, "No vehicles found");
    Ok(HttpResponse::Ok().json(response))
}

/// Fetch one vehicle.
#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{id}",
    responses(
        (status = 200, description = "Vehicle detail", body = Vehicle),
        (status = 404, description = "Unknown vehicle")
    ),
    tags = ["vehicles"]
)]
#[get("/vehicles/{id}")]
pub async fn get_vehicle(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vehicle>> {
    let id = parse_record_id(&path)?;
    let record = state.gateway.get_by_id(RecordKind::Vehicle, id).await?;
    match record {
        Some(Record::Vehicle(vehicle)) => Ok(web::Json(vehicle)),
        _ => Err(crate::domain::DomainError::not_found(format!("vehicle {id} not found")).into()),
    }
}

/// Create a vehicle from the submitted form.
#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    request_body = RecordFormBody,
    responses(
        (status = 200, description = "Vehicle created", body = CreatedRecord),
        (status = 400, description = "Validation failed")
    ),
    tags = ["vehicles"]
)]
#[post("/vehicles")]
pub async fn create_vehicle(
    state: web::Data<HttpState>,
    body: web::Json<RecordFormBody>,
) -> ApiResult<web::Json<CreatedRecord>> {
    let _permit = state
        .vehicle_form
        .acquire()
        .map_err(|error| notify_rejection(&state.notices, error))?;
    let body = body.into_inner();
    let draft = forms::vehicle_draft(&body.fields)
        .map_err(|error| notify_rejection(&state.notices, error))?;
    let images =
        decode_images(body.images).map_err(|error| notify_rejection(&state.notices, error))?;
    forms::require_images(&images).map_err(|error| notify_rejection(&state.notices, error))?;

    let created = state.gateway.create_vehicle(draft, images).await?;
    Ok(web::Json(created))
}

/// Update a vehicle from the edit form.
#[utoipa::path(
    put,
    path = "/api/v1/vehicles/{id}",
    request_body = RecordUpdateBody,
    responses(
        (status = 204, description = "Vehicle updated"),
        (status = 404, description = "Unknown vehicle")
    ),
    tags = ["vehicles"]
)]
#[put("/vehicles/{id}")]
pub async fn update_vehicle(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Json<RecordUpdateBody>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path)?;
    let _permit = state
        .vehicle_form
        .acquire()
        .map_err(|error| notify_rejection(&state.notices, error))?;
    let body = body.into_inner();
    let draft = forms::vehicle_draft(&body.fields)
        .map_err(|error| notify_rejection(&state.notices, error))?;
    let images =
        decode_images(body.images).map_err(|error| notify_rejection(&state.notices, error))?;

    state
        .gateway
        .update_vehicle(id, draft, body.existing_images, images)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Toggle a vehicle's administrative status.
#[utoipa::path(
    post,
    path = "/api/v1/vehicles/{id}/status",
    request_body = VehicleStatusBody,
    responses((status = 204, description = "Status updated")),
    tags = ["vehicles"]
)]
#[post("/vehicles/{id}/status")]
pub async fn set_vehicle_status(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Json<VehicleStatusBody>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path)?;
    state.gateway.set_vehicle_status(id, body.status).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Soft-delete a vehicle after explicit confirmation.
#[utoipa::path(
    delete,
    path = "/api/v1/vehicles/{id}",
    responses(
        (status = 204, description = "Vehicle archived"),
        (status = 400, description = "Missing confirmation")
    ),
    tags = ["vehicles"]
)]
#[delete("/vehicles/{id}")]
pub async fn delete_vehicle(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<ConfirmQuery>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path)?;
    require_confirmation(&query)?;
    state.gateway.delete(RecordKind::Vehicle, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
