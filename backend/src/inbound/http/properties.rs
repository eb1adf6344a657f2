//! Property resource handlers.
//!
//! Same surface as the vehicle resource, over the property kind.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::catalog::{Property, PropertyStatus};
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

/// Status change request for one property.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PropertyStatusBody {
    pub status: PropertyStatus,
}

/// List properties through the search/status/type filter pipeline.
#[utoipa::path(
    get,
    path = "/api/v1/properties",
    responses((status = 200, description = "Filtered property list")),
    tags = ["properties"]
)]
#[get("/properties")]
pub async fn list_properties(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let records = state
        .gateway
        .list_of::<Property>(!query.include_deleted)
        .await?;
    let response = filtered_response(records, &query, "No properties found");
    Ok(HttpResponse::Ok().json(response))
}

/// Fetch one property.
#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}",
    responses(
        (status = 200, description = "Property detail", body = Property),
        (status = 404, description = "Unknown property")
    ),
    tags = ["properties"]
)]
#[get("/properties/{id}")]
pub async fn get_property(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Property>> {
    let id = parse_record_id(&path)?;
    let record = state.gateway.get_by_id(RecordKind::Property, id).await?;
    match record {
        Some(Record::Property(property)) => Ok(web::Json(property)),
        _ => {
            Err(crate::domain::DomainError::not_found(format!("property {id} not found")).into())
        }
    }
}

/// Create a property from the submitted form.
#[utoipa::path(
    post,
    path = "/api/v1/properties",
    request_body = RecordFormBody,
    responses(
        (status = 200, description = "Property created", body = CreatedRecord),
        (status = 400, description = "Validation failed")
    ),
    tags = ["properties"]
)]
#[post("/properties")]
pub async fn create_property(
    state: web::Data<HttpState>,
    body: web::Json<RecordFormBody>,
) -> ApiResult<web::Json<CreatedRecord>> {
    let _permit = state
        .property_form
        .acquire()
        .map_err(|error| notify_rejection(&state.notices, error))?;
    let body = body.into_inner();
    let draft = forms::property_draft(&body.fields)
        .map_err(|error| notify_rejection(&state.notices, error))?;
    let images =
        decode_images(body.images).map_err(|error| notify_rejection(&state.notices, error))?;
    forms::require_images(&images).map_err(|error| notify_rejection(&state.notices, error))?;

    let created = state.gateway.create_property(draft, images).await?;
    Ok(web::Json(created))
}

/// Update a property from the edit form.
#[utoipa::path(
    put,
    path = "/api/v1/properties/{id}",
    request_body = RecordUpdateBody,
    responses(
        (status = 204, description = "Property updated"),
        (status = 404, description = "Unknown property")
    ),
    tags = ["properties"]
)]
#[put("/properties/{id}")]
pub async fn update_property(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Json<RecordUpdateBody>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path)?;
    let _permit = state
        .property_form
        .acquire()
        .map_err(|error| notify_rejection(&state.notices, error))?;
    let body = body.into_inner();
    let draft = forms::property_draft(&body.fields)
        .map_err(|error| notify_rejection(&state.notices, error))?;
    let images =
        decode_images(body.images).map_err(|error| notify_rejection(&state.notices, error))?;

    state
        .gateway
        .update_property(id, draft, body.existing_images, images)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Toggle a property's administrative status.
#[utoipa::path(
    post,
    path = "/api/v1/properties/{id}/status",
    request_body = PropertyStatusBody,
    responses((status = 204, description = "Status updated")),
    tags = ["properties"]
)]
#[post("/properties/{id}/status")]
pub async fn set_property_status(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Json<PropertyStatusBody>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path)?;
    state.gateway.set_property_status(id, body.status).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Soft-delete a property after explicit confirmation.
#[utoipa::path(
    delete,
    path = "/api/v1/properties/{id}",
    responses(
        (status = 204, description = "Property archived"),
        (status = 400, description = "Missing confirmation")
    ),
    tags = ["properties"]
)]
#[delete("/properties/{id}")]
pub async fn delete_property(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<ConfirmQuery>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path)?;
    require_confirmation(&query)?;
    state.gateway.delete(RecordKind::Property, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
