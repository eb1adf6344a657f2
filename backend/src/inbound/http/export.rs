//! CSV export downloads.

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{get, web, HttpResponse};
use mockable::Clock;

use crate::domain::catalog::{Enquiry, Property, SellListing, Subscriber, Vehicle};
use crate::domain::export::{
    enquiries_csv, listings_csv, properties_csv, subscribers_csv, vehicles_csv, ExportFile,
};
use crate::domain::kind::RecordKind;
use crate::domain::DomainError;

use super::error::ApiResult;
use super::state::HttpState;

fn parse_kind(raw: &str) -> Result<RecordKind, DomainError> {
    RecordKind::ALL
        .into_iter()
        .find(|kind| kind.collection() == raw)
        .ok_or_else(|| DomainError::invalid_request(format!("unknown export kind: {raw}")))
}

fn download(file: ExportFile) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(file.content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file.file_name)],
        })
        .body(file.body)
}

/// Export one kind's records as CSV with the fixed column order.
#[utoipa::path(
    get,
    path = "/api/v1/export/{kind}",
    responses(
        (status = 200, description = "CSV download"),
        (status = 400, description = "Unknown kind")
    ),
    tags = ["export"]
)]
#[get("/export/{kind}")]
pub async fn export_kind(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let kind = parse_kind(&path)?;
    let today = state.clock.utc().date_naive();
    let file = match kind {
        RecordKind::Vehicle => {
            let records = state.gateway.list_of::<Vehicle>(true).await?;
            vehicles_csv(&records, today)?
        }
        RecordKind::Property => {
            let records = state.gateway.list_of::<Property>(true).await?;
            properties_csv(&records, today)?
        }
        RecordKind::SellListing => {
            let records = state.gateway.list_of::<SellListing>(true).await?;
            listings_csv(&records, today)?
        }
        RecordKind::Subscriber => {
            let records = state.gateway.list_of::<Subscriber>(false).await?;
            subscribers_csv(&records, today)?
        }
        RecordKind::Enquiry => {
            let records = state.gateway.list_of::<Enquiry>(false).await?;
            enquiries_csv(&records, today)?
        }
    };
    state
        .notices
        .success(format!("{} exported successfully!", kind.label()));
    Ok(download(file))
}
