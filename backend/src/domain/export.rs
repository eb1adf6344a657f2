//! CSV export of dashboard lists.
//!
//! Each kind exports with a fixed column order. Textual fields are
//! quote-wrapped with internal quotes doubled (standard CSV escaping,
//! non-numeric quoting); numeric fields stay bare. The produced artifact
//! names embed the export date. Exporting never mutates a record.

use chrono::NaiveDate;
use csv::{QuoteStyle, WriterBuilder};
use serde::Serialize;
use utoipa::ToSchema;

use super::catalog::{CatalogRecord, Enquiry, Property, SellListing, Subscriber, Vehicle};
use super::error::DomainError;

/// A file ready for the browser download surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: String,
    pub body: String,
}

const VEHICLE_COLUMNS: [&str; 12] = [
    "Vehicle ID",
    "Make",
    "Model",
    "Year",
    "Price",
    "Mileage",
    "Fuel Type",
    "Transmission",
    "Condition",
    "Status",
    "Description",
    "Created Date",
];

const PROPERTY_COLUMNS: [&str; 12] = [
    "Property ID",
    "Title",
    "Type",
    "Price",
    "Location",
    "Bedrooms",
    "Bathrooms",
    "Area",
    "Market Status",
    "Status",
    "Description",
    "Created Date",
];

const LISTING_COLUMNS: [&str; 8] = [
    "Type",
    "Title",
    "Seller Name",
    "Seller Email",
    "Seller Phone",
    "Price",
    "Status",
    "Submitted Date",
];

const SUBSCRIBER_COLUMNS: [&str; 4] = ["Email", "Name", "Status", "Subscribed Date"];

const ENQUIRY_COLUMNS: [&str; 12] = [
    "Date",
    "Name",
    "Email",
    "Phone",
    "Company",
    "Type",
    "Subject",
    "Vehicle ID",
    "Property ID",
    "Message",
    "Status",
    "Notes",
];

/// Export vehicles with the fixed vehicle column order.
pub fn vehicles_csv(vehicles: &[Vehicle], on: NaiveDate) -> Result<ExportFile, DomainError> {
    let rows = vehicles.iter().map(|vehicle| {
        vec![
            vehicle.vehicle_id.clone(),
            vehicle.make.clone(),
            vehicle.model.clone(),
            vehicle.year.to_string(),
            money(vehicle.price),
            count(vehicle.mileage),
            vehicle.fuel_type.clone(),
            vehicle.transmission.clone(),
            vehicle.condition.clone(),
            vehicle.status_key(),
            vehicle.description.clone(),
            vehicle.created_at.format("%Y-%m-%d").to_string(),
        ]
    });
    build("vehicles", &VEHICLE_COLUMNS, rows, on)
}

/// Export properties with the fixed property column order.
pub fn properties_csv(properties: &[Property], on: NaiveDate) -> Result<ExportFile, DomainError> {
    let rows = properties.iter().map(|property| {
        vec![
            property.property_id.clone(),
            property.title.clone(),
            property.property_type.clone(),
            money(property.price),
            property.location.clone(),
            count(property.bedrooms),
            count(property.bathrooms),
            count(property.area),
            super::catalog::status_wire_value(&property.property_status),
            property.status_key(),
            property.description.clone(),
            property.created_at.format("%Y-%m-%d").to_string(),
        ]
    });
    build("properties", &PROPERTY_COLUMNS, rows, on)
}

/// Export sell listings with the fixed listing column order.
pub fn listings_csv(listings: &[SellListing], on: NaiveDate) -> Result<ExportFile, DomainError> {
    let rows = listings.iter().map(|listing| {
        vec![
            listing.type_key().unwrap_or_default(),
            listing.display_title(),
            listing.seller_name.clone(),
            listing.seller_email.clone(),
            listing.seller_phone.clone().unwrap_or_default(),
            listing.price.map(money).unwrap_or_default(),
            listing.status_key(),
            CatalogRecord::submitted_at(listing)
                .format("%Y-%m-%d")
                .to_string(),
        ]
    });
    build("listings", &LISTING_COLUMNS, rows, on)
}

/// Export newsletter subscribers with the fixed subscriber column order.
pub fn subscribers_csv(
    subscribers: &[Subscriber],
    on: NaiveDate,
) -> Result<ExportFile, DomainError> {
    let rows = subscribers.iter().map(|subscriber| {
        vec![
            subscriber.email.clone(),
            subscriber.name.clone().unwrap_or_default(),
            subscriber.status_key(),
            subscriber.subscribed_at.format("%Y-%m-%d").to_string(),
        ]
    });
    build("newsletter-subscribers", &SUBSCRIBER_COLUMNS, rows, on)
}

/// Export enquiries with the fixed enquiry column order.
pub fn enquiries_csv(enquiries: &[Enquiry], on: NaiveDate) -> Result<ExportFile, DomainError> {
    let rows = enquiries.iter().map(|enquiry| {
        vec![
            CatalogRecord::submitted_at(enquiry)
                .format("%Y-%m-%d")
                .to_string(),
            enquiry.name.clone(),
            enquiry.email.clone(),
            enquiry.phone.clone().unwrap_or_default(),
            enquiry.company.clone().unwrap_or_default(),
            enquiry.type_key().unwrap_or_default(),
            enquiry.subject.clone().unwrap_or_default(),
            enquiry.vehicle_id.clone().unwrap_or_default(),
            enquiry.property_id.clone().unwrap_or_default(),
            enquiry.message.clone(),
            enquiry.status_key(),
            enquiry.notes.clone().unwrap_or_default(),
        ]
    });
    build("enquiries", &ENQUIRY_COLUMNS, rows, on)
}

fn money(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn count(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn build<I>(
    kind: &str,
    columns: &[&str],
    rows: I,
    on: NaiveDate,
) -> Result<ExportFile, DomainError>
where
    I: Iterator<Item = Vec<String>>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(Vec::new());
    writer
        .write_record(columns)
        .map_err(|err| DomainError::internal(format!("csv header write failed: {err}")))?;
    for row in rows {
        writer
            .write_record(&row)
            .map_err(|err| DomainError::internal(format!("csv row write failed: {err}")))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| DomainError::internal(format!("csv flush failed: {err}")))?;
    let body = String::from_utf8(bytes)
        .map_err(|err| DomainError::internal(format!("csv output was not UTF-8: {err}")))?;

    Ok(ExportFile {
        file_name: format!("{kind}-export-{}.csv", on.format("%Y-%m-%d")),
        content_type: "text/csv".to_owned(),
        body,
    })
}
