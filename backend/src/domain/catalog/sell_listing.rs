//! User-submitted sell listing awaiting moderation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{status_wire_value, CatalogRecord, RecordId};
use crate::domain::kind::{Lifecycle, RecordKind};
use crate::domain::record::Record;

/// Moderation status of a sell listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ListingStatus {
    Pending,
    Approved,
    Rejected,
    Deleted,
}

/// Category a visitor submitted the listing under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ListingCategory {
    Vehicle,
    Property,
}

/// A sell listing submitted from the public site.
///
/// Vehicles arrive with make/model and the optional vehicle fields,
/// properties with a title and the optional property fields; the
/// moderation view shows whichever set is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellListing {
    pub id: RecordId,
    pub category: ListingCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mileage: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub seller_name: String,
    pub seller_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ListingStatus,
    pub notified: bool,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SellListing {
    /// Display title: the submitted title, or make and model for vehicles.
    pub fn display_title(&self) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }
        match (&self.make, &self.model) {
            (Some(make), Some(model)) => format!("{make} {model}"),
            (Some(make), None) => make.clone(),
            _ => "Untitled listing".to_owned(),
        }
    }
}

impl CatalogRecord for SellListing {
    const KIND: RecordKind = RecordKind::SellListing;

    fn id(&self) -> RecordId {
        self.id
    }

    fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    fn lifecycle(&self) -> Lifecycle {
        match self.status {
            ListingStatus::Deleted => Lifecycle::Archived,
            _ => Lifecycle::Active,
        }
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }

    fn search_haystack(&self) -> String {
        [
            self.title.as_deref().unwrap_or_default(),
            self.make.as_deref().unwrap_or_default(),
            self.model.as_deref().unwrap_or_default(),
            self.seller_name.as_str(),
            self.seller_email.as_str(),
        ]
        .join(" ")
        .to_lowercase()
    }

    fn status_key(&self) -> String {
        status_wire_value(&self.status)
    }

    fn type_key(&self) -> Option<String> {
        Some(status_wire_value(&self.category))
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::SellListing(listing) => Some(listing),
            _ => None,
        }
    }

    fn into_record(self) -> Record {
        Record::SellListing(self)
    }
}
