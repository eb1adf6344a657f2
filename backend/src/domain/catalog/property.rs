//! Property inventory entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{
    ensure_non_negative_count, ensure_non_negative_price, validate_non_empty,
};
use super::{status_wire_value, CatalogRecord, CatalogValidationError, RecordId};
use crate::domain::kind::{Lifecycle, RecordKind};
use crate::domain::record::Record;

/// Administrative property status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyStatus {
    Active,
    Inactive,
    Deleted,
}

/// Market position advertised on the public site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum MarketStatus {
    ForSale,
    ForRent,
    Sold,
    Rented,
}

impl MarketStatus {
    /// Parse the wire value used by the form dropdown.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "for-sale" => Some(Self::ForSale),
            "for-rent" => Some(Self::ForRent),
            "sold" => Some(Self::Sold),
            "rented" => Some(Self::Rented),
            _ => None,
        }
    }
}

/// User-supplied property fields, parsed from the submitted form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDraft {
    pub title: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub price: f64,
    pub location: String,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub area: Option<i64>,
    pub property_status: MarketStatus,
    pub description: String,
}

impl PropertyDraft {
    /// Check draft invariants before any store call.
    pub fn validate(&self) -> Result<(), CatalogValidationError> {
        validate_non_empty(&self.title, "property.title")?;
        validate_non_empty(&self.location, "property.location")?;
        ensure_non_negative_price(self.price, "property.price")?;
        ensure_non_negative_count(self.bedrooms, "property.bedrooms")?;
        ensure_non_negative_count(self.bathrooms, "property.bathrooms")?;
        ensure_non_negative_count(self.area, "property.area")?;
        Ok(())
    }
}

/// A property document as stored in the hosted store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: RecordId,
    pub property_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub price: f64,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<i64>,
    pub property_status: MarketStatus,
    pub description: String,
    pub images: Vec<String>,
    pub status: PropertyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// Apply the editable fields of a draft, leaving identity, images,
    /// status, and the creation timestamp untouched.
    pub fn apply_draft(&mut self, draft: PropertyDraft) {
        let PropertyDraft {
            title,
            property_type,
            price,
            location,
            bedrooms,
            bathrooms,
            area,
            property_status,
            description,
        } = draft;
        self.title = title;
        self.property_type = property_type;
        self.price = price;
        self.location = location;
        self.bedrooms = bedrooms;
        self.bathrooms = bathrooms;
        self.area = area;
        self.property_status = property_status;
        self.description = description;
    }
}

impl CatalogRecord for Property {
    const KIND: RecordKind = RecordKind::Property;

    fn id(&self) -> RecordId {
        self.id
    }

    fn submitted_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn lifecycle(&self) -> Lifecycle {
        match self.status {
            PropertyStatus::Deleted => Lifecycle::Archived,
            _ => Lifecycle::Active,
        }
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    fn search_haystack(&self) -> String {
        [
            self.title.as_str(),
            self.property_id.as_str(),
            self.location.as_str(),
            self.property_type.as_str(),
            &status_wire_value(&self.property_status),
            self.description.as_str(),
        ]
        .join(" ")
        .to_lowercase()
    }

    fn status_key(&self) -> String {
        status_wire_value(&self.status)
    }

    fn type_key(&self) -> Option<String> {
        Some(self.property_type.to_lowercase())
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Property(property) => Some(property),
            _ => None,
        }
    }

    fn into_record(self) -> Record {
        Record::Property(self)
    }
}
