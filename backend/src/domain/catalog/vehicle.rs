//! Vehicle inventory entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{
    ensure_non_negative_count, ensure_non_negative_price, ensure_plausible_year,
    validate_non_empty,
};
use super::{status_wire_value, CatalogRecord, CatalogValidationError, RecordId};
use crate::domain::kind::{Lifecycle, RecordKind};
use crate::domain::record::Record;

/// Vehicle listing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum VehicleStatus {
    Active,
    Inactive,
    Sold,
    Deleted,
}

/// User-supplied vehicle fields, parsed from the submitted form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDraft {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub mileage: Option<i64>,
    pub fuel_type: String,
    pub transmission: String,
    pub condition: String,
    pub description: String,
}

impl VehicleDraft {
    /// Check draft invariants before any store call.
    pub fn validate(&self) -> Result<(), CatalogValidationError> {
        validate_non_empty(&self.make, "vehicle.make")?;
        validate_non_empty(&self.model, "vehicle.model")?;
        ensure_plausible_year(self.year, "vehicle.year")?;
        ensure_non_negative_price(self.price, "vehicle.price")?;
        ensure_non_negative_count(self.mileage, "vehicle.mileage")?;
        Ok(())
    }
}

/// A vehicle document as stored in the hosted store.
///
/// `vehicle_id` is the human-readable stock code assigned once at
/// creation; `images` is ordered with index 0 as the main image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: RecordId,
    pub vehicle_id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mileage: Option<i64>,
    pub fuel_type: String,
    pub transmission: String,
    pub condition: String,
    pub description: String,
    pub images: Vec<String>,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Apply the editable fields of a draft, leaving identity, images,
    /// status, and the creation timestamp untouched.
    pub fn apply_draft(&mut self, draft: VehicleDraft) {
        let VehicleDraft {
            make,
            model,
            year,
            price,
            mileage,
            fuel_type,
            transmission,
            condition,
            description,
        } = draft;
        self.make = make;
        self.model = model;
        self.year = year;
        self.price = price;
        self.mileage = mileage;
        self.fuel_type = fuel_type;
        self.transmission = transmission;
        self.condition = condition;
        self.description = description;
    }
}

impl CatalogRecord for Vehicle {
    const KIND: RecordKind = RecordKind::Vehicle;

    fn id(&self) -> RecordId {
        self.id
    }

    fn submitted_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn lifecycle(&self) -> Lifecycle {
        match self.status {
            VehicleStatus::Deleted => Lifecycle::Archived,
            _ => Lifecycle::Active,
        }
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    fn search_haystack(&self) -> String {
        [
            self.make.as_str(),
            self.model.as_str(),
            self.vehicle_id.as_str(),
            &self.year.to_string(),
            self.fuel_type.as_str(),
            self.transmission.as_str(),
            self.description.as_str(),
        ]
        .join(" ")
        .to_lowercase()
    }

    fn status_key(&self) -> String {
        status_wire_value(&self.status)
    }

    fn type_key(&self) -> Option<String> {
        // The dashboard's vehicle type dropdown filters by condition.
        Some(self.condition.to_lowercase())
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Vehicle(vehicle) => Some(vehicle),
            _ => None,
        }
    }

    fn into_record(self) -> Record {
        Record::Vehicle(self)
    }
}
