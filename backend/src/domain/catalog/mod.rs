//! Marketplace catalog domain types.
//!
//! One entity per record kind, each with a draft payload holding the
//! user-supplied fields and a validated entity the gateway assembles once
//! identifiers, timestamps, and uploaded image URLs are known. Entities own
//! the kind-specific pieces of the filter pipeline: the search haystack and
//! the status/type keys the dashboard dropdowns match against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::kind::{Lifecycle, RecordKind};
use super::record::Record;

mod enquiry;
mod property;
mod sell_listing;
mod subscriber;
mod validation;
mod vehicle;

#[cfg(test)]
mod tests;

pub use enquiry::{Enquiry, EnquiryStatus, EnquiryTopic};
pub use property::{MarketStatus, Property, PropertyDraft, PropertyStatus};
pub use sell_listing::{ListingCategory, ListingStatus, SellListing};
pub use subscriber::{Subscriber, SubscriberStatus};
pub use vehicle::{Vehicle, VehicleDraft, VehicleStatus};

/// Opaque identifier of a hosted-store document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Validation errors returned by catalog draft checks.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogValidationError {
    EmptyField { field: &'static str },
    NegativeValue { field: &'static str },
    YearOutOfRange { field: &'static str, year: i32 },
}

impl std::fmt::Display for CatalogValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "{field} must not be empty"),
            Self::NegativeValue { field } => write!(f, "{field} must not be negative"),
            Self::YearOutOfRange { field, year } => {
                write!(f, "{field} must be a plausible model year (got {year})")
            }
        }
    }
}

impl std::error::Error for CatalogValidationError {}

/// Behaviour shared by every catalog entity.
///
/// The generic manager, gateway helpers, and the live feed all work
/// through this trait rather than matching on kinds.
pub trait CatalogRecord: Clone + Send + Sync + Serialize + 'static {
    /// Record kind this entity belongs to.
    const KIND: RecordKind;

    /// Store document identifier.
    fn id(&self) -> RecordId;

    /// Submission (or creation) timestamp used for descending ordering.
    fn submitted_at(&self) -> DateTime<Utc>;

    /// Unified lifecycle state derived from the kind-specific status.
    fn lifecycle(&self) -> Lifecycle;

    /// Stamp the server-assigned update timestamp.
    fn touch(&mut self, at: DateTime<Utc>);

    /// Lower-cased concatenation of the searchable fields.
    fn search_haystack(&self) -> String;

    /// Wire value of the status the dashboard status dropdown matches.
    fn status_key(&self) -> String;

    /// Wire value of the type the dashboard type dropdown matches, when
    /// the kind has a type dimension.
    fn type_key(&self) -> Option<String>;

    /// Extract this entity from the untyped record envelope.
    fn from_record(record: Record) -> Option<Self>;

    /// Wrap this entity into the untyped record envelope.
    fn into_record(self) -> Record;
}

pub(crate) fn status_wire_value<S: Serialize>(status: &S) -> String {
    match serde_json::to_value(status) {
        Ok(serde_json::Value::String(value)) => value,
        _ => String::new(),
    }
}
