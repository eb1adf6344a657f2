//! Untyped record envelope passed across the store boundary.
//!
//! The hosted store holds one collection per kind; adapters move whole
//! documents in and out without caring which kind they carry. Typed code
//! converts through [`CatalogRecord::from_record`] and
//! [`CatalogRecord::into_record`].

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::catalog::{
    CatalogRecord, Enquiry, Property, RecordId, SellListing, Subscriber, Vehicle,
};
use super::kind::{Lifecycle, RecordKind};

/// One document of any kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Vehicle(Vehicle),
    Property(Property),
    SellListing(SellListing),
    Subscriber(Subscriber),
    Enquiry(Enquiry),
}

impl Record {
    /// Kind of the wrapped document.
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Vehicle(_) => RecordKind::Vehicle,
            Self::Property(_) => RecordKind::Property,
            Self::SellListing(_) => RecordKind::SellListing,
            Self::Subscriber(_) => RecordKind::Subscriber,
            Self::Enquiry(_) => RecordKind::Enquiry,
        }
    }

    /// Store document identifier.
    pub fn id(&self) -> RecordId {
        match self {
            Self::Vehicle(vehicle) => vehicle.id,
            Self::Property(property) => property.id,
            Self::SellListing(listing) => listing.id,
            Self::Subscriber(subscriber) => subscriber.id,
            Self::Enquiry(enquiry) => enquiry.id,
        }
    }

    /// Submission timestamp used for descending ordering.
    pub fn submitted_at(&self) -> DateTime<Utc> {
        match self {
            Self::Vehicle(vehicle) => vehicle.submitted_at(),
            Self::Property(property) => property.submitted_at(),
            Self::SellListing(listing) => CatalogRecord::submitted_at(listing),
            Self::Subscriber(subscriber) => subscriber.submitted_at(),
            Self::Enquiry(enquiry) => CatalogRecord::submitted_at(enquiry),
        }
    }

    /// Unified lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        match self {
            Self::Vehicle(vehicle) => vehicle.lifecycle(),
            Self::Property(property) => property.lifecycle(),
            Self::SellListing(listing) => listing.lifecycle(),
            Self::Subscriber(subscriber) => subscriber.lifecycle(),
            Self::Enquiry(enquiry) => enquiry.lifecycle(),
        }
    }

    /// Whether the one-shot arrival toast has already fired for this
    /// record. Kinds without a live feed report `true` so no toast fires.
    pub fn notified(&self) -> bool {
        match self {
            Self::Vehicle(_) | Self::Property(_) => true,
            Self::SellListing(listing) => listing.notified,
            Self::Subscriber(subscriber) => subscriber.notified,
            Self::Enquiry(enquiry) => enquiry.notified,
        }
    }

    /// Set the arrival-toast flag on kinds that carry one.
    pub fn set_notified(&mut self) {
        match self {
            Self::Vehicle(_) | Self::Property(_) => {}
            Self::SellListing(listing) => listing.notified = true,
            Self::Subscriber(subscriber) => subscriber.notified = true,
            Self::Enquiry(enquiry) => enquiry.notified = true,
        }
    }

    /// Toast text announcing a newly arrived record, for live kinds.
    pub fn arrival_message(&self) -> Option<String> {
        match self {
            Self::Vehicle(_) | Self::Property(_) => None,
            Self::SellListing(listing) => Some(format!(
                "New listing: {} - {}",
                listing.display_title(),
                listing.seller_name
            )),
            Self::Subscriber(subscriber) => Some(format!(
                "New newsletter subscription: {}",
                subscriber.email
            )),
            Self::Enquiry(enquiry) => {
                Some(format!("New enquiry from {}", enquiry.name))
            }
        }
    }
}
