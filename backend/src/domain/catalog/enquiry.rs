//! Customer enquiry entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{status_wire_value, CatalogRecord, RecordId};
use crate::domain::kind::{Lifecycle, RecordKind};
use crate::domain::record::Record;

/// Follow-up state of an enquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum EnquiryStatus {
    New,
    Contacted,
    InProgress,
    Closed,
}

/// What the enquiry is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum EnquiryTopic {
    Vehicle,
    Property,
    General,
}

/// An enquiry submitted from the public site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Enquiry {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub topic: EnquiryTopic,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
    /// Stock code of the vehicle the enquiry refers to, when topical.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,
    /// Stock code of the property the enquiry refers to, when topical.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    pub status: EnquiryStatus,
    pub read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes_updated_at: Option<DateTime<Utc>>,
    pub notified: bool,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Enquiry {
    /// Whether the enquiry still needs attention.
    pub fn is_open(&self) -> bool {
        self.status != EnquiryStatus::Closed
    }
}

impl CatalogRecord for Enquiry {
    const KIND: RecordKind = RecordKind::Enquiry;

    fn id(&self) -> RecordId {
        self.id
    }

    fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    fn lifecycle(&self) -> Lifecycle {
        // Enquiries have no tombstone state; deletion removes the record.
        Lifecycle::Active
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }

    fn search_haystack(&self) -> String {
        [
            self.name.as_str(),
            self.email.as_str(),
            self.subject.as_deref().unwrap_or_default(),
            self.message.as_str(),
            &status_wire_value(&self.topic),
        ]
        .join(" ")
        .to_lowercase()
    }

    fn status_key(&self) -> String {
        status_wire_value(&self.status)
    }

    fn type_key(&self) -> Option<String> {
        Some(status_wire_value(&self.topic))
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Enquiry(enquiry) => Some(enquiry),
            _ => None,
        }
    }

    fn into_record(self) -> Record {
        Record::Enquiry(self)
    }
}
