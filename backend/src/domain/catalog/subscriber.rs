//! Newsletter subscription entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{status_wire_value, CatalogRecord, RecordId};
use crate::domain::kind::{Lifecycle, RecordKind};
use crate::domain::record::Record;

/// Subscription state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SubscriberStatus {
    Active,
    Unsubscribed,
}

/// A newsletter subscription captured from the public site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: RecordId,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub status: SubscriberStatus,
    pub notified: bool,
    pub subscribed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogRecord for Subscriber {
    const KIND: RecordKind = RecordKind::Subscriber;

    fn id(&self) -> RecordId {
        self.id
    }

    fn submitted_at(&self) -> DateTime<Utc> {
        self.subscribed_at
    }

    fn lifecycle(&self) -> Lifecycle {
        // Subscribers have no tombstone state; deletion removes the record.
        Lifecycle::Active
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }

    fn search_haystack(&self) -> String {
        [
            self.email.as_str(),
            self.name.as_deref().unwrap_or_default(),
        ]
        .join(" ")
        .to_lowercase()
    }

    fn status_key(&self) -> String {
        status_wire_value(&self.status)
    }

    fn type_key(&self) -> Option<String> {
        None
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Subscriber(subscriber) => Some(subscriber),
            _ => None,
        }
    }

    fn into_record(self) -> Record {
        Record::Subscriber(self)
    }
}
