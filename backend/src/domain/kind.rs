//! Record kinds and the unified deletion lifecycle.
//!
//! The hosted store keeps one collection per kind. Deletion semantics vary
//! by kind in the original data: inventory kinds keep a tombstone status,
//! while enquiries and subscribers are removed outright. Both behaviours
//! are expressed through one explicit [`Lifecycle`] state plus a per-kind
//! [`DeleteBehaviour`], so no caller has to remember which kind is which.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One of the five record categories managed by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    Vehicle,
    Property,
    SellListing,
    Subscriber,
    Enquiry,
}

/// Unified record lifecycle.
///
/// `Active` covers every working status, `Archived` is a soft-deleted
/// tombstone still present in the store, and `Purged` marks a record on
/// its way out of the store entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Lifecycle {
    Active,
    Archived,
    Purged,
}

/// How a kind realises the `Purged` lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteBehaviour {
    /// Write a `deleted` tombstone status; the document stays in the store.
    MarkDeleted,
    /// Remove the document from the store.
    Remove,
}

impl RecordKind {
    /// Every kind, in dashboard navigation order.
    pub const ALL: [Self; 5] = [
        Self::Vehicle,
        Self::Property,
        Self::SellListing,
        Self::Subscriber,
        Self::Enquiry,
    ];

    /// Hosted-store collection name for this kind.
    pub fn collection(self) -> &'static str {
        match self {
            Self::Vehicle => "vehicles",
            Self::Property => "properties",
            Self::SellListing => "listings",
            Self::Subscriber => "newsletters",
            Self::Enquiry => "enquiries",
        }
    }

    /// Prefix of the human-readable stock code, if the kind has one.
    pub fn code_prefix(self) -> Option<&'static str> {
        match self {
            Self::Vehicle => Some("VEH"),
            Self::Property => Some("PROP"),
            Self::SellListing | Self::Subscriber | Self::Enquiry => None,
        }
    }

    /// Deletion behaviour for this kind.
    pub fn delete_behaviour(self) -> DeleteBehaviour {
        match self {
            Self::Vehicle | Self::Property | Self::SellListing => DeleteBehaviour::MarkDeleted,
            Self::Subscriber | Self::Enquiry => DeleteBehaviour::Remove,
        }
    }

    /// Kinds the dashboard keeps a live change-stream subscription for.
    pub fn is_live(self) -> bool {
        matches!(self, Self::SellListing | Self::Subscriber | Self::Enquiry)
    }

    /// Human label used in notices.
    pub fn label(self) -> &'static str {
        match self {
            Self::Vehicle => "vehicle",
            Self::Property => "property",
            Self::SellListing => "sell listing",
            Self::Subscriber => "newsletter subscription",
            Self::Enquiry => "enquiry",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.collection())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(RecordKind::Vehicle, DeleteBehaviour::MarkDeleted)]
    #[case(RecordKind::Property, DeleteBehaviour::MarkDeleted)]
    #[case(RecordKind::SellListing, DeleteBehaviour::MarkDeleted)]
    #[case(RecordKind::Subscriber, DeleteBehaviour::Remove)]
    #[case(RecordKind::Enquiry, DeleteBehaviour::Remove)]
    fn delete_behaviour_matches_kind(
        #[case] kind: RecordKind,
        #[case] expected: DeleteBehaviour,
    ) {
        assert_eq!(kind.delete_behaviour(), expected);
    }

    #[test]
    fn only_submission_kinds_are_live() {
        let live: Vec<RecordKind> = RecordKind::ALL
            .into_iter()
            .filter(|kind| kind.is_live())
            .collect();
        assert_eq!(
            live,
            vec![
                RecordKind::SellListing,
                RecordKind::Subscriber,
                RecordKind::Enquiry
            ]
        );
    }

    #[test]
    fn kind_serializes_as_kebab_case() {
        let json = serde_json::to_string(&RecordKind::SellListing).expect("serializable kind");
        assert_eq!(json, "\"sell-listing\"");
    }
}
