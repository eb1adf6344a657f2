//! Form field coercion and submission guards.
//!
//! Submitted forms arrive as plain text fields. Coercion turns them into
//! typed drafts before any store call: required fields must be present
//! and non-blank, numeric fields must parse, and an EMPTY optional
//! numeric field is absent, never zero. Creation paths that require
//! images reject up front with no partial effect.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use super::catalog::{MarketStatus, PropertyDraft, VehicleDraft};
use super::error::DomainError;
use super::uploads::ImageUpload;

/// Raw text fields of one submitted form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct FormFields(BTreeMap<String, String>);

impl FormFields {
    /// Build fields from name/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }

    /// Trimmed value of a field; `None` when missing or blank.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

fn missing(name: &str) -> DomainError {
    DomainError::invalid_request(format!("{name} is required"))
        .with_details(json!({ "field": name }))
}

fn not_numeric(name: &str, value: &str) -> DomainError {
    DomainError::invalid_request(format!("{name} must be a number"))
        .with_details(json!({ "field": name, "value": value }))
}

/// Required text field.
pub fn required_text(fields: &FormFields, name: &str) -> Result<String, DomainError> {
    fields
        .get(name)
        .map(str::to_owned)
        .ok_or_else(|| missing(name))
}

/// Optional text field; blank collapses to `None`.
pub fn optional_text(fields: &FormFields, name: &str) -> Option<String> {
    fields.get(name).map(str::to_owned)
}

/// Required numeric field.
pub fn required_number<T: FromStr>(fields: &FormFields, name: &str) -> Result<T, DomainError> {
    let raw = fields.get(name).ok_or_else(|| missing(name))?;
    raw.parse().map_err(|_| not_numeric(name, raw))
}

/// Optional numeric field; blank is absent, not zero.
pub fn optional_number<T: FromStr>(
    fields: &FormFields,
    name: &str,
) -> Result<Option<T>, DomainError> {
    match fields.get(name) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| not_numeric(name, raw)),
    }
}

/// Creation paths that require images reject an empty attachment list.
pub fn require_images(images: &[ImageUpload]) -> Result<(), DomainError> {
    if images.is_empty() {
        return Err(DomainError::invalid_request(
            "Please select at least one image",
        ));
    }
    Ok(())
}

/// Coerce the vehicle form into a typed draft.
pub fn vehicle_draft(fields: &FormFields) -> Result<VehicleDraft, DomainError> {
    Ok(VehicleDraft {
        make: required_text(fields, "make")?,
        model: required_text(fields, "model")?,
        year: required_number(fields, "year")?,
        price: required_number(fields, "price")?,
        mileage: optional_number(fields, "mileage")?,
        fuel_type: required_text(fields, "fuelType")?,
        transmission: required_text(fields, "transmission")?,
        condition: required_text(fields, "condition")?,
        description: optional_text(fields, "description").unwrap_or_default(),
    })
}

/// Coerce the property form into a typed draft.
pub fn property_draft(fields: &FormFields) -> Result<PropertyDraft, DomainError> {
    let market = required_text(fields, "propertyStatus")?;
    let property_status = MarketStatus::parse(&market).ok_or_else(|| {
        DomainError::invalid_request("propertyStatus must be one of the listed options")
            .with_details(json!({ "field": "propertyStatus", "value": market }))
    })?;
    Ok(PropertyDraft {
        title: required_text(fields, "title")?,
        property_type: required_text(fields, "type")?,
        price: required_number(fields, "price")?,
        location: required_text(fields, "location")?,
        bedrooms: optional_number(fields, "bedrooms")?,
        bathrooms: optional_number(fields, "bathrooms")?,
        area: optional_number(fields, "area")?,
        property_status,
        description: optional_text(fields, "description").unwrap_or_default(),
    })
}

/// Guard disabling a submit control while its request is in flight.
///
/// The permit restores the control on every exit path, success or
/// failure, because release happens on drop.
#[derive(Debug, Default)]
pub struct SubmitGuard {
    busy: AtomicBool,
}

/// Live permit for one in-flight submission.
pub struct SubmitPermit<'a> {
    guard: &'a SubmitGuard,
}

impl SubmitGuard {
    /// Create an idle guard.
    pub fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    /// Take the permit, rejecting while a submission is in flight.
    pub fn acquire(&self) -> Result<SubmitPermit<'_>, DomainError> {
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(DomainError::conflict("Submission already in progress"));
        }
        Ok(SubmitPermit { guard: self })
    }

    /// Whether a submission currently holds the permit.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

impl Drop for SubmitPermit<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn vehicle_fields() -> FormFields {
        FormFields::from_pairs([
            ("make", "Toyota"),
            ("model", "Corolla"),
            ("year", "2020"),
            ("price", "1500000"),
            ("mileage", ""),
            ("fuelType", "petrol"),
            ("transmission", "automatic"),
            ("condition", "used"),
            ("description", "Clean, one owner"),
        ])
    }

    #[test]
    fn blank_optional_numbers_are_absent_not_zero() {
        let draft = vehicle_draft(&vehicle_fields()).expect("draft parses");
        assert_eq!(draft.mileage, None);
        assert_eq!(draft.year, 2020);
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        let mut fields = vehicle_fields();
        fields.0.remove("make");
        let error = vehicle_draft(&fields).expect_err("make required");
        assert!(error.message().contains("make is required"));
    }

    #[rstest]
    #[case("year", "twenty-twenty")]
    #[case("price", "1.5m")]
    fn malformed_numbers_are_rejected(#[case] name: &str, #[case] value: &str) {
        let mut fields = vehicle_fields();
        fields.0.insert(name.to_owned(), value.to_owned());
        let error = vehicle_draft(&fields).expect_err("bad number rejected");
        assert!(error.message().contains("must be a number"));
    }

    #[test]
    fn property_market_status_must_be_a_known_option() {
        let fields = FormFields::from_pairs([
            ("title", "Garden flat"),
            ("type", "apartment"),
            ("price", "9500000"),
            ("location", "Westlands"),
            ("propertyStatus", "for-lease"),
        ]);
        let error = property_draft(&fields).expect_err("unknown market status");
        assert!(error.message().contains("propertyStatus"));
    }

    #[test]
    fn creation_requires_at_least_one_image() {
        let error = require_images(&[]).expect_err("empty attachments rejected");
        assert!(error.message().contains("at least one image"));
    }

    #[test]
    fn the_submit_permit_releases_on_every_path() {
        let guard = SubmitGuard::new();
        {
            let _permit = guard.acquire().expect("first acquire succeeds");
            assert!(guard.is_busy());
            assert!(guard.acquire().is_err());
        }
        assert!(!guard.is_busy());
        let _permit = guard.acquire().expect("released after drop");
    }
}
