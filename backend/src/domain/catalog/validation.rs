//! Validation helpers shared by catalog drafts.

use super::CatalogValidationError;

pub(super) fn validate_non_empty(
    value: &str,
    field: &'static str,
) -> Result<(), CatalogValidationError> {
    if value.trim().is_empty() {
        return Err(CatalogValidationError::EmptyField { field });
    }
    Ok(())
}

pub(super) fn ensure_non_negative_price(
    value: f64,
    field: &'static str,
) -> Result<(), CatalogValidationError> {
    if value < 0.0 {
        return Err(CatalogValidationError::NegativeValue { field });
    }
    Ok(())
}

pub(super) fn ensure_non_negative_count(
    value: Option<i64>,
    field: &'static str,
) -> Result<(), CatalogValidationError> {
    if value.is_some_and(|count| count < 0) {
        return Err(CatalogValidationError::NegativeValue { field });
    }
    Ok(())
}

pub(super) fn ensure_plausible_year(
    year: i32,
    field: &'static str,
) -> Result<(), CatalogValidationError> {
    // Matches the year range offered by the original form dropdown.
    if !(1990..=2100).contains(&year) {
        return Err(CatalogValidationError::YearOutOfRange { field, year });
    }
    Ok(())
}
