//! Unit tests for catalog entity construction and classification.

use chrono::{DateTime, TimeZone, Utc};
use rstest::rstest;

use super::*;
use crate::domain::kind::Lifecycle;

fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn vehicle_draft() -> VehicleDraft {
    VehicleDraft {
        make: "Toyota".to_owned(),
        model: "Corolla".to_owned(),
        year: 2020,
        price: 1_500_000.0,
        mileage: Some(45_000),
        fuel_type: "petrol".to_owned(),
        transmission: "automatic".to_owned(),
        condition: "used".to_owned(),
        description: "Clean, one owner".to_owned(),
    }
}

fn vehicle(status: VehicleStatus) -> Vehicle {
    Vehicle {
        id: RecordId::random(),
        vehicle_id: "VEH-482913".to_owned(),
        make: "Toyota".to_owned(),
        model: "Corolla".to_owned(),
        year: 2020,
        price: 1_500_000.0,
        mileage: Some(45_000),
        fuel_type: "petrol".to_owned(),
        transmission: "automatic".to_owned(),
        condition: "used".to_owned(),
        description: "Clean, one owner".to_owned(),
        images: Vec::new(),
        status,
        created_at: at(),
        updated_at: at(),
    }
}

fn listing(title: Option<&str>, make: Option<&str>, model: Option<&str>) -> SellListing {
    SellListing {
        id: RecordId::random(),
        category: ListingCategory::Vehicle,
        title: title.map(str::to_owned),
        make: make.map(str::to_owned),
        model: model.map(str::to_owned),
        year: None,
        mileage: None,
        property_type: None,
        bedrooms: None,
        bathrooms: None,
        location: None,
        seller_name: "Daniel Otieno".to_owned(),
        seller_email: "daniel@example.test".to_owned(),
        seller_phone: None,
        price: Some(450_000.0),
        description: None,
        status: ListingStatus::Pending,
        notified: false,
        submitted_at: at(),
        updated_at: None,
    }
}

#[test]
fn vehicle_draft_accepts_plausible_values() {
    assert!(vehicle_draft().validate().is_ok());
}

#[rstest]
#[case(VehicleDraft { make: "  ".to_owned(), ..vehicle_draft() }, "vehicle.make")]
#[case(VehicleDraft { year: 1898, ..vehicle_draft() }, "vehicle.year")]
#[case(VehicleDraft { price: -1.0, ..vehicle_draft() }, "vehicle.price")]
#[case(VehicleDraft { mileage: Some(-5), ..vehicle_draft() }, "vehicle.mileage")]
fn vehicle_draft_rejects_bad_fields(#[case] draft: VehicleDraft, #[case] field: &str) {
    let error = draft.validate().expect_err("invalid draft rejected");
    assert!(error.to_string().contains(field));
}

#[rstest]
#[case(VehicleStatus::Active, Lifecycle::Active)]
#[case(VehicleStatus::Inactive, Lifecycle::Active)]
#[case(VehicleStatus::Sold, Lifecycle::Active)]
#[case(VehicleStatus::Deleted, Lifecycle::Archived)]
fn vehicle_lifecycle_follows_the_status(
    #[case] status: VehicleStatus,
    #[case] expected: Lifecycle,
) {
    assert_eq!(vehicle(status).lifecycle(), expected);
}

#[test]
fn vehicle_haystack_covers_the_searchable_fields() {
    let haystack = vehicle(VehicleStatus::Active).search_haystack();
    for needle in ["toyota", "corolla", "veh-482913", "2020", "petrol", "automatic"] {
        assert!(haystack.contains(needle), "missing {needle}");
    }
}

#[test]
fn applying_a_draft_preserves_identity_and_images() {
    let mut updated = vehicle(VehicleStatus::Active);
    updated.images = vec!["https://media.test/vehicles/a.jpg".to_owned()];
    let original_id = updated.id;

    updated.apply_draft(VehicleDraft {
        model: "Hilux".to_owned(),
        price: 2_200_000.0,
        ..vehicle_draft()
    });

    assert_eq!(updated.id, original_id);
    assert_eq!(updated.vehicle_id, "VEH-482913");
    assert_eq!(updated.model, "Hilux");
    assert_eq!(updated.images.len(), 1);
}

#[rstest]
#[case(Some("Family saloon"), None, None, "Family saloon")]
#[case(None, Some("Mazda"), Some("Demio"), "Mazda Demio")]
#[case(None, Some("Mazda"), None, "Mazda")]
#[case(None, None, None, "Untitled listing")]
fn listing_titles_prefer_title_then_make_model(
    #[case] title: Option<&str>,
    #[case] make: Option<&str>,
    #[case] model: Option<&str>,
    #[case] expected: &str,
) {
    assert_eq!(listing(title, make, model).display_title(), expected);
}

#[rstest]
#[case("for-sale", Some(MarketStatus::ForSale))]
#[case("rented", Some(MarketStatus::Rented))]
#[case("for-lease", None)]
fn market_status_parses_wire_values(
    #[case] raw: &str,
    #[case] expected: Option<MarketStatus>,
) {
    assert_eq!(MarketStatus::parse(raw), expected);
}

#[test]
fn statuses_serialize_as_kebab_case() {
    assert_eq!(
        serde_json::to_string(&EnquiryStatus::InProgress).expect("serializable status"),
        "\"in-progress\""
    );
    assert_eq!(
        serde_json::to_string(&MarketStatus::ForRent).expect("serializable status"),
        "\"for-rent\""
    );
}

#[test]
fn enquiries_and_subscribers_never_archive() {
    let enquiry = Enquiry {
        id: RecordId::random(),
        name: "Alex".to_owned(),
        email: "alex@example.test".to_owned(),
        phone: None,
        company: None,
        topic: EnquiryTopic::General,
        subject: None,
        message: "hello".to_owned(),
        vehicle_id: None,
        property_id: None,
        status: EnquiryStatus::Closed,
        read: true,
        read_at: Some(at()),
        notes: None,
        notes_updated_at: None,
        notified: true,
        submitted_at: at(),
        updated_at: None,
    };
    assert_eq!(enquiry.lifecycle(), Lifecycle::Active);

    let subscriber = Subscriber {
        id: RecordId::random(),
        email: "reader@example.test".to_owned(),
        name: None,
        status: SubscriberStatus::Unsubscribed,
        notified: true,
        subscribed_at: at(),
        updated_at: None,
    };
    assert_eq!(subscriber.lifecycle(), Lifecycle::Active);
}
