//! End-to-end dashboard flows over the in-memory adapters.

use std::sync::Arc;

use actix_web::{test, web, App};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{TimeZone, Utc};
use mockable::DefaultClock;
use serde_json::{json, Value};

use backend::domain::catalog::{
    CatalogRecord, Enquiry, EnquiryStatus, EnquiryTopic, RecordId, Subscriber, SubscriberStatus,
};
use backend::inbound::http::configure_api;
use backend::outbound::memory::{MemoryDocumentStore, MemoryMediaStore, MemorySettingsStore};
use backend::server::{build_services, AppServices};

struct TestContext {
    services: AppServices,
    store: Arc<MemoryDocumentStore>,
}

fn memory_services() -> TestContext {
    let store = Arc::new(MemoryDocumentStore::new());
    let services = build_services(
        Arc::clone(&store) as Arc<dyn backend::domain::ports::DocumentStore>,
        Arc::new(MemoryMediaStore::new("https://media.example.test")),
        Arc::new(MemorySettingsStore::new()),
        Arc::new(DefaultClock),
    );
    TestContext { services, store }
}

fn vehicle_form_body() -> Value {
    json!({
        "fields": {
            "make": "Toyota",
            "model": "Corolla",
            "year": "2020",
            "price": "1500000",
            "mileage": "",
            "fuelType": "petrol",
            "transmission": "automatic",
            "condition": "used",
            "description": "Clean, one owner"
        },
        "images": [{
            "fileName": "front.jpg",
            "contentType": "image/jpeg",
            "data": BASE64.encode([0xFF_u8, 0xD8, 0xFF, 0xE0])
        }]
    })
}

fn enquiry(name: &str, minute: u32) -> Enquiry {
    Enquiry {
        id: RecordId::random(),
        name: name.to_owned(),
        email: format!("{}@example.test", name.to_lowercase()),
        phone: None,
        company: None,
        topic: EnquiryTopic::General,
        subject: None,
        message: "Is this still available?".to_owned(),
        vehicle_id: None,
        property_id: None,
        status: EnquiryStatus::New,
        read: false,
        read_at: None,
        notes: None,
        notes_updated_at: None,
        notified: true,
        submitted_at: Utc
            .with_ymd_and_hms(2025, 6, 1, 9, minute, 0)
            .single()
            .expect("valid timestamp"),
        updated_at: None,
    }
}

fn subscriber(email: &str) -> Subscriber {
    Subscriber {
        id: RecordId::random(),
        email: email.to_owned(),
        name: Some("Reader".to_owned()),
        status: SubscriberStatus::Active,
        notified: true,
        subscribed_at: Utc
            .with_ymd_and_hms(2025, 6, 1, 8, 0, 0)
            .single()
            .expect("valid timestamp"),
        updated_at: None,
    }
}

#[actix_web::test]
async fn vehicle_lifecycle_create_toggle_archive() {
    let ctx = memory_services();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(ctx.services.http.clone()))
            .configure(configure_api),
    )
    .await;

    // Create: the stock code comes back with the VEH prefix.
    let req = test::TestRequest::post()
        .uri("/api/v1/vehicles")
        .set_json(vehicle_form_body())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let code = created["code"].as_str().expect("stock code returned");
    assert!(code.starts_with("VEH-"));
    assert_eq!(code.len(), "VEH-".len() + 6);
    let id = created["id"].as_str().expect("record id returned").to_owned();

    // The new vehicle is active and visible.
    let req = test::TestRequest::get().uri("/api/v1/vehicles").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed["total"], 1);
    assert_eq!(listed["records"][0]["status"], "active");
    let image_url = listed["records"][0]["images"][0]
        .as_str()
        .expect("uploaded image url embedded");
    assert!(image_url.starts_with("https://media.example.test/vehicles/"));
    assert!(image_url.ends_with(".jpg"));

    // Toggle to inactive: the active-only view no longer shows it.
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/vehicles/{id}/status"))
        .set_json(json!({ "status": "inactive" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), actix_web::http::StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/api/v1/vehicles?status=active")
        .to_request();
    let active_only: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(active_only["count"], 0);
    assert_eq!(active_only["total"], 1);

    // Deleting without confirmation is refused.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/vehicles/{id}"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), actix_web::http::StatusCode::BAD_REQUEST);

    // Confirmed delete archives: gone from the default list, still in
    // the store under its tombstone status.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/vehicles/{id}?confirm=true"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), actix_web::http::StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri("/api/v1/vehicles").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed["total"], 0);

    let req = test::TestRequest::get()
        .uri("/api/v1/vehicles?includeDeleted=true")
        .to_request();
    let with_archived: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(with_archived["total"], 1);
    assert_eq!(with_archived["records"][0]["status"], "deleted");
}

#[actix_web::test]
async fn creating_without_images_is_rejected() {
    let ctx = memory_services();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(ctx.services.http.clone()))
            .configure(configure_api),
    )
    .await;

    let mut body = vehicle_form_body();
    body["images"] = json!([]);
    let req = test::TestRequest::post()
        .uri("/api/v1/vehicles")
        .set_json(body)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), actix_web::http::StatusCode::BAD_REQUEST);
    let error: Value = test::read_body_json(res).await;
    assert!(error["message"]
        .as_str()
        .expect("error message")
        .contains("at least one image"));
}

#[actix_web::test]
async fn search_filters_the_vehicle_list() {
    let ctx = memory_services();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(ctx.services.http.clone()))
            .configure(configure_api),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/vehicles")
        .set_json(vehicle_form_body())
        .to_request();
    let _: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/vehicles?search=corolla")
        .to_request();
    let hits: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(hits["count"], 1);

    let req = test::TestRequest::get()
        .uri("/api/v1/vehicles?search=landcruiser")
        .to_request();
    let misses: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(misses["count"], 0);
    assert_eq!(misses["view"]["node"], "element");
}

#[actix_web::test]
async fn subscriber_export_downloads_csv() {
    let ctx = memory_services();
    ctx.store.seed(vec![
        subscriber("first@example.test").into_record(),
        subscriber("second@example.test").into_record(),
    ]);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(ctx.services.http.clone()))
            .configure(configure_api),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/export/newsletters")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), actix_web::http::StatusCode::OK);
    let disposition = res
        .headers()
        .get("content-disposition")
        .expect("attachment header")
        .to_str()
        .expect("ascii header")
        .to_owned();
    assert!(disposition.contains("newsletter-subscribers-export-"));

    let body = test::read_body(res).await;
    let text = std::str::from_utf8(&body).expect("utf8 csv");
    assert_eq!(text.lines().count(), 3);
    assert!(text.lines().next().expect("header row").contains("Email"));
}

#[actix_web::test]
async fn site_sync_generates_artifacts_and_records_the_time() {
    let ctx = memory_services();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(ctx.services.http.clone()))
            .configure(configure_api),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/site-sync")
        .to_request();
    let report: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        report["artifacts"]
            .as_array()
            .expect("artifact list")
            .len(),
        5
    );

    let req = test::TestRequest::get()
        .uri("/api/v1/site-sync/status")
        .to_request();
    let status: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(status["inProgress"], false);
    assert!(status["lastSync"].is_string());
}

#[actix_web::test]
async fn enquiries_can_be_worked_through_their_statuses() {
    let ctx = memory_services();
    let first = enquiry("Alex", 5);
    let first_id = first.id;
    ctx.store
        .seed(vec![first.into_record(), enquiry("Grace", 9).into_record()]);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(ctx.services.http.clone()))
            .configure(configure_api),
    )
    .await;

    // Newest first.
    let req = test::TestRequest::get().uri("/api/v1/enquiries").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed["records"][0]["name"], "Grace");
    assert_eq!(listed["records"][1]["name"], "Alex");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/enquiries/{first_id}/status"))
        .set_json(json!({ "status": "contacted" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), actix_web::http::StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/api/v1/enquiries?status=contacted")
        .to_request();
    let contacted: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(contacted["count"], 1);

    let req = test::TestRequest::post()
        .uri("/api/v1/enquiries/read-all?confirm=true")
        .to_request();
    let marked: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(marked["marked"], 2);

    // Hard delete removes the record outright.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/enquiries/{first_id}?confirm=true"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), actix_web::http::StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/api/v1/enquiries?includeDeleted=true")
        .to_request();
    let remaining: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(remaining["total"], 1);
}

#[actix_web::test]
async fn summary_counts_follow_the_seeded_records() {
    let ctx = memory_services();
    ctx.store.seed(vec![
        subscriber("first@example.test").into_record(),
        enquiry("Alex", 5).into_record(),
    ]);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(ctx.services.http.clone()))
            .configure(configure_api),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/summary").to_request();
    let summary: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary["activeVehicles"], 0);
    assert_eq!(summary["subscribers"], 1);
    assert_eq!(summary["openEnquiries"], 1);
}

#[actix_web::test]
async fn theme_preference_round_trips() {
    let ctx = memory_services();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(ctx.services.http.clone()))
            .configure(configure_api),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/settings").to_request();
    let settings: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(settings["theme"], "system");

    let req = test::TestRequest::put()
        .uri("/api/v1/settings/theme")
        .set_json(json!({ "theme": "dark" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), actix_web::http::StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri("/api/v1/settings").to_request();
    let settings: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(settings["theme"], "dark");
}
