//! Unit tests for the website sync job.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use tokio::sync::Semaphore;

use super::*;
use crate::domain::catalog::{CatalogRecord, MarketStatus, RecordId};
use crate::domain::kind::RecordKind;
use crate::domain::notice::NoticeLevel;
use crate::domain::ports::{
    ChangeStream, DocumentStore, DocumentStoreError, MockDocumentStore, MockMediaStore,
    MockSettingsStore,
};
use crate::domain::record::Record;

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn sync_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn vehicle(status: VehicleStatus) -> Vehicle {
    Vehicle {
        id: RecordId::random(),
        vehicle_id: "VEH-000001".to_owned(),
        make: "Toyota".to_owned(),
        model: "Corolla".to_owned(),
        year: 2020,
        price: 1_500_000.0,
        mileage: None,
        fuel_type: "petrol".to_owned(),
        transmission: "automatic".to_owned(),
        condition: "used".to_owned(),
        description: "Clean".to_owned(),
        images: Vec::new(),
        status,
        created_at: sync_time(),
        updated_at: sync_time(),
    }
}

fn property(status: PropertyStatus) -> Property {
    Property {
        id: RecordId::random(),
        property_id: "PROP-000001".to_owned(),
        title: "Garden flat".to_owned(),
        property_type: "apartment".to_owned(),
        price: 9_500_000.0,
        location: "Westlands".to_owned(),
        bedrooms: Some(2),
        bathrooms: Some(1),
        area: None,
        property_status: MarketStatus::ForSale,
        description: "Bright".to_owned(),
        images: Vec::new(),
        status,
        created_at: sync_time(),
        updated_at: sync_time(),
    }
}

fn site_sync(store: MockDocumentStore, settings: MockSettingsStore) -> SiteSync {
    let notices = NoticeHub::new();
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(sync_time()));
    let gateway = DataGateway::new(
        Arc::new(store),
        Arc::new(MockMediaStore::new()),
        Arc::clone(&clock),
        notices.clone(),
    );
    SiteSync::new(gateway, Arc::new(settings), clock, notices)
}

#[tokio::test]
async fn sync_exports_only_active_records() {
    let mut store = MockDocumentStore::new();
    store
        .expect_list()
        .withf(|kind| *kind == RecordKind::Vehicle)
        .returning(|_| {
            Ok(vec![
                vehicle(VehicleStatus::Active).into_record(),
                vehicle(VehicleStatus::Active).into_record(),
                vehicle(VehicleStatus::Inactive).into_record(),
            ])
        });
    store
        .expect_list()
        .withf(|kind| *kind == RecordKind::Property)
        .returning(|_| Ok(vec![property(PropertyStatus::Active).into_record()]));
    let mut settings = MockSettingsStore::new();
    settings
        .expect_set_last_sync()
        .times(1)
        .withf(|at| *at == sync_time())
        .returning(|_| Ok(()));

    let sync = site_sync(store, settings);
    let report = sync.run().await.expect("sync succeeds");

    assert_eq!(report.active_vehicles, 2);
    assert_eq!(report.active_properties, 1);
    assert_eq!(report.synced_at, sync_time());

    let names: Vec<&str> = report
        .artifacts
        .iter()
        .map(|artifact| artifact.file_name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "vehicles-data.js",
            "vehicles-data.json",
            "properties-data.js",
            "properties-data.json",
            "website-data.js",
        ]
    );
}

#[tokio::test]
async fn the_json_artifact_carries_stamp_count_and_records() {
    let mut store = MockDocumentStore::new();
    store
        .expect_list()
        .withf(|kind| *kind == RecordKind::Vehicle)
        .returning(|_| Ok(vec![vehicle(VehicleStatus::Active).into_record()]));
    store
        .expect_list()
        .withf(|kind| *kind == RecordKind::Property)
        .returning(|_| Ok(Vec::new()));
    let mut settings = MockSettingsStore::new();
    settings.expect_set_last_sync().returning(|_| Ok(()));

    let sync = site_sync(store, settings);
    let report = sync.run().await.expect("sync succeeds");

    let json_file = report
        .artifacts
        .iter()
        .find(|artifact| artifact.file_name == "vehicles-data.json")
        .expect("json artifact present");
    let parsed: serde_json::Value =
        serde_json::from_str(&json_file.body).expect("artifact is valid JSON");
    assert_eq!(parsed["totalCount"], 1);
    assert_eq!(parsed["lastUpdate"], sync_time().to_rfc3339());
    assert_eq!(parsed["vehicles"][0]["vehicleId"], "VEH-000001");

    let script = report
        .artifacts
        .iter()
        .find(|artifact| artifact.file_name == "vehicles-data.js")
        .expect("script artifact present");
    assert!(script.body.starts_with("// Auto-generated site data"));
    assert!(script.body.contains("window.vehiclesData = {"));
    assert!(script.body.contains("function getVehicleById(id)"));
}

struct GatedStore {
    gate: Semaphore,
}

#[async_trait]
impl DocumentStore for GatedStore {
    async fn insert(&self, _record: Record) -> Result<(), DocumentStoreError> {
        unimplemented!("not used by sync")
    }

    async fn replace(&self, _record: Record) -> Result<(), DocumentStoreError> {
        unimplemented!("not used by sync")
    }

    async fn replace_batch(&self, _records: Vec<Record>) -> Result<(), DocumentStoreError> {
        unimplemented!("not used by sync")
    }

    async fn remove(&self, _kind: RecordKind, _id: RecordId) -> Result<(), DocumentStoreError> {
        unimplemented!("not used by sync")
    }

    async fn fetch(
        &self,
        _kind: RecordKind,
        _id: RecordId,
    ) -> Result<Option<Record>, DocumentStoreError> {
        unimplemented!("not used by sync")
    }

    async fn list(&self, _kind: RecordKind) -> Result<Vec<Record>, DocumentStoreError> {
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|err| DocumentStoreError::query(err.to_string()))?;
        Ok(Vec::new())
    }

    async fn mark_notified(
        &self,
        _kind: RecordKind,
        _id: RecordId,
    ) -> Result<(), DocumentStoreError> {
        unimplemented!("not used by sync")
    }

    fn watch(&self, _kind: RecordKind) -> Result<ChangeStream, DocumentStoreError> {
        unimplemented!("not used by sync")
    }

    async fn probe(&self) -> Result<(), DocumentStoreError> {
        Ok(())
    }
}

#[tokio::test]
async fn a_concurrent_sync_is_rejected_not_queued() {
    let store = Arc::new(GatedStore {
        gate: Semaphore::new(0),
    });
    let notices = NoticeHub::new();
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(sync_time()));
    let gateway = DataGateway::new(
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        Arc::new(MockMediaStore::new()),
        Arc::clone(&clock),
        notices.clone(),
    );
    let mut settings = MockSettingsStore::new();
    settings.expect_set_last_sync().returning(|_| Ok(()));
    let sync = Arc::new(SiteSync::new(
        gateway,
        Arc::new(settings),
        clock,
        notices.clone(),
    ));

    let running = Arc::clone(&sync);
    let first = tokio::spawn(async move { running.run().await });

    // Wait for the first run to take the guard and stall on the store.
    for _ in 0..100 {
        if sync.in_progress() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(sync.in_progress());

    let mut notice_rx = notices.subscribe();
    let error = sync.run().await.expect_err("second run rejected");
    assert_eq!(error.code(), crate::domain::error::ErrorCode::Conflict);
    let notice = notice_rx.try_recv().expect("warning posted");
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert!(notice.message.contains("already in progress"));

    // Release the stalled run; it finishes and frees the guard.
    store.gate.add_permits(8);
    first
        .await
        .expect("task joins")
        .expect("first run completes");
    assert!(!sync.in_progress());
}
