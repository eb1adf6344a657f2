//! Unit tests for live feed subscriptions.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tokio::sync::broadcast;

use super::*;
use crate::domain::catalog::{CatalogRecord, Enquiry, EnquiryStatus, EnquiryTopic, RecordId};
use crate::domain::notice::NoticeLevel;
use crate::domain::ports::{ChangeBatch, MockDocumentStore};

fn enquiry(notified: bool) -> Enquiry {
    Enquiry {
        id: RecordId::random(),
        name: "Grace Njeri".to_owned(),
        email: "grace@example.test".to_owned(),
        phone: None,
        company: None,
        topic: EnquiryTopic::General,
        subject: None,
        message: "Do you deliver upcountry?".to_owned(),
        vehicle_id: None,
        property_id: None,
        status: EnquiryStatus::New,
        read: false,
        read_at: None,
        notes: None,
        notes_updated_at: None,
        notified,
        submitted_at: Utc
            .with_ymd_and_hms(2025, 6, 1, 9, 30, 0)
            .single()
            .expect("valid timestamp"),
        updated_at: None,
    }
}

struct Capture {
    deliveries: Mutex<Vec<Vec<Record>>>,
}

impl Capture {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            deliveries: Mutex::new(Vec::new()),
        })
    }

    fn callback(capture: &Arc<Self>) -> FeedCallback {
        let capture = Arc::clone(capture);
        Arc::new(move |records| {
            capture
                .deliveries
                .lock()
                .expect("capture lock")
                .push(records);
        })
    }

    fn count(&self) -> usize {
        self.deliveries.lock().expect("capture lock").len()
    }

    fn last_len(&self) -> Option<usize> {
        self.deliveries
            .lock()
            .expect("capture lock")
            .last()
            .map(Vec::len)
    }
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

fn store_with_stream(
    tx: &broadcast::Sender<ChangeBatch>,
    initial: Vec<Record>,
) -> MockDocumentStore {
    let mut store = MockDocumentStore::new();
    let watch_tx = tx.clone();
    store
        .expect_watch()
        .returning(move |_| Ok(watch_tx.subscribe()));
    store.expect_list().returning(move |_| Ok(initial.clone()));
    store
}

#[tokio::test]
async fn subscribing_delivers_the_initial_snapshot() {
    let (tx, _keepalive) = broadcast::channel(8);
    let initial = vec![enquiry(true).into_record()];
    let store = store_with_stream(&tx, initial);

    let feed = LiveFeed::new(Arc::new(store), NoticeHub::new());
    let capture = Capture::new();
    feed.subscribe(RecordKind::Enquiry, "dashboard", Capture::callback(&capture))
        .await
        .expect("subscription established");

    assert_eq!(capture.count(), 1);
    assert_eq!(capture.last_len(), Some(1));
}

#[tokio::test]
async fn change_batches_replace_the_whole_list() {
    let (tx, _keepalive) = broadcast::channel(8);
    let store = store_with_stream(&tx, Vec::new());

    let feed = LiveFeed::new(Arc::new(store), NoticeHub::new());
    let capture = Capture::new();
    feed.subscribe(RecordKind::Enquiry, "dashboard", Capture::callback(&capture))
        .await
        .expect("subscription established");

    let first = enquiry(true);
    let second = enquiry(true);
    tx.send(ChangeBatch {
        records: vec![second.clone().into_record(), first.into_record()],
        added: Vec::new(),
    })
    .expect("batch delivered");

    let capture_for_wait = Arc::clone(&capture);
    wait_until(move || capture_for_wait.count() == 2).await;
    assert_eq!(capture.last_len(), Some(2));
}

#[tokio::test]
async fn new_arrivals_toast_once_and_persist_the_flag() {
    let (tx, _keepalive) = broadcast::channel(8);
    let fresh = enquiry(false);
    let fresh_id = fresh.id;
    let mut store = store_with_stream(&tx, Vec::new());
    store
        .expect_mark_notified()
        .times(1)
        .withf(move |kind, id| *kind == RecordKind::Enquiry && *id == fresh_id)
        .returning(|_, _| Ok(()));

    let notices = NoticeHub::new();
    let mut notice_rx = notices.subscribe();
    let feed = LiveFeed::new(Arc::new(store), notices);
    let capture = Capture::new();
    feed.subscribe(RecordKind::Enquiry, "dashboard", Capture::callback(&capture))
        .await
        .expect("subscription established");

    tx.send(ChangeBatch {
        records: vec![fresh.clone().into_record()],
        added: vec![fresh.clone().into_record()],
    })
    .expect("batch delivered");

    let capture_for_wait = Arc::clone(&capture);
    wait_until(move || capture_for_wait.count() == 2).await;
    let notice = notice_rx.try_recv().expect("arrival toast posted");
    assert_eq!(notice.level, NoticeLevel::Info);
    assert!(notice.message.contains("Grace Njeri"));

    // The same record arriving flagged no longer toasts.
    let mut already_flagged = fresh;
    already_flagged.notified = true;
    tx.send(ChangeBatch {
        records: vec![already_flagged.clone().into_record()],
        added: vec![already_flagged.into_record()],
    })
    .expect("batch delivered");

    let capture_for_wait = Arc::clone(&capture);
    wait_until(move || capture_for_wait.count() == 3).await;
    assert!(notice_rx.try_recv().is_err());
}

#[tokio::test]
async fn resubscribing_tears_down_the_previous_handle() {
    let (tx, _keepalive) = broadcast::channel(8);
    let store = store_with_stream(&tx, Vec::new());

    let feed = LiveFeed::new(Arc::new(store), NoticeHub::new());
    let capture = Capture::new();
    feed.subscribe(RecordKind::Enquiry, "dashboard", Capture::callback(&capture))
        .await
        .expect("first subscription");
    feed.subscribe(RecordKind::Enquiry, "dashboard", Capture::callback(&capture))
        .await
        .expect("second subscription");

    assert_eq!(feed.active_subscriptions(), 1);
    // Two initial snapshots were delivered, one per subscribe call.
    assert_eq!(capture.count(), 2);

    tx.send(ChangeBatch {
        records: vec![enquiry(true).into_record()],
        added: Vec::new(),
    })
    .expect("batch delivered");

    // Only the surviving subscription forwards the batch.
    let capture_for_wait = Arc::clone(&capture);
    wait_until(move || capture_for_wait.count() >= 3).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(capture.count(), 3);
}

#[tokio::test]
async fn a_closed_stream_posts_an_error_and_stays_down() {
    let (tx, rx) = broadcast::channel::<ChangeBatch>(8);
    let mut store = MockDocumentStore::new();
    store.expect_watch().return_once(move |_| Ok(rx));
    store.expect_list().returning(|_| Ok(Vec::new()));

    let notices = NoticeHub::new();
    let mut notice_rx = notices.subscribe();
    let feed = LiveFeed::new(Arc::new(store), notices);
    let capture = Capture::new();
    feed.subscribe(RecordKind::Enquiry, "dashboard", Capture::callback(&capture))
        .await
        .expect("subscription established");

    // Dropping the last sender closes the stream for good.
    drop(tx);

    wait_until(move || notice_rx.try_recv().is_ok()).await;
}
