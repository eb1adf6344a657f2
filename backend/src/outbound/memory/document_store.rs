//! In-memory document store adapter.
//!
//! Backs tests and the self-contained demo mode. Collections live in a
//! process-local map; every mutation recomputes the collection snapshot
//! and pushes a change batch to that kind's stream, mirroring how the
//! hosted store delivers full snapshots with per-change diffs.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::catalog::RecordId;
use crate::domain::kind::RecordKind;
use crate::domain::ports::{ChangeBatch, ChangeStream, DocumentStore, DocumentStoreError};
use crate::domain::record::Record;

const STREAM_CAPACITY: usize = 64;

/// Process-local document store.
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<RecordKind, Vec<Record>>>,
    streams: HashMap<RecordKind, broadcast::Sender<ChangeBatch>>,
}

impl MemoryDocumentStore {
    /// Create an empty store with one change stream per kind.
    pub fn new() -> Self {
        let mut streams = HashMap::new();
        for kind in RecordKind::ALL {
            let (tx, _) = broadcast::channel(STREAM_CAPACITY);
            streams.insert(kind, tx);
        }
        Self {
            collections: RwLock::new(HashMap::new()),
            streams,
        }
    }

    /// Load fixture records without emitting change batches.
    pub fn seed(&self, records: Vec<Record>) {
        let mut collections = self.lock_write();
        for record in records {
            collections.entry(record.kind()).or_default().push(record);
        }
    }

    fn lock_read(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<RecordKind, Vec<Record>>> {
        match self.collections.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_write(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<RecordKind, Vec<Record>>> {
        match self.collections.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn snapshot_locked(collection: &[Record]) -> Vec<Record> {
        let mut snapshot = collection.to_vec();
        snapshot.sort_by(|a, b| b.submitted_at().cmp(&a.submitted_at()));
        snapshot
    }

    fn publish(&self, kind: RecordKind, added: Vec<Record>) {
        let records = {
            let collections = self.lock_read();
            Self::snapshot_locked(collections.get(&kind).map_or(&[][..], Vec::as_slice))
        };
        if let Some(tx) = self.streams.get(&kind) {
            let _ = tx.send(ChangeBatch { records, added });
        }
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, record: Record) -> Result<(), DocumentStoreError> {
        let kind = record.kind();
        {
            let mut collections = self.lock_write();
            collections.entry(kind).or_default().push(record.clone());
        }
        self.publish(kind, vec![record]);
        Ok(())
    }

    async fn replace(&self, record: Record) -> Result<(), DocumentStoreError> {
        let kind = record.kind();
        let id = record.id();
        {
            let mut collections = self.lock_write();
            let collection = collections.entry(kind).or_default();
            let slot = collection
                .iter_mut()
                .find(|existing| existing.id() == id)
                .ok_or_else(|| {
                    DocumentStoreError::query(format!("no {kind} document with id {id}"))
                })?;
            *slot = record;
        }
        self.publish(kind, Vec::new());
        Ok(())
    }

    async fn replace_batch(&self, records: Vec<Record>) -> Result<(), DocumentStoreError> {
        let Some(kind) = records.first().map(Record::kind) else {
            return Ok(());
        };
        {
            let mut collections = self.lock_write();
            let collection = collections.entry(kind).or_default();
            // All or nothing: verify every target exists before writing.
            for record in &records {
                if !collection.iter().any(|existing| existing.id() == record.id()) {
                    return Err(DocumentStoreError::query(format!(
                        "no {kind} document with id {}",
                        record.id()
                    )));
                }
            }
            for record in records {
                if let Some(slot) = collection
                    .iter_mut()
                    .find(|existing| existing.id() == record.id())
                {
                    *slot = record;
                }
            }
        }
        self.publish(kind, Vec::new());
        Ok(())
    }

    async fn remove(&self, kind: RecordKind, id: RecordId) -> Result<(), DocumentStoreError> {
        {
            let mut collections = self.lock_write();
            let collection = collections.entry(kind).or_default();
            let before = collection.len();
            collection.retain(|existing| existing.id() != id);
            if collection.len() == before {
                return Err(DocumentStoreError::query(format!(
                    "no {kind} document with id {id}"
                )));
            }
        }
        self.publish(kind, Vec::new());
        Ok(())
    }

    async fn fetch(
        &self,
        kind: RecordKind,
        id: RecordId,
    ) -> Result<Option<Record>, DocumentStoreError> {
        let collections = self.lock_read();
        Ok(collections
            .get(&kind)
            .and_then(|collection| collection.iter().find(|record| record.id() == id))
            .cloned())
    }

    async fn list(&self, kind: RecordKind) -> Result<Vec<Record>, DocumentStoreError> {
        let collections = self.lock_read();
        Ok(Self::snapshot_locked(
            collections.get(&kind).map_or(&[][..], Vec::as_slice),
        ))
    }

    async fn mark_notified(
        &self,
        kind: RecordKind,
        id: RecordId,
    ) -> Result<(), DocumentStoreError> {
        let mut collections = self.lock_write();
        let collection = collections.entry(kind).or_default();
        let record = collection
            .iter_mut()
            .find(|existing| existing.id() == id)
            .ok_or_else(|| {
                DocumentStoreError::query(format!("no {kind} document with id {id}"))
            })?;
        record.set_notified();
        Ok(())
    }

    fn watch(&self, kind: RecordKind) -> Result<ChangeStream, DocumentStoreError> {
        self.streams
            .get(&kind)
            .map(broadcast::Sender::subscribe)
            .ok_or_else(|| DocumentStoreError::stream(format!("no stream for {kind}")))
    }

    async fn probe(&self) -> Result<(), DocumentStoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{CatalogRecord, Subscriber, SubscriberStatus};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 10, minute, 0)
            .single()
            .expect("valid timestamp")
    }

    fn subscriber(minute: u32) -> Subscriber {
        Subscriber {
            id: RecordId::random(),
            email: format!("reader{minute}@example.test"),
            name: None,
            status: SubscriberStatus::Active,
            notified: false,
            subscribed_at: at(minute),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn listing_orders_by_submission_time_descending() {
        let store = MemoryDocumentStore::new();
        store
            .insert(subscriber(1).into_record())
            .await
            .expect("insert");
        store
            .insert(subscriber(9).into_record())
            .await
            .expect("insert");
        store
            .insert(subscriber(5).into_record())
            .await
            .expect("insert");

        let listed = store.list(RecordKind::Subscriber).await.expect("list");
        let minutes: Vec<u32> = listed
            .iter()
            .map(|record| record.submitted_at().format("%M").to_string().parse().expect("minute"))
            .collect();
        assert_eq!(minutes, vec![9, 5, 1]);
    }

    #[tokio::test]
    async fn inserting_publishes_the_full_snapshot_with_the_addition() {
        let store = MemoryDocumentStore::new();
        let mut stream = store.watch(RecordKind::Subscriber).expect("stream opens");

        store
            .insert(subscriber(1).into_record())
            .await
            .expect("insert");
        let batch = stream.recv().await.expect("batch delivered");
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.added.len(), 1);

        store
            .insert(subscriber(2).into_record())
            .await
            .expect("insert");
        let batch = stream.recv().await.expect("batch delivered");
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.added.len(), 1);
    }

    #[tokio::test]
    async fn mark_notified_persists_across_fetches() {
        let store = MemoryDocumentStore::new();
        let record = subscriber(1);
        let id = record.id;
        store.insert(record.into_record()).await.expect("insert");

        store
            .mark_notified(RecordKind::Subscriber, id)
            .await
            .expect("flag persisted");
        let fetched = store
            .fetch(RecordKind::Subscriber, id)
            .await
            .expect("fetch")
            .expect("present");
        assert!(fetched.notified());
    }

    #[tokio::test]
    async fn replacing_an_unknown_document_fails() {
        let store = MemoryDocumentStore::new();
        let error = store
            .replace(subscriber(1).into_record())
            .await
            .expect_err("unknown id rejected");
        assert!(matches!(error, DocumentStoreError::Query { .. }));
    }
}
