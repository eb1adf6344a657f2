//! Reqwest-backed adapter for a hosted document API.
//!
//! This adapter owns transport details only: URL layout, timeout and HTTP
//! error mapping, and JSON decoding into domain records. The hosted API
//! exposes one JSON collection per kind
//! (`{base}/{collection}`, `{base}/{collection}/{id}`), listing newest
//! first. Change streams are synthesised by polling the collection and
//! diffing document ids against the previous snapshot, which is how the
//! dashboard consumes a store that only speaks request/response.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::warn;

use crate::domain::catalog::{
    CatalogRecord, Enquiry, Property, RecordId, SellListing, Subscriber, Vehicle,
};
use crate::domain::kind::RecordKind;
use crate::domain::ports::{ChangeBatch, ChangeStream, DocumentStore, DocumentStoreError};
use crate::domain::record::Record;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const STREAM_CAPACITY: usize = 64;

/// Hosted document API adapter.
pub struct HostedDocumentApi {
    client: Client,
    base: Url,
    poll_interval: Duration,
    streams: Mutex<HashMap<RecordKind, broadcast::Sender<ChangeBatch>>>,
}

impl HostedDocumentApi {
    /// Build an adapter against `base` with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, poll_interval: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self {
            client,
            base,
            poll_interval,
            streams: Mutex::new(HashMap::new()),
        })
    }

    fn collection_url(&self, kind: RecordKind) -> Result<Url, DocumentStoreError> {
        self.base
            .join(&format!("{}/", kind.collection()))
            .map_err(|err| DocumentStoreError::query(err.to_string()))
    }

    fn document_url(&self, kind: RecordKind, id: RecordId) -> Result<Url, DocumentStoreError> {
        self.base
            .join(&format!("{}/{id}", kind.collection()))
            .map_err(|err| DocumentStoreError::query(err.to_string()))
    }

    async fn list_decoded(
        client: &Client,
        url: Url,
        kind: RecordKind,
    ) -> Result<Vec<Record>, DocumentStoreError> {
        let response = client.get(url).send().await.map_err(map_transport)?;
        let response = check_status(response)?;
        let documents: Vec<Value> = response.json().await.map_err(map_transport)?;
        documents
            .into_iter()
            .map(|document| decode(kind, document))
            .collect()
    }
}

#[async_trait]
impl DocumentStore for HostedDocumentApi {
    async fn insert(&self, record: Record) -> Result<(), DocumentStoreError> {
        let url = self.collection_url(record.kind())?;
        let response = self
            .client
            .post(url)
            .json(&record)
            .send()
            .await
            .map_err(map_transport)?;
        check_status(response).map(|_| ())
    }

    async fn replace(&self, record: Record) -> Result<(), DocumentStoreError> {
        let url = self.document_url(record.kind(), record.id())?;
        let response = self
            .client
            .put(url)
            .json(&record)
            .send()
            .await
            .map_err(map_transport)?;
        check_status(response).map(|_| ())
    }

    async fn replace_batch(&self, records: Vec<Record>) -> Result<(), DocumentStoreError> {
        let Some(kind) = records.first().map(Record::kind) else {
            return Ok(());
        };
        let url = self
            .collection_url(kind)?
            .join("batch")
            .map_err(|err| DocumentStoreError::query(err.to_string()))?;
        let response = self
            .client
            .post(url)
            .json(&records)
            .send()
            .await
            .map_err(map_transport)?;
        check_status(response).map(|_| ())
    }

    async fn remove(&self, kind: RecordKind, id: RecordId) -> Result<(), DocumentStoreError> {
        let url = self.document_url(kind, id)?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(map_transport)?;
        check_status(response).map(|_| ())
    }

    async fn fetch(
        &self,
        kind: RecordKind,
        id: RecordId,
    ) -> Result<Option<Record>, DocumentStoreError> {
        let url = self.document_url(kind, id)?;
        let response = self.client.get(url).send().await.map_err(map_transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response)?;
        let document: Value = response.json().await.map_err(map_transport)?;
        decode(kind, document).map(Some)
    }

    async fn list(&self, kind: RecordKind) -> Result<Vec<Record>, DocumentStoreError> {
        let url = self.collection_url(kind)?;
        Self::list_decoded(&self.client, url, kind).await
    }

    async fn mark_notified(
        &self,
        kind: RecordKind,
        id: RecordId,
    ) -> Result<(), DocumentStoreError> {
        let url = self.document_url(kind, id)?;
        let response = self
            .client
            .patch(url)
            .json(&serde_json::json!({ "notified": true }))
            .send()
            .await
            .map_err(map_transport)?;
        check_status(response).map(|_| ())
    }

    fn watch(&self, kind: RecordKind) -> Result<ChangeStream, DocumentStoreError> {
        let mut streams = match self.streams.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(tx) = streams.get(&kind) {
            return Ok(tx.subscribe());
        }

        let (tx, rx) = broadcast::channel(STREAM_CAPACITY);
        let poller_tx = tx.clone();
        let client = self.client.clone();
        let url = self.collection_url(kind)?;
        let interval = self.poll_interval;
        tokio::spawn(async move {
            let mut known: Option<HashSet<RecordId>> = None;
            loop {
                tokio::time::sleep(interval).await;
                if poller_tx.receiver_count() == 0 {
                    continue;
                }
                match Self::list_decoded(&client, url.clone(), kind).await {
                    Ok(records) => {
                        let ids: HashSet<RecordId> =
                            records.iter().map(Record::id).collect();
                        let added = match &known {
                            // The first poll only establishes a baseline.
                            None => Vec::new(),
                            Some(previous) => records
                                .iter()
                                .filter(|record| !previous.contains(&record.id()))
                                .cloned()
                                .collect(),
                        };
                        known = Some(ids);
                        let _ = poller_tx.send(ChangeBatch { records, added });
                    }
                    Err(error) => {
                        warn!(kind = %kind, error = %error, "document poll failed");
                    }
                }
            }
        });

        streams.insert(kind, tx);
        Ok(rx)
    }

    async fn probe(&self) -> Result<(), DocumentStoreError> {
        let url = self
            .base
            .join("_health")
            .map_err(|err| DocumentStoreError::query(err.to_string()))?;
        let response = self.client.get(url).send().await.map_err(map_transport)?;
        check_status(response).map(|_| ())
    }
}

fn decode(kind: RecordKind, document: Value) -> Result<Record, DocumentStoreError> {
    let bad_document = |err: serde_json::Error| {
        DocumentStoreError::query(format!("malformed {kind} document: {err}"))
    };
    let record = match kind {
        RecordKind::Vehicle => serde_json::from_value::<Vehicle>(document)
            .map_err(bad_document)?
            .into_record(),
        RecordKind::Property => serde_json::from_value::<Property>(document)
            .map_err(bad_document)?
            .into_record(),
        RecordKind::SellListing => serde_json::from_value::<SellListing>(document)
            .map_err(bad_document)?
            .into_record(),
        RecordKind::Subscriber => serde_json::from_value::<Subscriber>(document)
            .map_err(bad_document)?
            .into_record(),
        RecordKind::Enquiry => serde_json::from_value::<Enquiry>(document)
            .map_err(bad_document)?
            .into_record(),
    };
    Ok(record)
}

fn map_transport(error: reqwest::Error) -> DocumentStoreError {
    if error.is_connect() || error.is_timeout() {
        DocumentStoreError::connection(error.to_string())
    } else {
        DocumentStoreError::query(error.to_string())
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, DocumentStoreError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(DocumentStoreError::query(format!(
            "hosted store responded {status}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn decoding_maps_documents_to_their_kind() {
        let document = json!({
            "id": "6dd7bd0e-2b8a-4c5e-9b0a-0d5c6a1f2e3b",
            "email": "reader@example.test",
            "status": "active",
            "notified": false,
            "subscribedAt": Utc
                .with_ymd_and_hms(2025, 6, 1, 9, 0, 0)
                .single()
                .expect("valid timestamp")
                .to_rfc3339(),
        });

        let record = decode(RecordKind::Subscriber, document).expect("document decodes");
        assert_eq!(record.kind(), RecordKind::Subscriber);
        assert!(!record.notified());
    }

    #[test]
    fn malformed_documents_are_query_errors() {
        let error = decode(RecordKind::Vehicle, json!({ "id": 7 }))
            .expect_err("malformed document rejected");
        assert!(matches!(error, DocumentStoreError::Query { .. }));
    }
}
