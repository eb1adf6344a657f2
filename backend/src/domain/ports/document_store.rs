//! Port abstraction for the hosted document store.
//!
//! Collection-per-kind, opaque ids, descending submission-time ordering,
//! and a live change stream per kind. The stream delivers the ENTIRE
//! recomputed list on every change batch, never a delta; newly added
//! documents are reported alongside so the feed can drive one-shot
//! arrival toasts.

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::macros::define_port_error;
use crate::domain::catalog::RecordId;
use crate::domain::kind::RecordKind;
use crate::domain::record::Record;

define_port_error! {
    /// Errors raised by document store adapters.
    pub enum DocumentStoreError {
        /// The store could not be reached.
        Connection { message: String } => "document store connection failed: {message}",
        /// A read or write failed during execution.
        Query { message: String } => "document store query failed: {message}",
        /// The change stream for a collection broke down.
        Stream { message: String } => "document store change stream failed: {message}",
    }
}

/// One change-stream delivery: the full recomputed collection plus the
/// documents added since the previous delivery.
#[derive(Debug, Clone)]
pub struct ChangeBatch {
    /// Entire collection, ordered by submission time descending.
    pub records: Vec<Record>,
    /// Documents newly added in this batch.
    pub added: Vec<Record>,
}

/// Receiving half of a collection change stream.
pub type ChangeStream = broadcast::Receiver<ChangeBatch>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document into its kind's collection.
    async fn insert(&self, record: Record) -> Result<(), DocumentStoreError>;

    /// Replace an existing document wholesale.
    async fn replace(&self, record: Record) -> Result<(), DocumentStoreError>;

    /// Replace several documents of one kind atomically.
    async fn replace_batch(&self, records: Vec<Record>) -> Result<(), DocumentStoreError>;

    /// Remove a document from the store.
    async fn remove(&self, kind: RecordKind, id: RecordId) -> Result<(), DocumentStoreError>;

    /// Fetch one document by id.
    async fn fetch(
        &self,
        kind: RecordKind,
        id: RecordId,
    ) -> Result<Option<Record>, DocumentStoreError>;

    /// List a collection ordered by submission time, descending.
    async fn list(&self, kind: RecordKind) -> Result<Vec<Record>, DocumentStoreError>;

    /// Persist the arrival-toast flag without touching anything else.
    async fn mark_notified(
        &self,
        kind: RecordKind,
        id: RecordId,
    ) -> Result<(), DocumentStoreError>;

    /// Open the change stream for one kind's collection.
    fn watch(&self, kind: RecordKind) -> Result<ChangeStream, DocumentStoreError>;

    /// Cheap connectivity probe used by the readiness endpoint.
    async fn probe(&self) -> Result<(), DocumentStoreError>;
}
