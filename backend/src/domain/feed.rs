//! Live change-stream subscriptions for the dashboard.
//!
//! One subscription per (kind, consumer) pair. Each delivery hands the
//! consumer the ENTIRE recomputed list, never a delta; consumers are not
//! expected to merge anything. Newly added records drive a one-shot
//! arrival toast, made at-most-once by writing the `notified` flag back
//! to the record, so a dashboard reload does not re-fire old toasts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::error::DomainError;
use super::kind::RecordKind;
use super::notice::NoticeHub;
use super::ports::{DocumentStore, DocumentStoreError};
use super::record::Record;

/// Consumer callback invoked with each full recomputed list.
pub type FeedCallback = Arc<dyn Fn(Vec<Record>) + Send + Sync>;

/// Registry of live subscriptions, one per (kind, consumer).
pub struct LiveFeed {
    store: Arc<dyn DocumentStore>,
    notices: NoticeHub,
    subscriptions: Mutex<HashMap<(RecordKind, String), JoinHandle<()>>>,
}

impl LiveFeed {
    /// Create a feed registry over the given store.
    pub fn new(store: Arc<dyn DocumentStore>, notices: NoticeHub) -> Self {
        Self {
            store,
            notices,
            subscriptions: Mutex::new(HashMap::new()),
        }
    }

    /// Subscribe a consumer to one kind's change stream.
    ///
    /// Any previous subscription for the same (kind, consumer) pair is
    /// torn down first so callbacks never double-fire. The full current
    /// list is delivered immediately, then once per change batch. A
    /// broken stream posts a notice and ends the subscription; there is
    /// no automatic reconnect, the consumer re-subscribes explicitly.
    pub async fn subscribe(
        &self,
        kind: RecordKind,
        consumer: &str,
        callback: FeedCallback,
    ) -> Result<(), DomainError> {
        self.unsubscribe(kind, consumer);

        let mut stream = self.store.watch(kind).map_err(map_feed_error)?;
        let initial = self.store.list(kind).await.map_err(map_feed_error)?;
        callback(initial);

        let store = Arc::clone(&self.store);
        let notices = self.notices.clone();
        let task = tokio::spawn(async move {
            loop {
                match stream.recv().await {
                    Ok(batch) => {
                        for added in &batch.added {
                            if added.notified() {
                                continue;
                            }
                            if let Some(message) = added.arrival_message() {
                                notices.info(message);
                            }
                            // Best effort: losing the flag only risks a
                            // repeat toast after a reload.
                            if let Err(error) = store.mark_notified(kind, added.id()).await {
                                debug!(error = %error, "could not persist notified flag");
                            }
                        }
                        callback(batch.records);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(kind = %kind, skipped, "change stream lagged; catching up");
                    }
                    Err(RecvError::Closed) => {
                        warn!(kind = %kind, "change stream closed");
                        notices.error(format!("Error connecting to {} feed", kind.label()));
                        break;
                    }
                }
            }
        });

        let mut subscriptions = self.lock_subscriptions();
        subscriptions.insert((kind, consumer.to_owned()), task);
        Ok(())
    }

    /// Tear down the subscription for one (kind, consumer) pair.
    pub fn unsubscribe(&self, kind: RecordKind, consumer: &str) {
        let handle = self
            .lock_subscriptions()
            .remove(&(kind, consumer.to_owned()));
        if let Some(handle) = handle {
            handle.abort();
        }
    }

    /// Number of live subscriptions currently registered.
    pub fn active_subscriptions(&self) -> usize {
        self.lock_subscriptions().len()
    }

    fn lock_subscriptions(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<(RecordKind, String), JoinHandle<()>>> {
        match self.subscriptions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        for handle in self.lock_subscriptions().values() {
            handle.abort();
        }
    }
}

fn map_feed_error(error: DocumentStoreError) -> DomainError {
    DomainError::unavailable(error.to_string())
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
