//! Shared WebSocket state: the frame fan-out and the dashboard feeds.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::domain::catalog::{CatalogRecord, Enquiry, SellListing, Subscriber};
use crate::domain::feed::LiveFeed;
use crate::domain::notice::NoticeHub;
use crate::domain::view::{render_list, RenderCard};
use crate::domain::DomainError;

use super::messages::ServerFrame;

const FRAME_CAPACITY: usize = 64;

/// Fan-out hub shared by every connected dashboard session.
#[derive(Clone)]
pub struct WsState {
    frames: broadcast::Sender<ServerFrame>,
    pub notices: NoticeHub,
}

impl WsState {
    /// Create the hub.
    pub fn new(notices: NoticeHub) -> Self {
        let (frames, _) = broadcast::channel(FRAME_CAPACITY);
        Self { frames, notices }
    }

    /// Subscribe a new session to pushed frames.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerFrame> {
        self.frames.subscribe()
    }

    fn sender(&self) -> broadcast::Sender<ServerFrame> {
        self.frames.clone()
    }
}

/// Wire the live kinds into the frame hub.
///
/// One subscription per live kind under the shared `dashboard` consumer
/// label; re-running tears the previous subscriptions down first, which
/// is how a manual refresh re-establishes a broken stream.
pub async fn start_dashboard_feeds(feed: &LiveFeed, ws: &WsState) -> Result<(), DomainError> {
    attach::<Enquiry>(feed, ws, "No recent enquiries").await?;
    attach::<SellListing>(feed, ws, "No sell listings submitted yet").await?;
    attach::<Subscriber>(feed, ws, "No newsletter subscriptions yet").await?;
    Ok(())
}

async fn attach<T>(feed: &LiveFeed, ws: &WsState, empty_message: &'static str) -> Result<(), DomainError>
where
    T: CatalogRecord + RenderCard,
{
    let frames = ws.sender();
    feed.subscribe(
        T::KIND,
        "dashboard",
        Arc::new(move |records| {
            let typed: Vec<T> = records
                .iter()
                .cloned()
                .filter_map(T::from_record)
                .collect();
            let frame = ServerFrame::Snapshot {
                kind: T::KIND,
                total: typed.len(),
                records,
                view: render_list(&typed, empty_message),
            };
            let _ = frames.send(frame);
        }),
    )
    .await
}
