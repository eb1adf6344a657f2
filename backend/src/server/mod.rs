//! Service assembly: wire adapters into the domain and HTTP state.

pub mod config;

use std::sync::Arc;

use mockable::Clock;

use crate::domain::feed::LiveFeed;
use crate::domain::gateway::DataGateway;
use crate::domain::notice::NoticeHub;
use crate::domain::ports::{DocumentStore, MediaStore, SettingsStore};
use crate::domain::site_sync::SiteSync;
use crate::inbound::http::HttpState;
use crate::inbound::ws::WsState;

/// Fully wired service bundle for the HTTP and WebSocket surfaces.
pub struct AppServices {
    pub http: HttpState,
    pub ws: WsState,
}

/// Construct every domain service over the given adapters.
///
/// All wiring is explicit dependency injection: one notice hub, one
/// gateway, one feed registry, one sync job, shared by both surfaces.
pub fn build_services(
    store: Arc<dyn DocumentStore>,
    media: Arc<dyn MediaStore>,
    settings_store: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
) -> AppServices {
    let notices = NoticeHub::new();
    let gateway = DataGateway::new(
        Arc::clone(&store),
        media,
        Arc::clone(&clock),
        notices.clone(),
    );
    let feed = Arc::new(LiveFeed::new(store, notices.clone()));
    let site_sync = Arc::new(SiteSync::new(
        gateway.clone(),
        Arc::clone(&settings_store),
        Arc::clone(&clock),
        notices.clone(),
    ));
    let http = HttpState::new(
        gateway,
        site_sync,
        feed,
        settings_store,
        notices.clone(),
        clock,
    );
    let ws = WsState::new(notices);
    AppServices { http, ws }
}
