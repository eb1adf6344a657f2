//! Shared HTTP adapter state.
//!
//! Handlers receive their collaborators through `actix_web::web::Data`
//! instead of reaching for process-wide singletons, so every handler is
//! testable with whatever adapters a test wires in.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::feed::LiveFeed;
use crate::domain::forms::SubmitGuard;
use crate::domain::gateway::DataGateway;
use crate::domain::notice::NoticeHub;
use crate::domain::ports::SettingsStore;
use crate::domain::site_sync::SiteSync;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub gateway: DataGateway,
    pub site_sync: Arc<SiteSync>,
    pub feed: Arc<LiveFeed>,
    pub settings: Arc<dyn SettingsStore>,
    pub notices: NoticeHub,
    pub clock: Arc<dyn Clock>,
    pub vehicle_form: Arc<SubmitGuard>,
    pub property_form: Arc<SubmitGuard>,
}

impl HttpState {
    /// Bundle the domain services behind one handle.
    pub fn new(
        gateway: DataGateway,
        site_sync: Arc<SiteSync>,
        feed: Arc<LiveFeed>,
        settings: Arc<dyn SettingsStore>,
        notices: NoticeHub,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gateway,
            site_sync,
            feed,
            settings,
            notices,
            clock,
            vehicle_form: Arc::new(SubmitGuard::new()),
            property_form: Arc::new(SubmitGuard::new()),
        }
    }
}
