//! Inbound HTTP adapter: resource handlers and their shared plumbing.

use actix_web::web;

pub mod dashboard;
pub mod enquiries;
pub mod error;
pub mod export;
pub mod health;
pub mod payloads;
pub mod properties;
pub mod sell_listings;
pub mod settings;
pub mod site_sync;
pub mod state;
pub mod subscribers;
pub mod vehicles;

pub use error::{ApiError, ApiResult};
pub use state::HttpState;

use crate::domain::notice::NoticeHub;
use crate::domain::DomainError;

/// Surface a validation rejection as a toast before returning it.
pub(crate) fn notify_rejection(notices: &NoticeHub, error: DomainError) -> ApiError {
    notices.error(error.message().to_owned());
    ApiError::from(error)
}

/// Mount every dashboard resource under `/api/v1`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(dashboard::summary)
            .service(vehicles::list_vehicles)
            .service(vehicles::create_vehicle)
            .service(vehicles::get_vehicle)
            .service(vehicles::update_vehicle)
            .service(vehicles::set_vehicle_status)
            .service(vehicles::delete_vehicle)
            .service(properties::list_properties)
            .service(properties::create_property)
            .service(properties::get_property)
            .service(properties::update_property)
            .service(properties::set_property_status)
            .service(properties::delete_property)
            .service(sell_listings::list_sell_listings)
            .service(sell_listings::approve_listing)
            .service(sell_listings::reject_listing)
            .service(sell_listings::delete_listing)
            .service(subscribers::list_subscribers)
            .service(subscribers::set_subscriber_status)
            .service(subscribers::delete_subscriber)
            .service(enquiries::list_enquiries)
            .service(enquiries::mark_all_enquiries_read)
            .service(enquiries::set_enquiry_status)
            .service(enquiries::mark_enquiry_read)
            .service(enquiries::set_enquiry_notes)
            .service(enquiries::delete_enquiry)
            .service(export::export_kind)
            .service(site_sync::run_site_sync)
            .service(site_sync::site_sync_status)
            .service(settings::get_settings)
            .service(settings::set_theme),
    );
}
