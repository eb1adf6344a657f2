//! OpenAPI surface served by Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::catalog::{
    Enquiry, EnquiryStatus, EnquiryTopic, ListingCategory, ListingStatus, MarketStatus,
    Property, PropertyDraft, PropertyStatus, SellListing, Subscriber, SubscriberStatus, Vehicle,
    VehicleDraft, VehicleStatus,
};
use crate::domain::catalog::RecordId;
use crate::domain::error::{DomainError, ErrorCode};
use crate::domain::forms::FormFields;
use crate::domain::gateway::{CreatedRecord, DashboardSummary};
use crate::domain::site_sync::{SyncArtifact, SyncReport};
use crate::inbound::http;

/// Public OpenAPI document used by Swagger UI and tooling.
#[derive(OpenApi)]
#[openapi(
    paths(
        http::dashboard::summary,
        http::vehicles::list_vehicles,
        http::vehicles::get_vehicle,
        http::vehicles::create_vehicle,
        http::vehicles::update_vehicle,
        http::vehicles::set_vehicle_status,
        http::vehicles::delete_vehicle,
        http::properties::list_properties,
        http::properties::get_property,
        http::properties::create_property,
        http::properties::update_property,
        http::properties::set_property_status,
        http::properties::delete_property,
        http::sell_listings::list_sell_listings,
        http::sell_listings::approve_listing,
        http::sell_listings::reject_listing,
        http::sell_listings::delete_listing,
        http::subscribers::list_subscribers,
        http::subscribers::set_subscriber_status,
        http::subscribers::delete_subscriber,
        http::enquiries::list_enquiries,
        http::enquiries::set_enquiry_status,
        http::enquiries::mark_enquiry_read,
        http::enquiries::mark_all_enquiries_read,
        http::enquiries::set_enquiry_notes,
        http::enquiries::delete_enquiry,
        http::export::export_kind,
        http::site_sync::run_site_sync,
        http::site_sync::site_sync_status,
        http::settings::get_settings,
        http::settings::set_theme,
        http::health::live,
        http::health::ready,
    ),
    components(schemas(
        DomainError,
        ErrorCode,
        RecordId,
        FormFields,
        CreatedRecord,
        DashboardSummary,
        SyncReport,
        SyncArtifact,
        Vehicle,
        VehicleDraft,
        VehicleStatus,
        Property,
        PropertyDraft,
        PropertyStatus,
        MarketStatus,
        SellListing,
        ListingStatus,
        ListingCategory,
        Subscriber,
        SubscriberStatus,
        Enquiry,
        EnquiryStatus,
        EnquiryTopic,
        http::error::ApiError,
        http::payloads::ImageUploadBody,
        http::payloads::RecordFormBody,
        http::payloads::RecordUpdateBody,
        http::vehicles::VehicleStatusBody,
        http::properties::PropertyStatusBody,
        http::subscribers::SubscriberStatusBody,
        http::enquiries::EnquiryStatusBody,
        http::enquiries::EnquiryNotesBody,
        http::settings::SettingsResponse,
        http::settings::ThemeBody,
        http::site_sync::SyncStatusResponse,
    )),
    tags(
        (name = "dashboard", description = "Landing page counts"),
        (name = "vehicles", description = "Vehicle inventory"),
        (name = "properties", description = "Property inventory"),
        (name = "listings", description = "Sell listing moderation"),
        (name = "subscribers", description = "Newsletter subscriptions"),
        (name = "enquiries", description = "Customer enquiries"),
        (name = "export", description = "CSV downloads"),
        (name = "site-sync", description = "Static site data generation"),
        (name = "settings", description = "Operator settings"),
        (name = "health", description = "Probes"),
    )
)]
pub struct ApiDoc;
