//! One-shot website synchronization job.
//!
//! Pulls every active vehicle and property, serializes each public kind
//! into a JSON data file plus a script wrapper the marketing site loads
//! offline, and produces a general statistics artifact. Guarded
//! single-flight: a sync already in progress rejects a concurrent
//! request instead of queuing or cancelling it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use tracing::{debug, info};
use utoipa::ToSchema;

use super::catalog::{Property, PropertyStatus, Vehicle, VehicleStatus};
use super::error::DomainError;
use super::gateway::DataGateway;
use super::notice::NoticeHub;
use super::ports::SettingsStore;

/// One generated artifact for the browser download surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncArtifact {
    pub file_name: String,
    pub content_type: String,
    pub body: String,
}

/// Outcome of a completed sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub synced_at: DateTime<Utc>,
    pub active_vehicles: usize,
    pub active_properties: usize,
    pub artifacts: Vec<SyncArtifact>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VehiclesDataFile {
    last_update: String,
    total_count: usize,
    vehicles: Vec<Vehicle>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PropertiesDataFile {
    last_update: String,
    total_count: usize,
    properties: Vec<Property>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SiteStatistics {
    total_vehicles: usize,
    total_properties: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SiteMetadata {
    sync_version: &'static str,
    sync_timestamp: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneralDataFile {
    last_update: String,
    statistics: SiteStatistics,
    metadata: SiteMetadata,
}

const SYNC_VERSION: &str = "1.0";

const VEHICLE_HELPERS: &str = r#"
function getAllVehicles() {
  return window.vehiclesData.vehicles;
}

function getVehicleById(id) {
  return window.vehiclesData.vehicles.find(v => v.id === id || v.vehicleId === id);
}

function searchVehicles(query) {
  const searchTerm = query.toLowerCase();
  return window.vehiclesData.vehicles.filter(vehicle =>
    vehicle.make.toLowerCase().includes(searchTerm) ||
    vehicle.model.toLowerCase().includes(searchTerm) ||
    vehicle.description.toLowerCase().includes(searchTerm)
  );
}
"#;

const PROPERTY_HELPERS: &str = r#"
function getAllProperties() {
  return window.propertiesData.properties;
}

function getPropertyById(id) {
  return window.propertiesData.properties.find(p => p.id === id || p.propertyId === id);
}

function searchProperties(query) {
  const searchTerm = query.toLowerCase();
  return window.propertiesData.properties.filter(property =>
    property.title.toLowerCase().includes(searchTerm) ||
    property.location.toLowerCase().includes(searchTerm) ||
    property.description.toLowerCase().includes(searchTerm)
  );
}
"#;

/// Website sync job with its single-flight guard.
pub struct SiteSync {
    gateway: DataGateway,
    settings: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
    notices: NoticeHub,
    in_flight: AtomicBool,
}

struct InFlightReset<'a>(&'a AtomicBool);

impl Drop for InFlightReset<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SiteSync {
    /// Create a sync job over the gateway and settings store.
    pub fn new(
        gateway: DataGateway,
        settings: Arc<dyn SettingsStore>,
        clock: Arc<dyn Clock>,
        notices: NoticeHub,
    ) -> Self {
        Self {
            gateway,
            settings,
            clock,
            notices,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a sync currently holds the single-flight guard.
    pub fn in_progress(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Run one sync, rejecting if another run is in flight.
    pub async fn run(&self) -> Result<SyncReport, DomainError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            self.notices.warning("Sync already in progress...");
            return Err(DomainError::conflict("sync already in progress"));
        }
        let _reset = InFlightReset(&self.in_flight);

        match self.run_inner().await {
            Ok(report) => {
                info!(
                    vehicles = report.active_vehicles,
                    properties = report.active_properties,
                    "website sync completed"
                );
                self.notices.success(format!(
                    "Website synced successfully! {} vehicles, {} properties",
                    report.active_vehicles, report.active_properties
                ));
                Ok(report)
            }
            Err(error) => {
                self.notices
                    .error(format!("Website sync failed: {}", error.message()));
                Err(error)
            }
        }
    }

    async fn run_inner(&self) -> Result<SyncReport, DomainError> {
        let now = self.clock.utc();
        let stamp = now.to_rfc3339();

        let vehicles: Vec<Vehicle> = self
            .gateway
            .list_of::<Vehicle>(true)
            .await?
            .into_iter()
            .filter(|vehicle| vehicle.status == VehicleStatus::Active)
            .collect();
        let properties: Vec<Property> = self
            .gateway
            .list_of::<Property>(true)
            .await?
            .into_iter()
            .filter(|property| property.status == PropertyStatus::Active)
            .collect();

        let active_vehicles = vehicles.len();
        let active_properties = properties.len();

        let vehicles_doc = to_pretty_json(&VehiclesDataFile {
            last_update: stamp.clone(),
            total_count: active_vehicles,
            vehicles,
        })?;
        let properties_doc = to_pretty_json(&PropertiesDataFile {
            last_update: stamp.clone(),
            total_count: active_properties,
            properties,
        })?;
        let general_doc = to_pretty_json(&GeneralDataFile {
            last_update: stamp.clone(),
            statistics: SiteStatistics {
                total_vehicles: active_vehicles,
                total_properties: active_properties,
            },
            metadata: SiteMetadata {
                sync_version: SYNC_VERSION,
                sync_timestamp: now.timestamp_millis(),
            },
        })?;

        let artifacts = vec![
            script_artifact(
                "vehicles-data.js",
                &stamp,
                "vehiclesData",
                &vehicles_doc,
                VEHICLE_HELPERS,
            ),
            json_artifact("vehicles-data.json", vehicles_doc),
            script_artifact(
                "properties-data.js",
                &stamp,
                "propertiesData",
                &properties_doc,
                PROPERTY_HELPERS,
            ),
            json_artifact("properties-data.json", properties_doc),
            script_artifact("website-data.js", &stamp, "websiteData", &general_doc, ""),
        ];

        // Losing the bookkeeping timestamp does not invalidate the
        // artifacts that were already generated.
        if let Err(error) = self.settings.set_last_sync(now).await {
            debug!(error = %error, "could not persist last sync time");
        }

        Ok(SyncReport {
            synced_at: now,
            active_vehicles,
            active_properties,
            artifacts,
        })
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, DomainError> {
    serde_json::to_string_pretty(value)
        .map_err(|err| DomainError::internal(format!("failed to serialize sync data: {err}")))
}

fn script_artifact(
    file_name: &str,
    stamp: &str,
    global: &str,
    doc: &str,
    helpers: &str,
) -> SyncArtifact {
    SyncArtifact {
        file_name: file_name.to_owned(),
        content_type: "text/javascript".to_owned(),
        body: format!(
            "// Auto-generated site data - Last updated: {stamp}\nwindow.{global} = {doc};\n{helpers}"
        ),
    }
}

fn json_artifact(file_name: &str, body: String) -> SyncArtifact {
    SyncArtifact {
        file_name: file_name.to_owned(),
        content_type: "application/json".to_owned(),
        body,
    }
}

#[cfg(test)]
#[path = "site_sync_tests.rs"]
mod tests;
