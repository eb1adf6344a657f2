//! Data gateway wrapping every read and write against the hosted store.
//!
//! All dashboard mutations funnel through here so the side effects stay
//! uniform: attachments are uploaded before the record write, timestamps
//! come from the injected clock, human-readable stock codes are assigned
//! exactly once at creation, and every outcome posts a dashboard notice.
//! Failures are logged and surfaced; nothing is retried automatically.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use mockable::Clock;
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use super::catalog::{
    CatalogRecord, Enquiry, EnquiryStatus, ListingStatus, Property, PropertyDraft,
    PropertyStatus, RecordId, SellListing, Subscriber, SubscriberStatus, Vehicle, VehicleDraft,
    VehicleStatus,
};
use super::error::DomainError;
use super::kind::{DeleteBehaviour, Lifecycle, RecordKind};
use super::notice::NoticeHub;
use super::ports::{DocumentStore, DocumentStoreError, MediaStore, MediaStoreError};
use super::record::Record;
use super::uploads::{storage_path, validate_images, ImageUpload};

/// Outcome of a create call: the opaque id plus the generated stock code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRecord {
    pub id: RecordId,
    pub code: String,
}

/// Counts shown on the dashboard landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub active_vehicles: usize,
    pub active_properties: usize,
    pub open_enquiries: usize,
    pub pending_listings: usize,
    pub subscribers: usize,
}

/// Generate the human-readable stock code assigned at creation.
///
/// The code is the kind prefix plus the last six digits of the clock's
/// Unix-millisecond value, so codes are short, roughly sortable within a
/// session, and never reassigned.
pub fn stock_code(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{prefix}-{:06}", at.timestamp_millis().rem_euclid(1_000_000))
}

/// Gateway over the hosted document and media stores.
#[derive(Clone)]
pub struct DataGateway {
    store: Arc<dyn DocumentStore>,
    media: Arc<dyn MediaStore>,
    clock: Arc<dyn Clock>,
    notices: NoticeHub,
}

impl DataGateway {
    /// Create a gateway with the given backing services.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        media: Arc<dyn MediaStore>,
        clock: Arc<dyn Clock>,
        notices: NoticeHub,
    ) -> Self {
        Self {
            store,
            media,
            clock,
            notices,
        }
    }

    /// Create a vehicle record, uploading its images first.
    pub async fn create_vehicle(
        &self,
        draft: VehicleDraft,
        images: Vec<ImageUpload>,
    ) -> Result<CreatedRecord, DomainError> {
        match self.create_vehicle_inner(draft, images).await {
            Ok(created) => {
                info!(id = %created.id, code = %created.code, "vehicle created");
                self.notices.success("Vehicle added successfully!");
                Ok(created)
            }
            Err(error) => Err(self.fail("adding vehicle", error)),
        }
    }

    async fn create_vehicle_inner(
        &self,
        draft: VehicleDraft,
        images: Vec<ImageUpload>,
    ) -> Result<CreatedRecord, DomainError> {
        draft
            .validate()
            .map_err(|err| DomainError::invalid_request(err.to_string()))?;
        let now = self.clock.utc();
        let image_urls = self.upload_images(RecordKind::Vehicle, now, images).await?;

        let id = RecordId::random();
        let code = stock_code("VEH", now);
        let VehicleDraft {
            make,
            model,
            year,
            price,
            mileage,
            fuel_type,
            transmission,
            condition,
            description,
        } = draft;
        let vehicle = Vehicle {
            id,
            vehicle_id: code.clone(),
            make,
            model,
            year,
            price,
            mileage,
            fuel_type,
            transmission,
            condition,
            description,
            images: image_urls,
            status: VehicleStatus::Active,
            created_at: now,
            updated_at: now,
        };
        self.store
            .insert(vehicle.into_record())
            .await
            .map_err(map_store_error)?;
        Ok(CreatedRecord { id, code })
    }

    /// Update a vehicle's editable fields, appending any new images to the
    /// retained existing ones.
    pub async fn update_vehicle(
        &self,
        id: RecordId,
        draft: VehicleDraft,
        existing_images: Vec<String>,
        new_images: Vec<ImageUpload>,
    ) -> Result<(), DomainError> {
        let result = async {
            draft
                .validate()
                .map_err(|err| DomainError::invalid_request(err.to_string()))?;
            let uploaded = if new_images.is_empty() {
                Vec::new()
            } else {
                let now = self.clock.utc();
                self.upload_images(RecordKind::Vehicle, now, new_images)
                    .await?
            };
            self.mutate::<Vehicle, _>(id, move |vehicle| {
                vehicle.apply_draft(draft);
                if !uploaded.is_empty() {
                    let mut images = existing_images;
                    images.extend(uploaded);
                    vehicle.images = images;
                }
            })
            .await?;
            Ok(())
        }
        .await;
        match result {
            Ok(()) => {
                self.notices.success("Vehicle updated successfully!");
                Ok(())
            }
            Err(error) => Err(self.fail("updating vehicle", error)),
        }
    }

    /// Set a vehicle's administrative status.
    pub async fn set_vehicle_status(
        &self,
        id: RecordId,
        status: VehicleStatus,
    ) -> Result<(), DomainError> {
        match self
            .mutate::<Vehicle, _>(id, move |vehicle| vehicle.status = status)
            .await
        {
            Ok(vehicle) => {
                self.notices.success(format!(
                    "Vehicle status updated to {}",
                    vehicle.status_key()
                ));
                Ok(())
            }
            Err(error) => Err(self.fail("updating vehicle status", error)),
        }
    }

    /// Create a property record, uploading its images first.
    pub async fn create_property(
        &self,
        draft: PropertyDraft,
        images: Vec<ImageUpload>,
    ) -> Result<CreatedRecord, DomainError> {
        match self.create_property_inner(draft, images).await {
            Ok(created) => {
                info!(id = %created.id, code = %created.code, "property created");
                self.notices.success("Property added successfully!");
                Ok(created)
            }
            Err(error) => Err(self.fail("adding property", error)),
        }
    }

    async fn create_property_inner(
        &self,
        draft: PropertyDraft,
        images: Vec<ImageUpload>,
    ) -> Result<CreatedRecord, DomainError> {
        draft
            .validate()
            .map_err(|err| DomainError::invalid_request(err.to_string()))?;
        let now = self.clock.utc();
        let image_urls = self
            .upload_images(RecordKind::Property, now, images)
            .await?;

        let id = RecordId::random();
        let code = stock_code("PROP", now);
        let PropertyDraft {
            title,
            property_type,
            price,
            location,
            bedrooms,
            bathrooms,
            area,
            property_status,
            description,
        } = draft;
        let property = Property {
            id,
            property_id: code.clone(),
            title,
            property_type,
            price,
            location,
            bedrooms,
            bathrooms,
            area,
            property_status,
            description,
            images: image_urls,
            status: PropertyStatus::Active,
            created_at: now,
            updated_at: now,
        };
        self.store
            .insert(property.into_record())
            .await
            .map_err(map_store_error)?;
        Ok(CreatedRecord { id, code })
    }

    /// Update a property's editable fields, appending any new images to
    /// the retained existing ones.
    pub async fn update_property(
        &self,
        id: RecordId,
        draft: PropertyDraft,
        existing_images: Vec<String>,
        new_images: Vec<ImageUpload>,
    ) -> Result<(), DomainError> {
        let result = async {
            draft
                .validate()
                .map_err(|err| DomainError::invalid_request(err.to_string()))?;
            let uploaded = if new_images.is_empty() {
                Vec::new()
            } else {
                let now = self.clock.utc();
                self.upload_images(RecordKind::Property, now, new_images)
                    .await?
            };
            self.mutate::<Property, _>(id, move |property| {
                property.apply_draft(draft);
                if !uploaded.is_empty() {
                    let mut images = existing_images;
                    images.extend(uploaded);
                    property.images = images;
                }
            })
            .await?;
            Ok(())
        }
        .await;
        match result {
            Ok(()) => {
                self.notices.success("Property updated successfully!");
                Ok(())
            }
            Err(error) => Err(self.fail("updating property", error)),
        }
    }

    /// Set a property's administrative status.
    pub async fn set_property_status(
        &self,
        id: RecordId,
        status: PropertyStatus,
    ) -> Result<(), DomainError> {
        match self
            .mutate::<Property, _>(id, move |property| property.status = status)
            .await
        {
            Ok(property) => {
                self.notices.success(format!(
                    "Property status updated to {}",
                    property.status_key()
                ));
                Ok(())
            }
            Err(error) => Err(self.fail("updating property status", error)),
        }
    }

    /// Move a sell listing through moderation.
    pub async fn set_listing_status(
        &self,
        id: RecordId,
        status: ListingStatus,
    ) -> Result<(), DomainError> {
        match self
            .mutate::<SellListing, _>(id, move |listing| listing.status = status)
            .await
        {
            Ok(listing) => {
                self.notices.success(format!(
                    "Listing status updated to {}",
                    listing.status_key()
                ));
                Ok(())
            }
            Err(error) => Err(self.fail("updating listing status", error)),
        }
    }

    /// Unsubscribe or resubscribe a newsletter subscriber.
    pub async fn set_subscriber_status(
        &self,
        id: RecordId,
        status: SubscriberStatus,
    ) -> Result<(), DomainError> {
        match self
            .mutate::<Subscriber, _>(id, move |subscriber| subscriber.status = status)
            .await
        {
            Ok(subscriber) => {
                let message = match subscriber.status {
                    SubscriberStatus::Active => "User resubscribed successfully",
                    SubscriberStatus::Unsubscribed => "User unsubscribed successfully",
                };
                self.notices.success(message);
                Ok(())
            }
            Err(error) => Err(self.fail("updating subscription", error)),
        }
    }

    /// Set an enquiry's follow-up status.
    pub async fn set_enquiry_status(
        &self,
        id: RecordId,
        status: EnquiryStatus,
    ) -> Result<(), DomainError> {
        match self
            .mutate::<Enquiry, _>(id, move |enquiry| enquiry.status = status)
            .await
        {
            Ok(enquiry) => {
                self.notices.success(format!(
                    "Enquiry status updated to {}",
                    enquiry.status_key()
                ));
                Ok(())
            }
            Err(error) => Err(self.fail("updating enquiry status", error)),
        }
    }

    /// Mark one enquiry as read, stamping the read timestamp.
    pub async fn mark_enquiry_read(&self, id: RecordId) -> Result<(), DomainError> {
        let now = self.clock.utc();
        match self
            .mutate::<Enquiry, _>(id, move |enquiry| {
                enquiry.read = true;
                enquiry.read_at = Some(now);
            })
            .await
        {
            Ok(_) => {
                self.notices.success("Enquiry marked as read");
                Ok(())
            }
            Err(error) => Err(self.fail("marking enquiry as read", error)),
        }
    }

    /// Replace the notes attached to an enquiry.
    pub async fn set_enquiry_notes(
        &self,
        id: RecordId,
        notes: String,
    ) -> Result<(), DomainError> {
        let now = self.clock.utc();
        match self
            .mutate::<Enquiry, _>(id, move |enquiry| {
                enquiry.notes = Some(notes);
                enquiry.notes_updated_at = Some(now);
            })
            .await
        {
            Ok(_) => {
                self.notices.success("Notes added successfully");
                Ok(())
            }
            Err(error) => Err(self.fail("adding notes", error)),
        }
    }

    /// Mark every unread enquiry as read in one atomic batch write.
    pub async fn mark_all_enquiries_read(&self) -> Result<usize, DomainError> {
        let result = async {
            let now = self.clock.utc();
            let mut unread: Vec<Enquiry> = self
                .list_of::<Enquiry>(false)
                .await?
                .into_iter()
                .filter(|enquiry| !enquiry.read)
                .collect();
            for enquiry in &mut unread {
                enquiry.read = true;
                enquiry.read_at = Some(now);
                enquiry.touch(now);
            }
            let count = unread.len();
            if count > 0 {
                let records = unread.into_iter().map(Enquiry::into_record).collect();
                self.store
                    .replace_batch(records)
                    .await
                    .map_err(map_store_error)?;
            }
            Ok(count)
        }
        .await;
        match result {
            Ok(count) => {
                self.notices
                    .success(format!("{count} enquiries marked as read"));
                Ok(count)
            }
            Err(error) => Err(self.fail("marking all enquiries as read", error)),
        }
    }

    /// Delete a record using its kind's behaviour: a `deleted` tombstone
    /// for inventory kinds, physical removal for enquiries and
    /// subscribers.
    pub async fn delete(&self, kind: RecordKind, id: RecordId) -> Result<(), DomainError> {
        let result = match kind.delete_behaviour() {
            DeleteBehaviour::MarkDeleted => match kind {
                RecordKind::Vehicle => self
                    .mutate::<Vehicle, _>(id, |vehicle| vehicle.status = VehicleStatus::Deleted)
                    .await
                    .map(|_| ()),
                RecordKind::Property => self
                    .mutate::<Property, _>(id, |property| {
                        property.status = PropertyStatus::Deleted;
                    })
                    .await
                    .map(|_| ()),
                RecordKind::SellListing => self
                    .mutate::<SellListing, _>(id, |listing| {
                        listing.status = ListingStatus::Deleted;
                    })
                    .await
                    .map(|_| ()),
                RecordKind::Subscriber | RecordKind::Enquiry => {
                    Err(DomainError::internal("delete behaviour mismatch"))
                }
            },
            DeleteBehaviour::Remove => self
                .store
                .remove(kind, id)
                .await
                .map_err(map_store_error),
        };
        match result {
            Ok(()) => {
                self.notices
                    .success(format!("{} deleted successfully!", capitalise(kind.label())));
                Ok(())
            }
            Err(error) => Err(self.fail("deleting record", error)),
        }
    }

    /// List one kind's records, newest first, optionally hiding archived
    /// tombstones.
    pub async fn list_records(
        &self,
        kind: RecordKind,
        exclude_deleted: bool,
    ) -> Result<Vec<Record>, DomainError> {
        let records = self
            .store
            .list(kind)
            .await
            .map_err(map_store_error)
            .map_err(|error| self.fail(&format!("loading {}", kind.collection()), error))?;
        if exclude_deleted {
            Ok(records
                .into_iter()
                .filter(|record| record.lifecycle() != Lifecycle::Archived)
                .collect())
        } else {
            Ok(records)
        }
    }

    /// Typed variant of [`Self::list_records`].
    pub async fn list_of<T: CatalogRecord>(
        &self,
        exclude_deleted: bool,
    ) -> Result<Vec<T>, DomainError> {
        let records = self.list_records(T::KIND, exclude_deleted).await?;
        Ok(records.into_iter().filter_map(T::from_record).collect())
    }

    /// Fetch one record by id.
    pub async fn get_by_id(
        &self,
        kind: RecordKind,
        id: RecordId,
    ) -> Result<Option<Record>, DomainError> {
        self.store
            .fetch(kind, id)
            .await
            .map_err(map_store_error)
            .map_err(|error| self.fail(&format!("loading {}", kind.label()), error))
    }

    /// Counts for the dashboard landing page.
    pub async fn summary(&self) -> Result<DashboardSummary, DomainError> {
        let vehicles = self.list_of::<Vehicle>(true).await?;
        let properties = self.list_of::<Property>(true).await?;
        let listings = self.list_of::<SellListing>(true).await?;
        let subscribers = self.list_of::<Subscriber>(false).await?;
        let enquiries = self.list_of::<Enquiry>(false).await?;

        Ok(DashboardSummary {
            active_vehicles: vehicles
                .iter()
                .filter(|vehicle| vehicle.status == VehicleStatus::Active)
                .count(),
            active_properties: properties
                .iter()
                .filter(|property| property.status == PropertyStatus::Active)
                .count(),
            open_enquiries: enquiries.iter().filter(|enquiry| enquiry.is_open()).count(),
            pending_listings: listings
                .iter()
                .filter(|listing| listing.status == ListingStatus::Pending)
                .count(),
            subscribers: subscribers.len(),
        })
    }

    /// Connectivity probe used by the readiness endpoint.
    pub async fn probe(&self) -> Result<(), DomainError> {
        self.store.probe().await.map_err(map_store_error)
    }

    async fn upload_images(
        &self,
        kind: RecordKind,
        now: DateTime<Utc>,
        images: Vec<ImageUpload>,
    ) -> Result<Vec<String>, DomainError> {
        validate_images(&images)?;
        let uploads = images.into_iter().enumerate().map(|(index, image)| {
            let media = Arc::clone(&self.media);
            let path = storage_path(kind, now, index, &image);
            async move {
                media
                    .put(&path, &image.content_type, image.bytes)
                    .await
            }
        });
        try_join_all(uploads).await.map_err(map_media_error)
    }

    async fn mutate<T, F>(&self, id: RecordId, apply: F) -> Result<T, DomainError>
    where
        T: CatalogRecord,
        F: FnOnce(&mut T),
    {
        let record = self
            .store
            .fetch(T::KIND, id)
            .await
            .map_err(map_store_error)?;
        let Some(record) = record else {
            return Err(DomainError::not_found(format!(
                "{} {id} not found",
                T::KIND.label()
            )));
        };
        let mut entity = T::from_record(record)
            .ok_or_else(|| DomainError::internal("stored record has the wrong kind"))?;
        apply(&mut entity);
        entity.touch(self.clock.utc());
        self.store
            .replace(entity.clone().into_record())
            .await
            .map_err(map_store_error)?;
        Ok(entity)
    }

    fn fail(&self, context: &str, error: DomainError) -> DomainError {
        warn!(error = %error, context, "gateway operation failed");
        self.notices
            .error(format!("Error {context}: {}", error.message()));
        error
    }
}

fn capitalise(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn map_store_error(error: DocumentStoreError) -> DomainError {
    match error {
        DocumentStoreError::Connection { message } => {
            DomainError::unavailable(format!("document store unavailable: {message}"))
        }
        DocumentStoreError::Query { message } => {
            DomainError::internal(format!("document store error: {message}"))
        }
        DocumentStoreError::Stream { message } => {
            DomainError::unavailable(format!("change stream error: {message}"))
        }
    }
}

fn map_media_error(error: MediaStoreError) -> DomainError {
    match error {
        MediaStoreError::Upload { message } => {
            DomainError::internal(format!("image upload failed: {message}"))
        }
        MediaStoreError::Delete { message } => {
            DomainError::internal(format!("image delete failed: {message}"))
        }
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
