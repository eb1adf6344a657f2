//! Wire payloads shared by the resource handlers.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::catalog::{CatalogRecord, RecordId};
use crate::domain::forms::FormFields;
use crate::domain::manager::EntityManager;
use crate::domain::uploads::ImageUpload;
use crate::domain::view::{RenderCard, ViewNode};
use crate::domain::DomainError;

use super::error::ApiError;

/// One image attachment carried inline as base64.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadBody {
    pub file_name: String,
    pub content_type: String,
    /// Base64-encoded file bytes.
    pub data: String,
}

/// Create-form submission: raw fields plus attachments.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordFormBody {
    pub fields: FormFields,
    #[serde(default)]
    pub images: Vec<ImageUploadBody>,
}

/// Edit-form submission: fields, retained image URLs, new attachments.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordUpdateBody {
    pub fields: FormFields,
    #[serde(default)]
    pub existing_images: Vec<String>,
    #[serde(default)]
    pub images: Vec<ImageUploadBody>,
}

/// Query parameters of every list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub type_filter: Option<String>,
    #[serde(default)]
    pub include_deleted: bool,
    pub limit: Option<usize>,
}

/// Destructive actions must carry explicit confirmation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// Filtered list response with its rendered projection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub total: usize,
    pub count: usize,
    pub records: Vec<T>,
    pub view: ViewNode,
}

/// Decode inline attachments before any validation or upload.
pub fn decode_images(images: Vec<ImageUploadBody>) -> Result<Vec<ImageUpload>, DomainError> {
    images
        .into_iter()
        .map(|image| {
            let bytes = BASE64.decode(image.data.as_bytes()).map_err(|err| {
                DomainError::invalid_request(format!(
                    "attachment {} is not valid base64: {err}",
                    image.file_name
                ))
            })?;
            Ok(ImageUpload {
                file_name: image.file_name,
                content_type: image.content_type,
                bytes,
            })
        })
        .collect()
}

/// Parse a path segment into a record id.
pub fn parse_record_id(raw: &str) -> Result<RecordId, ApiError> {
    raw.parse().map_err(|_| {
        ApiError::from(
            DomainError::invalid_request("record id must be a UUID")
                .with_details(json!({ "value": raw })),
        )
    })
}

/// Reject destructive calls that skipped the confirmation step.
pub fn require_confirmation(query: &ConfirmQuery) -> Result<(), ApiError> {
    if query.confirm {
        return Ok(());
    }
    Err(ApiError::from(DomainError::invalid_request(
        "confirmation required: retry with confirm=true",
    )))
}

/// Run a snapshot through the manager's filter pipeline and project it.
pub fn filtered_response<T>(
    records: Vec<T>,
    query: &ListQuery,
    empty_message: &str,
) -> ListResponse<T>
where
    T: CatalogRecord + RenderCard,
{
    let mut manager = EntityManager::new();
    manager.apply_snapshot(records);
    if let Some(search) = &query.search {
        manager.set_search(search);
    }
    manager.set_status_filter(query.status.clone());
    manager.set_type_filter(query.type_filter.clone());

    let view = manager.render(empty_message);
    let (count, total) = manager.counts();
    let mut records: Vec<T> = manager.visible().to_vec();
    if let Some(limit) = query.limit {
        records.truncate(limit);
    }
    ListResponse {
        total,
        count,
        records,
        view,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachments_decode_through_base64() {
        let decoded = decode_images(vec![ImageUploadBody {
            file_name: "front.jpg".to_owned(),
            content_type: "image/jpeg".to_owned(),
            data: BASE64.encode([1_u8, 2, 3]),
        }])
        .expect("valid base64 decodes");
        assert_eq!(decoded[0].bytes, vec![1, 2, 3]);

        let error = decode_images(vec![ImageUploadBody {
            file_name: "front.jpg".to_owned(),
            content_type: "image/jpeg".to_owned(),
            data: "not-base64!!!".to_owned(),
        }])
        .expect_err("bad base64 rejected");
        assert!(error.message().contains("not valid base64"));
    }

    #[test]
    fn confirmation_is_required_for_destructive_calls() {
        assert!(require_confirmation(&ConfirmQuery { confirm: true }).is_ok());
        assert!(require_confirmation(&ConfirmQuery::default()).is_err());
    }
}
