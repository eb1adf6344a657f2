//! Image attachment validation and storage path naming.
//!
//! All checks run before any network call: an invalid batch aborts the
//! whole operation with no partial upload.

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;

use super::error::DomainError;
use super::kind::RecordKind;

/// Upload size ceiling. A file of exactly this size is accepted.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// MIME types accepted for image attachments.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] =
    ["image/jpeg", "image/jpg", "image/png", "image/webp"];

const STORAGE_SUFFIX_LEN: usize = 9;

/// One image attachment received from the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    fn extension(&self) -> &str {
        self.file_name.rsplit('.').next().unwrap_or("bin")
    }
}

/// Validate a batch of attachments against the size ceiling, the MIME
/// allow-list, and duplicate file names.
pub fn validate_images(images: &[ImageUpload]) -> Result<(), DomainError> {
    for (index, image) in images.iter().enumerate() {
        if !ALLOWED_IMAGE_TYPES.contains(&image.content_type.as_str()) {
            return Err(DomainError::invalid_request(format!(
                "File {}: invalid file type. Only JPG, PNG, and WebP are allowed.",
                index + 1
            )));
        }
        if image.bytes.len() > MAX_IMAGE_BYTES {
            return Err(DomainError::invalid_request(format!(
                "Image {} is too large. Maximum size is 5MB.",
                image.file_name
            )));
        }
        let duplicate = images[..index]
            .iter()
            .any(|earlier| earlier.file_name == image.file_name);
        if duplicate {
            return Err(DomainError::invalid_request(format!(
                "File {}: duplicate file name detected.",
                index + 1
            )));
        }
    }
    Ok(())
}

/// Storage path for one attachment, namespaced by the kind's collection.
///
/// Follows the original naming scheme: timestamp, batch index, and a
/// short random suffix keep concurrent uploads from colliding.
pub fn storage_path(
    kind: RecordKind,
    uploaded_at: DateTime<Utc>,
    index: usize,
    image: &ImageUpload,
) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(STORAGE_SUFFIX_LEN)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();
    format!(
        "{}/{}_{}_{}.{}",
        kind.collection(),
        uploaded_at.timestamp_millis(),
        index,
        suffix,
        image.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn jpeg(name: &str, len: usize) -> ImageUpload {
        ImageUpload {
            file_name: name.to_owned(),
            content_type: "image/jpeg".to_owned(),
            bytes: vec![0_u8; len],
        }
    }

    #[test]
    fn accepts_a_file_of_exactly_the_ceiling() {
        let images = [jpeg("exact.jpg", MAX_IMAGE_BYTES)];
        assert!(validate_images(&images).is_ok());
    }

    #[test]
    fn rejects_one_byte_over_the_ceiling() {
        let images = [jpeg("heavy.jpg", MAX_IMAGE_BYTES + 1)];
        let err = validate_images(&images).expect_err("oversized file rejected");
        assert!(err.message().contains("too large"));
    }

    #[rstest]
    #[case("image/gif")]
    #[case("application/pdf")]
    #[case("text/html")]
    fn rejects_disallowed_content_types(#[case] content_type: &str) {
        let images = [ImageUpload {
            file_name: "sample.gif".to_owned(),
            content_type: content_type.to_owned(),
            bytes: vec![0_u8; 16],
        }];
        let err = validate_images(&images).expect_err("type rejected");
        assert!(err.message().contains("invalid file type"));
    }

    #[test]
    fn rejects_duplicate_file_names() {
        let images = [jpeg("front.jpg", 10), jpeg("front.jpg", 12)];
        let err = validate_images(&images).expect_err("duplicate rejected");
        assert!(err.message().contains("duplicate file name"));
    }

    #[test]
    fn storage_paths_are_namespaced_by_collection() {
        let at = chrono::Utc
            .with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        let path = storage_path(RecordKind::Vehicle, at, 0, &jpeg("front.jpg", 10));
        assert!(path.starts_with("vehicles/"));
        assert!(path.ends_with(".jpg"));
    }
}
