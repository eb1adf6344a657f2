//! Port abstraction for the hosted object storage service.

use async_trait::async_trait;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by media store adapters.
    pub enum MediaStoreError {
        /// The upload was refused or failed mid-transfer.
        Upload { message: String } => "media upload failed: {message}",
        /// Deleting an object by path failed.
        Delete { message: String } => "media delete failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload a binary object under `path` and return its public URL.
    async fn put(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, MediaStoreError>;

    /// Delete the object stored under `path`.
    async fn delete(&self, path: &str) -> Result<(), MediaStoreError>;
}
