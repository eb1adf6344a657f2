//! Reqwest-backed adapter for the hosted object storage service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use url::Url;

use crate::domain::ports::{MediaStore, MediaStoreError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Hosted object storage adapter: binary upload by path, public URL out.
pub struct HostedMediaApi {
    client: Client,
    upload_base: Url,
    public_base: String,
}

impl HostedMediaApi {
    /// Build an adapter uploading to `upload_base` and serving from
    /// `public_base`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(upload_base: Url, public_base: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self {
            client,
            upload_base,
            public_base: public_base.into().trim_end_matches('/').to_owned(),
        })
    }

    fn object_url(&self, path: &str) -> Result<Url, MediaStoreError> {
        self.upload_base
            .join(path)
            .map_err(|err| MediaStoreError::upload(err.to_string()))
    }
}

#[async_trait]
impl MediaStore for HostedMediaApi {
    async fn put(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, MediaStoreError> {
        let url = self.object_url(path)?;
        let response = self
            .client
            .put(url)
            .header(header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|err| MediaStoreError::upload(err.to_string()))?;
        if !response.status().is_success() {
            return Err(MediaStoreError::upload(format!(
                "object store responded {}",
                response.status()
            )));
        }
        Ok(format!("{}/{path}", self.public_base))
    }

    async fn delete(&self, path: &str) -> Result<(), MediaStoreError> {
        let url = self
            .upload_base
            .join(path)
            .map_err(|err| MediaStoreError::delete(err.to_string()))?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|err| MediaStoreError::delete(err.to_string()))?;
        if !response.status().is_success() {
            return Err(MediaStoreError::delete(format!(
                "object store responded {}",
                response.status()
            )));
        }
        Ok(())
    }
}
