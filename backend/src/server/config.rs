//! Server configuration loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MEDIA_PUBLIC_URL: &str = "https://media.openlot.test";
const DEFAULT_POLL_SECONDS: u64 = 5;

/// Which document store adapter the server wires in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local store, self-contained demo mode.
    Memory,
    /// Hosted document API over HTTP.
    Hosted,
}

/// Configuration values controlling the admin server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ADMIN")]
pub struct ServerSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Store backend: `memory` (default) or `hosted`.
    pub store_backend: Option<String>,
    /// Base URL of the hosted document API, required for `hosted`.
    pub hosted_base_url: Option<String>,
    /// Upload endpoint of the hosted object store.
    pub media_upload_url: Option<String>,
    /// Public base URL embedded into stored image links.
    pub media_public_url: Option<String>,
    /// Change-stream poll interval for the hosted adapter, in seconds.
    pub poll_seconds: Option<u64>,
}

impl ServerSettings {
    /// Bind address, falling back to the default port.
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Selected store backend; unknown values fall back to `memory`.
    pub fn store_backend(&self) -> StoreBackend {
        match self.store_backend.as_deref() {
            Some("hosted") => StoreBackend::Hosted,
            _ => StoreBackend::Memory,
        }
    }

    /// Public media base URL with its default.
    pub fn media_public_url(&self) -> &str {
        self.media_public_url
            .as_deref()
            .unwrap_or(DEFAULT_MEDIA_PUBLIC_URL)
    }

    /// Hosted-store poll interval with its default.
    pub fn poll_seconds(&self) -> u64 {
        self.poll_seconds.unwrap_or(DEFAULT_POLL_SECONDS)
    }
}
