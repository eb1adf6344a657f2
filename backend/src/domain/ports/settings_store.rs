//! Port abstraction for the small persisted settings store.
//!
//! Only two pieces of state live here: the last successful website sync
//! timestamp and the operator's theme preference.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by settings store adapters.
    pub enum SettingsStoreError {
        /// Reading a setting failed.
        Read { message: String } => "settings read failed: {message}",
        /// Writing a setting failed.
        Write { message: String } => "settings write failed: {message}",
    }
}

/// Dashboard theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ThemePreference {
    Light,
    Dark,
    /// Follow the operating system preference.
    #[default]
    System,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Timestamp of the last successful website sync, if any.
    async fn last_sync(&self) -> Result<Option<DateTime<Utc>>, SettingsStoreError>;

    /// Record a successful website sync.
    async fn set_last_sync(&self, at: DateTime<Utc>) -> Result<(), SettingsStoreError>;

    /// Stored theme preference, defaulting to following the system.
    async fn theme(&self) -> Result<ThemePreference, SettingsStoreError>;

    /// Persist the theme preference.
    async fn set_theme(&self, theme: ThemePreference) -> Result<(), SettingsStoreError>;
}
