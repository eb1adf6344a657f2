//! In-memory settings store adapter.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{SettingsStore, SettingsStoreError, ThemePreference};

#[derive(Default)]
struct SettingsState {
    last_sync: Option<DateTime<Utc>>,
    theme: ThemePreference,
}

/// Process-local settings store.
#[derive(Default)]
pub struct MemorySettingsStore {
    state: RwLock<SettingsState>,
}

impl MemorySettingsStore {
    /// Create an empty settings store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SettingsState> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SettingsState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn last_sync(&self) -> Result<Option<DateTime<Utc>>, SettingsStoreError> {
        Ok(self.read().last_sync)
    }

    async fn set_last_sync(&self, at: DateTime<Utc>) -> Result<(), SettingsStoreError> {
        self.write().last_sync = Some(at);
        Ok(())
    }

    async fn theme(&self) -> Result<ThemePreference, SettingsStoreError> {
        Ok(self.read().theme)
    }

    async fn set_theme(&self, theme: ThemePreference) -> Result<(), SettingsStoreError> {
        self.write().theme = theme;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn theme_defaults_to_system_until_set() {
        let store = MemorySettingsStore::new();
        assert_eq!(store.theme().await.expect("read"), ThemePreference::System);

        store
            .set_theme(ThemePreference::Dark)
            .await
            .expect("write");
        assert_eq!(store.theme().await.expect("read"), ThemePreference::Dark);
    }

    #[tokio::test]
    async fn last_sync_round_trips() {
        let store = MemorySettingsStore::new();
        assert_eq!(store.last_sync().await.expect("read"), None);

        let at = Utc
            .with_ymd_and_hms(2025, 6, 2, 8, 0, 0)
            .single()
            .expect("valid timestamp");
        store.set_last_sync(at).await.expect("write");
        assert_eq!(store.last_sync().await.expect("read"), Some(at));
    }
}
