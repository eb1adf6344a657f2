//! Ports connecting the domain to its backing services.

mod document_store;
mod macros;
mod media_store;
mod settings_store;

pub use document_store::{ChangeBatch, ChangeStream, DocumentStore, DocumentStoreError};
pub use media_store::{MediaStore, MediaStoreError};
pub use settings_store::{SettingsStore, SettingsStoreError, ThemePreference};

#[cfg(test)]
pub use document_store::MockDocumentStore;
#[cfg(test)]
pub use media_store::MockMediaStore;
#[cfg(test)]
pub use settings_store::MockSettingsStore;
