//! Process-local adapters backing tests and the demo mode.

mod document_store;
mod media_store;
mod settings_store;

pub use document_store::MemoryDocumentStore;
pub use media_store::MemoryMediaStore;
pub use settings_store::MemorySettingsStore;
