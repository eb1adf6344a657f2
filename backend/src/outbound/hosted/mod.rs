//! HTTP adapters for the hosted document and object stores.

mod document_api;
mod media_api;

pub use document_api::HostedDocumentApi;
pub use media_api::HostedMediaApi;
