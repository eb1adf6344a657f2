//! Domain services and entities for the marketplace admin dashboard.
//!
//! Purpose: own the live-data pipeline (change stream to local cache to
//! filtered view to rendered projection) plus every mutation side effect,
//! independent of any transport. Inbound adapters translate HTTP and
//! WebSocket traffic into calls here; outbound adapters implement the
//! ports in `ports`.

pub mod catalog;
pub mod error;
pub mod export;
pub mod feed;
pub mod forms;
pub mod gateway;
pub mod kind;
pub mod manager;
pub mod notice;
pub mod ports;
pub mod record;
pub mod site_sync;
pub mod uploads;
pub mod view;

pub use self::error::{DomainError, ErrorCode};
pub use self::kind::{DeleteBehaviour, Lifecycle, RecordKind};
pub use self::record::Record;

/// Convenient domain result alias.
pub type DomainResult<T> = Result<T, DomainError>;
