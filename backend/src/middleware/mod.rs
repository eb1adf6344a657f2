//! Actix middleware shared by the inbound HTTP surface.

pub mod trace;

pub use trace::{Trace, TraceId};
