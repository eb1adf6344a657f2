//! Outbound adapters implementing the domain ports.

pub mod hosted;
pub mod memory;
