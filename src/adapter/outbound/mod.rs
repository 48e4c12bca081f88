//! Outbound adapters (driven side).

pub mod agmark;
pub mod file_store;
pub mod memory;
