//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - Command-line front end
//! - [`outbound`] - Market data source and model artifact storage

pub mod inbound;
pub mod outbound;
