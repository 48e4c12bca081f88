//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! # Available Ports
//!
//! - [`outbound::MarketDataSource`] - Snapshot of current market records
//! - [`outbound::ModelStore`] - Durable slot holding the trained model
//!
//! The inbound side is the CLI in [`crate::adapter::inbound`], which drives
//! [`crate::application`] directly.

pub mod outbound;
