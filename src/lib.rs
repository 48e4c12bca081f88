//! Pricewarden - vendor price fraud checks against live market records.
//!
//! A vendor quote for a commodity at a specific mandi is compared against the
//! latest government market record for that location. Quotes more than 10%
//! above the market's modal price are rejected outright; the rest are scored
//! by an isolation forest trained on the same market data.
//!
//! # Architecture
//!
//! - [`domain`] - Records, features, the isolation forest and verdicts (no I/O)
//! - [`port`] - Traits for the market data source and model storage
//! - [`adapter`] - Agmarknet HTTP client, file and in-memory stores, the CLI
//! - [`application`] - Model lifecycle and the decision engine
//! - [`infrastructure`] - Configuration, paths and runtime wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use pricewarden::adapter::outbound::memory::{MemoryModelStore, StaticSource};
//! use pricewarden::application::decision::DecisionEngine;
//! use pricewarden::application::model::ModelManager;
//! use pricewarden::domain::PriceQuery;
//!
//! # async fn demo() -> pricewarden::error::Result<()> {
//! let source = Arc::new(StaticSource::from_records(Vec::new()));
//! let store = Arc::new(MemoryModelStore::new());
//! let bundle = ModelManager::new(source.clone(), store).ensure_model().await?;
//!
//! let engine = DecisionEngine::new(source, Arc::new(bundle));
//! let verdict = engine
//!     .score(&PriceQuery::new("Onion", "Maharashtra", "Nashik", "Lasalgaon", 1200.0))
//!     .await;
//! println!("{}", serde_json::to_string(&verdict)?);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
