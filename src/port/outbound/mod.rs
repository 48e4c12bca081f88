//! Outbound ports (driven side).

mod market;
mod store;

pub use market::MarketDataSource;
pub use store::ModelStore;
