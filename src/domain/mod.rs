//! Exchange-agnostic price scoring logic.
//!
//! Nothing in here performs I/O. Market snapshots come in through
//! [`crate::port::outbound::MarketDataSource`] and models are persisted
//! through [`crate::port::outbound::ModelStore`].

mod features;
mod forest;
mod record;
mod verdict;

pub use features::{FeatureBuilder, FeatureVector, Normalization, FEATURE_COUNT, FEATURE_NAMES};
pub use forest::{ForestParams, IsolationForest, Label, CONTAMINATION, RANDOM_SEED};
pub use record::{
    parse_arrival_date, parse_price, MarketKey, MarketRecord, MarketSnapshot, Prices,
    REQUIRED_COLUMNS,
};
pub use verdict::{
    PriceQuery, Verdict, REASON_ABOVE_THRESHOLD, REASON_ACCEPTED, REASON_ANOMALOUS,
};
