//! Feature engineering for the anomaly model.
//!
//! Training and scoring share one six-column schema:
//!
//! | # | name               | training                     | scoring                       |
//! |---|--------------------|------------------------------|-------------------------------|
//! | 0 | `modal_price`      | record modal                 | record modal                  |
//! | 1 | `min_price`        | record min                   | record min                    |
//! | 2 | `max_price`        | record max                   | **vendor price**              |
//! | 3 | `price_range`      | max - min                    | record max - min              |
//! | 4 | `price_spread`     | (max - modal) / modal        | (vendor - modal) / modal      |
//! | 5 | `normalized_modal` | modal / training modal max   | modal / training modal max    |
//!
//! Scoring reuses the `max_price` slot for the vendor quote. Stored models
//! depend on this layout.

use serde::{Deserialize, Serialize};

use super::record::{MarketSnapshot, Prices};

pub const FEATURE_COUNT: usize = 6;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "modal_price",
    "min_price",
    "max_price",
    "price_range",
    "price_spread",
    "normalized_modal",
];

/// Training-time maximum modal price used to rescale modal prices.
///
/// Not persisted with the model. It is recomputed from a live snapshot on
/// every start, and stays unset if that snapshot is unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Normalization {
    train_modal_max: Option<f64>,
}

impl Normalization {
    pub const UNSET: Self = Self {
        train_modal_max: None,
    };

    #[must_use]
    pub const fn from_modal_max(train_modal_max: Option<f64>) -> Self {
        Self { train_modal_max }
    }

    #[must_use]
    pub fn from_snapshot(snapshot: &MarketSnapshot) -> Self {
        Self::from_modal_max(snapshot.modal_max())
    }

    #[must_use]
    pub const fn train_modal_max(&self) -> Option<f64> {
        self.train_modal_max
    }

    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.train_modal_max.is_some()
    }

    /// `modal / train_modal_max`, or `0.0` when the divisor is unset or zero.
    #[must_use]
    pub fn normalize(&self, modal: f64) -> f64 {
        match self.train_modal_max {
            Some(max) if max != 0.0 => modal / max,
            _ => 0.0,
        }
    }
}

/// Fixed-order numeric encoding of one price observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    #[must_use]
    pub const fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    #[must_use]
    pub const fn zero() -> Self {
        Self([0.0; FEATURE_COUNT])
    }

    #[must_use]
    pub const fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// Name and value of the first non-finite feature, if any.
    #[must_use]
    pub fn first_non_finite(&self) -> Option<(&'static str, f64)> {
        FEATURE_NAMES
            .iter()
            .zip(self.0)
            .find(|(_, value)| !value.is_finite())
            .map(|(name, value)| (*name, value))
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.first_non_finite().is_none()
    }
}

/// Builds feature vectors against a fixed normalization.
#[derive(Debug, Clone, Copy)]
pub struct FeatureBuilder {
    normalization: Normalization,
}

impl FeatureBuilder {
    #[must_use]
    pub const fn new(normalization: Normalization) -> Self {
        Self { normalization }
    }

    /// Features for a historical record used as training input.
    #[must_use]
    pub fn training(&self, prices: &Prices) -> FeatureVector {
        FeatureVector([
            prices.modal,
            prices.min,
            prices.max,
            prices.max - prices.min,
            (prices.max - prices.modal) / prices.modal,
            self.normalization.normalize(prices.modal),
        ])
    }

    /// Features for a vendor quote checked against a reference record.
    ///
    /// The vendor price occupies the `max_price` slot and drives the spread;
    /// the range still comes from the reference record.
    #[must_use]
    pub fn scoring(&self, reference: &Prices, vendor_price: f64) -> FeatureVector {
        FeatureVector([
            reference.modal,
            reference.min,
            vendor_price,
            reference.max - reference.min,
            (vendor_price - reference.modal) / reference.modal,
            self.normalization.normalize(reference.modal),
        ])
    }
}
