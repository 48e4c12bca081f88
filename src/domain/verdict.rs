//! Scoring requests and their outcomes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::{parse_price, MarketKey};
use crate::error::{Error, Result};

pub const REASON_ABOVE_THRESHOLD: &str = "more than 10% above modal price";
pub const REASON_ANOMALOUS: &str = "flagged as anomalous by model";
pub const REASON_ACCEPTED: &str = "within threshold and not anomalous";

/// A vendor quote to be checked.
///
/// Deserialized leniently from the command payload: missing identity fields
/// are empty strings and a missing price is `0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuery {
    #[serde(default)]
    pub commodity: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub market: String,
    #[serde(default = "default_vendor_price")]
    pub vendor_price: Value,
}

fn default_vendor_price() -> Value {
    Value::from(0)
}

impl PriceQuery {
    #[must_use]
    pub fn new(
        commodity: impl Into<String>,
        state: impl Into<String>,
        district: impl Into<String>,
        market: impl Into<String>,
        vendor_price: f64,
    ) -> Self {
        Self {
            commodity: commodity.into(),
            state: state.into(),
            district: district.into(),
            market: market.into(),
            vendor_price: Value::from(vendor_price),
        }
    }

    #[must_use]
    pub fn key(&self) -> MarketKey {
        MarketKey::new(&self.commodity, &self.state, &self.district, &self.market)
    }

    /// The quoted price as a finite number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when the value is not numeric.
    pub fn vendor_price(&self) -> Result<f64> {
        parse_price(&self.vendor_price).ok_or_else(|| Error::InvalidInput {
            value: self.vendor_price.to_string(),
        })
    }
}

/// Outcome of a scoring request, serialized as the response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Verdict {
    Accept {
        reason: String,
        market_modal_price: f64,
        vendor_price: f64,
    },
    Reject {
        reason: String,
        market_modal_price: f64,
        vendor_price: f64,
    },
    Error {
        message: String,
    },
}

impl Verdict {
    #[must_use]
    pub fn accept(reason: &str, market_modal_price: f64, vendor_price: f64) -> Self {
        Self::Accept {
            reason: reason.to_string(),
            market_modal_price,
            vendor_price,
        }
    }

    #[must_use]
    pub fn reject(reason: &str, market_modal_price: f64, vendor_price: f64) -> Self {
        Self::Reject {
            reason: reason.to_string(),
            market_modal_price,
            vendor_price,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Accept { .. } => "accept",
            Self::Reject { .. } => "reject",
            Self::Error { .. } => "error",
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Accept { reason, .. } | Self::Reject { reason, .. } => Some(reason.as_str()),
            Self::Error { .. } => None,
        }
    }

    #[must_use]
    pub const fn market_modal_price(&self) -> Option<f64> {
        match self {
            Self::Accept {
                market_modal_price, ..
            }
            | Self::Reject {
                market_modal_price, ..
            } => Some(*market_modal_price),
            Self::Error { .. } => None,
        }
    }
}

impl From<Error> for Verdict {
    fn from(err: Error) -> Self {
        Self::error(err.to_string())
    }
}
