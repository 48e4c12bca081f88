//! Scores a vendor quote against the latest matching market record.
//!
//! ```text
//! fetch ─> shape check ─> match ─> vendor price ─> threshold ─> model
//!   │           │           │           │              │          │
//! error       error       error       error          reject   reject/accept/error
//! ```
//!
//! Every branch is terminal. A failed request leaves the engine untouched
//! for the next one.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::model::ModelBundle;
use crate::domain::{
    FeatureBuilder, Label, PriceQuery, Verdict, REASON_ABOVE_THRESHOLD, REASON_ACCEPTED,
    REASON_ANOMALOUS,
};
use crate::error::{DataShapeError, Error, Result};
use crate::port::outbound::MarketDataSource;

/// Quotes above `modal * PRICE_TOLERANCE` are rejected without consulting
/// the model.
pub const PRICE_TOLERANCE: f64 = 1.10;

/// Strictly greater: a quote exactly at the tolerance passes to the model.
#[must_use]
pub fn exceeds_threshold(vendor_price: f64, modal_price: f64) -> bool {
    vendor_price > modal_price * PRICE_TOLERANCE
}

/// Stateless scorer over a shared, read-only model bundle.
pub struct DecisionEngine {
    source: Arc<dyn MarketDataSource>,
    model: Arc<ModelBundle>,
}

impl DecisionEngine {
    #[must_use]
    pub fn new(source: Arc<dyn MarketDataSource>, model: Arc<ModelBundle>) -> Self {
        Self { source, model }
    }

    #[must_use]
    pub fn model(&self) -> &ModelBundle {
        &self.model
    }

    /// Score one quote. Failures are folded into [`Verdict::Error`].
    pub async fn score(&self, query: &PriceQuery) -> Verdict {
        match self.evaluate(query).await {
            Ok(verdict) => {
                info!(
                    commodity = %query.commodity,
                    market = %query.market,
                    status = verdict.status(),
                    "Scored quote"
                );
                verdict
            }
            Err(err) => {
                debug!(error = %err, "Quote could not be scored");
                Verdict::from(err)
            }
        }
    }

    async fn evaluate(&self, query: &PriceQuery) -> Result<Verdict> {
        let snapshot = self.source.fetch().await?;
        if snapshot.is_empty() {
            return Err(DataShapeError::NoRecords.into());
        }
        if let Some(column) = snapshot.missing_column() {
            return Err(DataShapeError::MissingColumn { column }.into());
        }

        let key = query.key();
        let (record, reference) = snapshot.latest_for(&key).ok_or(Error::NoMatch)?;
        debug!(
            arrival_date = record.arrival_date.as_deref().unwrap_or("unknown"),
            modal = reference.modal,
            "Selected reference record"
        );

        let vendor_price = query.vendor_price()?;
        let modal = reference.modal;

        if exceeds_threshold(vendor_price, modal) {
            return Ok(Verdict::reject(REASON_ABOVE_THRESHOLD, modal, vendor_price));
        }

        let features =
            FeatureBuilder::new(self.model.normalization()).scoring(&reference, vendor_price);
        let verdict = match self.model.forest().predict(&features)? {
            Label::Outlier => Verdict::reject(REASON_ANOMALOUS, modal, vendor_price),
            Label::Inlier => Verdict::accept(REASON_ACCEPTED, modal, vendor_price),
        };
        Ok(verdict)
    }
}
