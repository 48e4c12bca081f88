//! Market records as delivered by the market data source.
//!
//! A [`MarketSnapshot`] is one fetch worth of rows. Snapshots are never
//! cached: scoring and training each fetch a fresh one.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde_json::Value;

/// Columns the scoring path cannot work without.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "modal_price",
    "min_price",
    "max_price",
    "commodity",
    "state",
    "district",
    "market",
];

const ARRIVAL_DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"];

/// Normalized identity of a market quote: commodity at a market.
///
/// Every field is trimmed and lower-cased, so `" Wheat "` and `"wheat"`
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarketKey {
    commodity: String,
    state: String,
    district: String,
    market: String,
}

impl MarketKey {
    #[must_use]
    pub fn new(commodity: &str, state: &str, district: &str, market: &str) -> Self {
        Self {
            commodity: normalize_identity(commodity),
            state: normalize_identity(state),
            district: normalize_identity(district),
            market: normalize_identity(market),
        }
    }

    #[must_use]
    pub fn commodity(&self) -> &str {
        &self.commodity
    }

    #[must_use]
    pub fn market(&self) -> &str {
        &self.market
    }
}

fn normalize_identity(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Modal, minimum and maximum price of a single record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prices {
    pub modal: f64,
    pub min: f64,
    pub max: f64,
}

impl Prices {
    #[must_use]
    pub const fn new(modal: f64, min: f64, max: f64) -> Self {
        Self { modal, min, max }
    }
}

/// One row of market data.
///
/// Text fields are kept as delivered; numeric fields that failed to parse
/// are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketRecord {
    pub commodity: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub market: Option<String>,
    pub variety: Option<String>,
    pub arrival_date: Option<String>,
    pub modal_price: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl MarketRecord {
    /// Normalized identity, if all four identity fields are present.
    #[must_use]
    pub fn key(&self) -> Option<MarketKey> {
        Some(MarketKey::new(
            self.commodity.as_deref()?,
            self.state.as_deref()?,
            self.district.as_deref()?,
            self.market.as_deref()?,
        ))
    }

    /// All three prices, or `None` if any of them is unparseable.
    #[must_use]
    pub fn prices(&self) -> Option<Prices> {
        Some(Prices::new(self.modal_price?, self.min_price?, self.max_price?))
    }

    #[must_use]
    pub fn arrival(&self) -> Option<NaiveDate> {
        self.arrival_date.as_deref().and_then(parse_arrival_date)
    }
}

/// Parse an arrival date in any of the formats the source is known to use.
#[must_use]
pub fn parse_arrival_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    ARRIVAL_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Coerce a price cell to a number.
///
/// Accepts JSON numbers and numeric strings. Everything else, including
/// non-finite values, is treated as unparseable.
#[must_use]
pub fn parse_price(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

/// A single fetch of market records, plus the set of columns observed.
#[derive(Debug, Clone, Default)]
pub struct MarketSnapshot {
    records: Vec<MarketRecord>,
    columns: BTreeSet<String>,
}

impl MarketSnapshot {
    #[must_use]
    pub fn new(records: Vec<MarketRecord>, columns: BTreeSet<String>) -> Self {
        Self { records, columns }
    }

    /// Build a snapshot whose column set is inferred from the populated fields.
    #[must_use]
    pub fn from_records(records: Vec<MarketRecord>) -> Self {
        let mut columns = BTreeSet::new();
        for record in &records {
            let present = [
                ("commodity", record.commodity.is_some()),
                ("state", record.state.is_some()),
                ("district", record.district.is_some()),
                ("market", record.market.is_some()),
                ("variety", record.variety.is_some()),
                ("arrival_date", record.arrival_date.is_some()),
                ("modal_price", record.modal_price.is_some()),
                ("min_price", record.min_price.is_some()),
                ("max_price", record.max_price.is_some()),
            ];
            for (column, is_present) in present {
                if is_present {
                    columns.insert(column.to_string());
                }
            }
        }
        Self { records, columns }
    }

    #[must_use]
    pub fn records(&self) -> &[MarketRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    /// First required column that no record carries.
    #[must_use]
    pub fn missing_column(&self) -> Option<&'static str> {
        REQUIRED_COLUMNS
            .iter()
            .copied()
            .find(|column| !self.has_column(column))
    }

    /// The most recent record matching `key` whose prices all parse.
    ///
    /// Undated records sort before dated ones. On equal dates the record
    /// that appears first in the snapshot wins.
    #[must_use]
    pub fn latest_for(&self, key: &MarketKey) -> Option<(&MarketRecord, Prices)> {
        let mut best: Option<(&MarketRecord, Prices, Option<NaiveDate>)> = None;
        for record in &self.records {
            if record.key().as_ref() != Some(key) {
                continue;
            }
            let Some(prices) = record.prices() else {
                continue;
            };
            let arrival = record.arrival();
            let newer = best
                .as_ref()
                .map_or(true, |(_, _, current)| arrival > *current);
            if newer {
                best = Some((record, prices, arrival));
            }
        }
        best.map(|(record, prices, _)| (record, prices))
    }

    /// Largest parseable modal price, whatever the other price cells hold.
    #[must_use]
    pub fn modal_max(&self) -> Option<f64> {
        self.records
            .iter()
            .filter_map(|record| record.modal_price)
            .reduce(f64::max)
    }

    /// Price triples of every record with all three prices parseable.
    #[must_use]
    pub fn training_prices(&self) -> Vec<Prices> {
        self.records.iter().filter_map(MarketRecord::prices).collect()
    }
}
