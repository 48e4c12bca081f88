//! Wire format of the open data portal's records endpoint.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::{parse_price, MarketRecord, MarketSnapshot};

/// `GET <resource>?format=json` response body.
///
/// Only `records` is consumed. Each record is kept as a loose JSON object
/// because the portal mixes string and numeric cells and omits columns.
#[derive(Debug, Deserialize)]
pub struct RecordsResponse {
    #[serde(default)]
    pub records: Vec<Map<String, Value>>,
}

impl RecordsResponse {
    #[must_use]
    pub fn into_snapshot(self) -> MarketSnapshot {
        let mut columns = BTreeSet::new();
        let records = self
            .records
            .into_iter()
            .map(|row| {
                columns.extend(row.keys().cloned());
                to_record(&row)
            })
            .collect();
        MarketSnapshot::new(records, columns)
    }
}

fn to_record(row: &Map<String, Value>) -> MarketRecord {
    MarketRecord {
        commodity: text(row, "commodity"),
        state: text(row, "state"),
        district: text(row, "district"),
        market: text(row, "market"),
        variety: text(row, "variety"),
        arrival_date: text(row, "arrival_date"),
        modal_price: row.get("modal_price").and_then(parse_price),
        min_price: row.get("min_price").and_then(parse_price),
        max_price: row.get("max_price").and_then(parse_price),
    }
}

fn text(row: &Map<String, Value>, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
