//! Shared fixtures for integration tests.

#![allow(dead_code)]

use pricewarden::domain::MarketRecord;

pub const STATE: &str = "Karnataka";
pub const DISTRICT: &str = "Bengaluru";

/// A fully populated market row.
pub fn record(commodity: &str, market: &str, date: &str, modal: f64) -> MarketRecord {
    MarketRecord {
        commodity: Some(commodity.to_string()),
        state: Some(STATE.to_string()),
        district: Some(DISTRICT.to_string()),
        market: Some(market.to_string()),
        variety: Some("Other".to_string()),
        arrival_date: Some(date.to_string()),
        modal_price: Some(modal),
        min_price: Some(modal - 100.0),
        max_price: Some(modal + 100.0),
    }
}

/// A daily snapshot: three commodities across four markets over four days,
/// plus two Yeshwanthpur wheat rows two weeks apart.
pub fn daily_snapshot() -> Vec<MarketRecord> {
    let mut records = Vec::new();
    let markets = ["Binny Mill", "Ramanagara", "Doddaballapur", "Hoskote"];
    let commodities = [("Wheat", 1100.0), ("Onion", 1800.0), ("Tomato", 900.0)];

    for (i, market) in markets.iter().enumerate() {
        for (j, (commodity, base)) in commodities.iter().enumerate() {
            for day in 0..4_usize {
                let drift = (i * 7 + j * 3 + day) as f64 * 5.0;
                let date = format!("{:02}/03/2024", day + 10);
                records.push(record(commodity, market, &date, base + drift));
            }
        }
    }

    records.push(record("Wheat", "Yeshwanthpur", "15/03/2024", 1100.0));
    records.push(record("Wheat", "Yeshwanthpur", "01/03/2024", 900.0));
    records
}
