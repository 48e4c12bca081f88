//! Agmarknet (data.gov.in) market data adapter.

mod client;
mod dto;
mod settings;

pub use client::AgmarkClient;
pub use dto::RecordsResponse;
pub use settings::{AgmarkConfig, API_KEY_ENV};
